//! # Breeding
//!
//! Variation operators. A [`CrossoverStrategy`] turns a mating pool into
//! offspring; a [`MutationStrategy`] perturbs offspring. Both hand back a new
//! [`Population`], so every produced solution goes through bounds enforcement on
//! insertion.
pub mod crossover;
pub mod mutation;

use std::fmt::Debug;

use crate::{error::Result, population::Population, rng::RandomNumberGenerator};

/// Produces offspring from a mating pool.
pub trait CrossoverStrategy: Debug + Send + Sync {
    /// Breeds a new population from `mating_pool`, which is left untouched.
    ///
    /// ## Errors
    ///
    /// This method fails if the mating pool is empty.
    fn crossover(
        &self,
        mating_pool: &Population,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population>;
}

/// Perturbs the individuals of a population.
pub trait MutationStrategy: Debug + Send + Sync {
    /// Consumes `population` and returns its mutated successor.
    ///
    /// Individuals whose solution changed lose their fitness; the others keep it.
    fn mutate(&self, population: Population, rng: &mut RandomNumberGenerator)
        -> Result<Population>;
}

pub use crossover::BlendCrossover;
pub use mutation::PolynomialMutation;
