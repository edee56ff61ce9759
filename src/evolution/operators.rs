//! # Operator registry
//!
//! Configuration names operators by string. Each operator family is a tagged
//! enum parsed with `FromStr`; [`Operators::from_parameters`] turns the chosen
//! variants into concrete strategies. No name is ever executed as code: an
//! unknown name is a configuration error.

use std::fmt;
use std::str::FromStr;

use crate::breeding::{BlendCrossover, CrossoverStrategy, MutationStrategy, PolynomialMutation};
use crate::error::{GeneticError, Result};
use crate::selection::{Elitism, SelectionStrategy, TournamentSelection};

use super::options::Parameters;

macro_rules! operator_names {
    ($name:ident, $kind:literal, { $($variant:ident => [$canonical:literal $(, $alias:literal)*]),+ $(,)? }) => {
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $canonical),+
                }
            }
        }

        impl FromStr for $name {
            type Err = GeneticError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($canonical $(| $alias)* => Ok($name::$variant),)+
                    other => Err(GeneticError::UnknownOperator {
                        kind: $kind,
                        name: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

operator_names!(ElitismFunction, "elitism", {
    Elitism => ["elitism", "best_individuals"],
});

operator_names!(SelectionFunction, "selection", {
    Tournament => ["tournament", "tournament_selection"],
});

operator_names!(CrossoverFunction, "crossover", {
    Blend => ["blend", "blx_alpha", "blend_crossover"],
});

operator_names!(MutationFunction, "mutation", {
    Polynomial => ["polynomial", "polynomial_mutation"],
});

/// The concrete operator pipeline of one run.
#[derive(Debug)]
pub struct Operators {
    pub elitism: Elitism,
    pub selection: Box<dyn SelectionStrategy>,
    pub crossover: Box<dyn CrossoverStrategy>,
    pub mutation: Box<dyn MutationStrategy>,
}

impl Operators {
    /// Instantiates the operators named in `parameters`.
    pub fn from_parameters(parameters: &Parameters) -> Result<Self> {
        let direction = parameters.direction();

        let elitism = match parameters.elitism().elitism_function {
            ElitismFunction::Elitism => Elitism::from_params(parameters.elitism(), direction),
        };

        let selection: Box<dyn SelectionStrategy> =
            match parameters.selection().selection_function {
                SelectionFunction::Tournament => Box::new(TournamentSelection::from_params(
                    parameters.selection(),
                    direction,
                )?),
            };

        let crossover: Box<dyn CrossoverStrategy> =
            match parameters.crossover().crossover_function {
                CrossoverFunction::Blend => Box::new(BlendCrossover::from_params(
                    parameters.crossover(),
                    parameters.population_size(),
                )?),
            };

        let mutation: Box<dyn MutationStrategy> = match parameters.mutation().mutation_function {
            MutationFunction::Polynomial => {
                Box::new(PolynomialMutation::from_params(parameters.mutation())?)
            }
        };

        Ok(Self {
            elitism,
            selection,
            crossover,
            mutation,
        })
    }
}
