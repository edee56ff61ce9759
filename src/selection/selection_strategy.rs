use std::fmt::Debug;

use crate::error::Result;
use crate::population::Population;
use crate::rng::RandomNumberGenerator;

/// Trait for selection strategies that build a mating pool.
///
/// A strategy reads the current (evaluated) population and returns a new
/// population holding copies of the chosen parents, fitness included. The input
/// is never modified.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rcga::error::Result;
/// use rcga::evolution::options::OptimizationDirection;
/// use rcga::individual::Solution;
/// use rcga::population::{Population, Stream};
/// use rcga::search_space::SearchSpace;
/// use rcga::selection::{SelectionStrategy, TournamentSelection};
///
/// fn main() -> Result<()> {
///     let space = Arc::new(SearchSpace::builder().continuous("x", 0.0, 1.0).build()?);
///     let mut population = Population::new(space, 42);
///     population.initialise(10);
///     population.evaluate(&|s: &Solution| s["x"].as_f64());
///
///     let selection = TournamentSelection::new(2, 0.5, OptimizationDirection::Minimize)?;
///     let mut rng = population.rng_for(Stream::Selection);
///     let pool = selection.select(&population, &mut rng)?;
///
///     assert_eq!(pool.len(), 5);
///     Ok(())
/// }
/// ```
pub trait SelectionStrategy: Debug + Send + Sync {
    /// Selects parents from `population`.
    ///
    /// # Errors
    ///
    /// Returns an error if the population is empty or holds no evaluated
    /// individual.
    fn select(
        &self,
        population: &Population,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population>;
}
