use crate::evolution::options::{ElitismParams, OptimizationDirection};
use crate::individual::Individual;
use crate::population::Population;

/// Picks the survivors that are carried unchanged into the next generation.
///
/// The population is copied, stably sorted by fitness in the optimisation
/// direction and the first `count` evaluated individuals are returned with their
/// fitness intact, so they are not evaluated again.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rcga::evolution::options::OptimizationDirection;
/// use rcga::individual::{Solution, Value};
/// use rcga::population::Population;
/// use rcga::search_space::SearchSpace;
/// use rcga::selection::Elitism;
///
/// let space = Arc::new(SearchSpace::builder().continuous("x", 0.0, 10.0).build().unwrap());
/// let mut population = Population::new(space, 0);
/// for (x, f) in [(1.0, 0.5), (2.0, 0.8), (3.0, 0.3)] {
///     let mut s = Solution::new();
///     s.insert("x".to_string(), Value::Real(x));
///     population.insert_individual(s, Some(f));
/// }
///
/// let elites = Elitism::new(2, OptimizationDirection::Maximize).elites(&population);
/// assert_eq!(elites.len(), 2);
/// assert_eq!(elites[0].fitness(), Some(0.8));
/// assert_eq!(elites[1].fitness(), Some(0.5));
///
/// let elites = Elitism::new(2, OptimizationDirection::Minimize).elites(&population);
/// assert_eq!(elites[0].fitness(), Some(0.3));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Elitism {
    /// Number of survivors; zero disables elitism.
    count: usize,
    direction: OptimizationDirection,
}

impl Elitism {
    pub fn new(count: usize, direction: OptimizationDirection) -> Self {
        Self { count, direction }
    }

    pub fn disabled() -> Self {
        Self::new(0, OptimizationDirection::default())
    }

    pub fn from_params(params: &ElitismParams, direction: OptimizationDirection) -> Self {
        if params.use_elitism {
            Self::new(params.n_ind_elitism, direction)
        } else {
            Self::new(0, direction)
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_enabled(&self) -> bool {
        self.count > 0
    }

    /// The best `count` evaluated individuals of `population`, best first.
    pub fn elites(&self, population: &Population) -> Vec<Individual> {
        if !self.is_enabled() {
            return Vec::new();
        }

        let mut sorted = population.clone();
        sorted.sort_by_fitness(self.direction.is_maximize());
        sorted
            .into_individuals()
            .into_iter()
            .filter(Individual::is_evaluated)
            .take(self.count)
            .collect()
    }
}

impl Default for Elitism {
    fn default() -> Self {
        Self::new(1, OptimizationDirection::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::{Solution, Value};
    use crate::search_space::SearchSpace;
    use std::sync::Arc;

    fn population(fitness: &[Option<f64>]) -> Population {
        let space = Arc::new(SearchSpace::builder().continuous("x", 0.0, 100.0).build().unwrap());
        let mut population = Population::new(space, 42);
        for (i, f) in fitness.iter().enumerate() {
            let mut s = Solution::new();
            s.insert("x".to_string(), Value::Real(i as f64));
            population.insert_individual(s, *f);
        }
        population
    }

    #[test]
    fn test_disabled_returns_nothing() {
        let population = population(&[Some(1.0), Some(2.0)]);
        assert!(Elitism::disabled().elites(&population).is_empty());

        let params = ElitismParams {
            use_elitism: false,
            n_ind_elitism: 2,
            ..Default::default()
        };
        let elitism = Elitism::from_params(&params, OptimizationDirection::Minimize);
        assert!(elitism.elites(&population).is_empty());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let population = population(&[Some(1.0), Some(0.5), Some(0.5), Some(3.0)]);
        let elites = Elitism::new(2, OptimizationDirection::Minimize).elites(&population);
        let ids: Vec<usize> = elites.iter().map(Individual::id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_skips_unevaluated() {
        let population = population(&[None, Some(4.0), None]);
        let elites = Elitism::new(3, OptimizationDirection::Maximize).elites(&population);
        assert_eq!(elites.len(), 1);
        assert_eq!(elites[0].fitness(), Some(4.0));
    }

    #[test]
    fn test_input_population_unchanged() {
        let population = population(&[Some(3.0), Some(1.0), Some(2.0)]);
        let before = population.individuals().to_vec();
        Elitism::new(2, OptimizationDirection::Minimize).elites(&population);
        assert_eq!(population.individuals(), before.as_slice());
    }
}
