//! # PolynomialMutation
//!
//! Each variable of each individual mutates independently with probability
//! `p_mutation`.
//!
//! Numeric variables are shifted by `τ * (upper - lower)`, where `τ ∈ (-1, 1)`
//! follows the polynomial distribution with shape constant `C`:
//!
//! ```text
//! r < 0.5:  τ = (2r)^(1/(C+1)) - 1
//! r ≥ 0.5:  τ = 1 - (2(1-r))^(1/(C+1))
//! ```
//!
//! Enumerated and binary variables have no ordering to perturb along; they are
//! redrawn uniformly from their domain instead.
use std::sync::Arc;

use crate::{
    error::Result,
    evolution::options::{check_non_negative, check_probability, MutationParams},
    individual::Value,
    population::Population,
    rng::RandomNumberGenerator,
    search_space::VariableKind,
};

use super::MutationStrategy;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct PolynomialMutation {
    probability: f64,
    distribution_constant: f64,
}

impl PolynomialMutation {
    /// Creates a new `PolynomialMutation`.
    ///
    /// # Errors
    ///
    /// `probability` must be in `[0, 1]` and `distribution_constant` finite and
    /// non-negative.
    pub fn new(probability: f64, distribution_constant: f64) -> Result<Self> {
        check_probability("p_mutation", probability)?;
        check_non_negative("distribution_constant", distribution_constant)?;
        Ok(Self {
            probability,
            distribution_constant,
        })
    }

    pub fn from_params(params: &MutationParams) -> Result<Self> {
        Self::new(params.p_mutation, params.distribution_constant)
    }

    /// Maps a uniform draw `r ∈ [0, 1)` to a perturbation factor in `(-1, 1)`.
    pub fn perturbation(&self, r: f64) -> f64 {
        let exponent = 1.0 / (self.distribution_constant + 1.0);
        if r < 0.5 {
            (2.0 * r).powf(exponent) - 1.0
        } else {
            1.0 - (2.0 * (1.0 - r)).powf(exponent)
        }
    }
}

impl Default for PolynomialMutation {
    fn default() -> Self {
        Self {
            probability: 0.1,
            distribution_constant: 20.0,
        }
    }
}

impl MutationStrategy for PolynomialMutation {
    fn mutate(
        &self,
        population: Population,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        let space = Arc::clone(population.search_space());
        let mut mutated = population.spawn(population.seed());

        for individual in population.into_individuals() {
            let (mut solution, fitness) = individual.into_parts();
            let mut changed = false;

            for variable in space.variables() {
                if !rng.chance(self.probability) {
                    continue;
                }
                changed = true;

                let value = match variable.kind() {
                    VariableKind::Continuous { lower, upper } => {
                        let tau = self.perturbation(rng.unit());
                        let current = solution.get(variable.name()).and_then(Value::as_f64);
                        match current {
                            Some(x) => Value::Real(x + tau * (upper - lower)),
                            None => variable.sample(rng),
                        }
                    }
                    VariableKind::Integer { lower, upper } => {
                        let tau = self.perturbation(rng.unit());
                        let current = solution.get(variable.name()).and_then(Value::as_f64);
                        match current {
                            Some(x) => Value::Real(x + tau * (upper - lower) as f64),
                            None => variable.sample(rng),
                        }
                    }
                    VariableKind::Enumerated { .. } | VariableKind::Binary => variable.sample(rng),
                };

                solution.insert(variable.name().to_string(), value);
            }

            mutated.insert_individual(solution, if changed { None } else { fitness });
        }

        Ok(mutated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::Solution;
    use crate::search_space::SearchSpace;

    fn population(space: SearchSpace, solutions: Vec<Solution>) -> Population {
        let mut population = Population::new(Arc::new(space), 5);
        for s in solutions {
            population.insert_individual(s, Some(1.0));
        }
        population
    }

    fn x_only(x: f64) -> Solution {
        let mut s = Solution::new();
        s.insert("x".to_string(), Value::Real(x));
        s
    }

    #[test]
    fn test_perturbation_shape() {
        let mutation = PolynomialMutation::new(1.0, 20.0).unwrap();
        assert_eq!(mutation.perturbation(0.5), 0.0);
        assert_eq!(mutation.perturbation(0.0), -1.0);
        assert!(mutation.perturbation(0.25) < 0.0);
        assert!(mutation.perturbation(0.75) > 0.0);
        for i in 0..100 {
            let tau = mutation.perturbation(i as f64 / 100.0);
            assert!((-1.0..1.0).contains(&tau));
        }
    }

    #[test]
    fn test_larger_constant_gives_smaller_steps() {
        let wide = PolynomialMutation::new(1.0, 1.0).unwrap();
        let narrow = PolynomialMutation::new(1.0, 100.0).unwrap();
        assert!(narrow.perturbation(0.9).abs() < wide.perturbation(0.9).abs());
        assert!(narrow.perturbation(0.1).abs() < wide.perturbation(0.1).abs());
    }

    #[test]
    fn test_zero_probability_keeps_fitness() {
        let space = SearchSpace::builder().continuous("x", 0.0, 10.0).build().unwrap();
        let population = population(space, vec![x_only(1.0), x_only(2.0)]);
        let before = population.individuals().to_vec();

        let mutation = PolynomialMutation::new(0.0, 20.0).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(1);
        let mutated = mutation.mutate(population, &mut rng).unwrap();

        assert_eq!(mutated.len(), 2);
        for (a, b) in before.iter().zip(mutated.individuals()) {
            assert_eq!(a.solution(), b.solution());
            assert_eq!(b.fitness(), Some(1.0));
        }
    }

    #[test]
    fn test_full_probability_resets_fitness_and_stays_in_bounds() {
        let space = SearchSpace::builder()
            .continuous("x", 0.0, 10.0)
            .integer("n", -3, 3)
            .binary("flag")
            .build()
            .unwrap();
        let mut solutions = Vec::new();
        for i in 0..50 {
            let mut s = x_only(if i % 2 == 0 { 0.0 } else { 10.0 });
            s.insert("n".to_string(), Value::Integer(3));
            s.insert("flag".to_string(), Value::Bit(0));
            solutions.push(s);
        }
        let population = population(space, solutions);

        let mutation = PolynomialMutation::new(1.0, 0.5).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(3);
        let mutated = mutation.mutate(population, &mut rng).unwrap();

        for individual in mutated.individuals() {
            assert!(individual.fitness().is_none());
            for variable in mutated.search_space().variables() {
                assert!(variable.contains(&individual.solution()[variable.name()]));
            }
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(PolynomialMutation::new(1.1, 20.0).is_err());
        assert!(PolynomialMutation::new(0.5, f64::NAN).is_err());
    }
}
