//! # BlendCrossover
//!
//! BLX-α crossover. For two parent values `a` and `b` with `γ = |a - b|`, each
//! child value is drawn uniformly from `[min(a,b) - αγ, max(a,b) + αγ]`.
//!
//! The interval may reach past the variable bounds; insertion into the offspring
//! population clamps it back. Enumerated variables are blended on their index in
//! the allowed-values list, binary variables on 0/1, both rounded and clamped
//! into range before the lookup.
use crate::{
    error::{GeneticError, Result},
    evolution::options::{check_non_negative, check_probability, CrossoverParams},
    individual::{Individual, Solution, Value},
    population::Population,
    rng::RandomNumberGenerator,
    search_space::{SearchSpace, VariableKind},
};

use super::CrossoverStrategy;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct BlendCrossover {
    alpha: f64,
    probability: f64,
    /// Number of offspring to produce.
    target_size: usize,
}

impl BlendCrossover {
    /// Creates a new `BlendCrossover`.
    ///
    /// # Errors
    ///
    /// `alpha` must be finite and non-negative, `probability` in `[0, 1]`.
    pub fn new(alpha: f64, probability: f64, target_size: usize) -> Result<Self> {
        check_non_negative("alpha", alpha)?;
        check_probability("p_crossover", probability)?;
        Ok(Self {
            alpha,
            probability,
            target_size,
        })
    }

    pub fn from_params(params: &CrossoverParams, target_size: usize) -> Result<Self> {
        Self::new(params.alpha, params.p_crossover, target_size)
    }

    /// Draws one value from the extended interval around `a` and `b`.
    fn blend(&self, a: f64, b: f64, rng: &mut RandomNumberGenerator) -> f64 {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let gamma = hi - lo;
        rng.uniform(lo - self.alpha * gamma, hi + self.alpha * gamma)
    }

    /// Builds one child solution from two parents.
    fn child(
        &self,
        space: &SearchSpace,
        first: &Solution,
        second: &Solution,
        rng: &mut RandomNumberGenerator,
    ) -> Solution {
        let mut child = Solution::new();

        for variable in space.variables() {
            let name = variable.name();
            let (Some(a), Some(b)) = (first.get(name), second.get(name)) else {
                // left for bounds enforcement to fill in
                continue;
            };

            let value = match variable.kind() {
                VariableKind::Continuous { .. } | VariableKind::Integer { .. } => {
                    match (a.as_f64(), b.as_f64()) {
                        (Some(a), Some(b)) => Value::Real(self.blend(a, b, rng)),
                        _ => continue,
                    }
                }
                VariableKind::Enumerated { values } => {
                    let position = |v: &Value| {
                        v.as_category()
                            .and_then(|token| values.iter().position(|allowed| allowed == token))
                    };
                    match (position(a), position(b)) {
                        (Some(a), Some(b)) => {
                            let last = (values.len() - 1) as f64;
                            let idx = self.blend(a as f64, b as f64, rng).round().clamp(0.0, last);
                            Value::Category(values[idx as usize].clone())
                        }
                        _ => continue,
                    }
                }
                VariableKind::Binary => match (a.as_f64(), b.as_f64()) {
                    (Some(a), Some(b)) => {
                        Value::Bit(self.blend(a, b, rng).round().clamp(0.0, 1.0) as u8)
                    }
                    _ => continue,
                },
            };

            child.insert(name.to_string(), value);
        }

        child
    }

    /// Two distinct pool positions; a single-parent pool pairs the parent with itself.
    fn pick_parents(&self, pool_size: usize, rng: &mut RandomNumberGenerator) -> (usize, usize) {
        if pool_size < 2 {
            return (0, 0);
        }
        let first = rng.index(pool_size);
        loop {
            let second = rng.index(pool_size);
            if second != first {
                return (first, second);
            }
        }
    }
}

impl Default for BlendCrossover {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            probability: 0.9,
            target_size: 50,
        }
    }
}

impl CrossoverStrategy for BlendCrossover {
    /// Pairs random distinct parents until `target_size` offspring exist.
    ///
    /// With probability `p_crossover` a pair is blended into two new children
    /// (fitness absent); otherwise the parents are copied with their fitness. The
    /// second child of the last pair is dropped if the target is already reached.
    fn crossover(
        &self,
        mating_pool: &Population,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        if mating_pool.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let parents: &[Individual] = mating_pool.individuals();
        let space = mating_pool.search_space();
        let mut offspring = mating_pool.spawn(mating_pool.seed());

        while offspring.len() < self.target_size {
            let (i, j) = self.pick_parents(parents.len(), rng);
            let (first, second) = (&parents[i], &parents[j]);

            let children = if rng.chance(self.probability) {
                [
                    (self.child(space, first.solution(), second.solution(), rng), None),
                    (self.child(space, first.solution(), second.solution(), rng), None),
                ]
            } else {
                [
                    (first.solution().clone(), first.fitness()),
                    (second.solution().clone(), second.fitness()),
                ]
            };

            for (solution, fitness) in children {
                if offspring.len() >= self.target_size {
                    break;
                }
                offspring.insert_individual(solution, fitness);
            }
        }

        Ok(offspring)
    }
}
