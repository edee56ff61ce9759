//! # Parameters
//!
//! The `Parameters` struct holds everything that controls a run: seed,
//! population size, number of generations, optimisation direction and one
//! parameter group per operator.
//!
//! ## Example
//!
//! ```rust
//! use rcga::evolution::options::{OptimizationDirection, Parameters};
//!
//! let parameters = Parameters::builder()
//!     .seed(42)
//!     .population_size(20)
//!     .max_generations(50)
//!     .direction(OptimizationDirection::Minimize)
//!     .tournament_size(3)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(parameters.population_size(), 20);
//! assert_eq!(parameters.selection().n_ind_tournament, 3);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{GeneticError, Result};

use super::operators::{CrossoverFunction, ElitismFunction, MutationFunction, SelectionFunction};

/// Whether lower or higher fitness is better.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptimizationDirection {
    #[default]
    Minimize,
    Maximize,
}

impl OptimizationDirection {
    /// Strict comparison: `true` only if `candidate` beats `incumbent`.
    pub fn is_better(&self, candidate: f64, incumbent: f64) -> bool {
        match self {
            OptimizationDirection::Minimize => candidate < incumbent,
            OptimizationDirection::Maximize => candidate > incumbent,
        }
    }

    pub fn is_maximize(&self) -> bool {
        matches!(self, OptimizationDirection::Maximize)
    }
}

impl FromStr for OptimizationDirection {
    type Err = GeneticError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "min" => Ok(OptimizationDirection::Minimize),
            "max" => Ok(OptimizationDirection::Maximize),
            other => Err(GeneticError::Configuration(format!(
                "opt_type must be 'min' or 'max', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for OptimizationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationDirection::Minimize => f.write_str("min"),
            OptimizationDirection::Maximize => f.write_str("max"),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ElitismParams {
    pub use_elitism: bool,
    /// Number of individuals carried over unchanged.
    pub n_ind_elitism: usize,
    pub elitism_function: ElitismFunction,
}

impl Default for ElitismParams {
    fn default() -> Self {
        Self {
            use_elitism: true,
            n_ind_elitism: 1,
            elitism_function: ElitismFunction::Elitism,
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionParams {
    /// Participants per tournament.
    pub n_ind_tournament: usize,
    /// Mating pool size as a fraction of the population size.
    pub mating_pool_fraction: f64,
    pub selection_function: SelectionFunction,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            n_ind_tournament: 2,
            mating_pool_fraction: 1.0,
            selection_function: SelectionFunction::Tournament,
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverParams {
    /// Extension of the parents' interval, as a fraction of its width.
    pub alpha: f64,
    pub p_crossover: f64,
    pub crossover_function: CrossoverFunction,
}

impl Default for CrossoverParams {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            p_crossover: 0.9,
            crossover_function: CrossoverFunction::Blend,
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MutationParams {
    /// Per-variable mutation probability.
    pub p_mutation: f64,
    /// Shape constant of the polynomial distribution; larger means smaller steps.
    pub distribution_constant: f64,
    pub mutation_function: MutationFunction,
}

impl Default for MutationParams {
    fn default() -> Self {
        Self {
            p_mutation: 0.1,
            distribution_constant: 20.0,
            mutation_function: MutationFunction::Polynomial,
        }
    }
}

/// Validated run parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    seed: u64,
    population_size: usize,
    max_generations: usize,
    direction: OptimizationDirection,
    /// Minimum number of pending evaluations before they run in parallel
    parallel_threshold: usize,
    elitism: ElitismParams,
    selection: SelectionParams,
    crossover: CrossoverParams,
    mutation: MutationParams,
}

impl Parameters {
    pub fn builder() -> ParametersBuilder {
        ParametersBuilder::default()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn max_generations(&self) -> usize {
        self.max_generations
    }

    pub fn direction(&self) -> OptimizationDirection {
        self.direction
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn elitism(&self) -> &ElitismParams {
        &self.elitism
    }

    pub fn selection(&self) -> &SelectionParams {
        &self.selection
    }

    pub fn crossover(&self) -> &CrossoverParams {
        &self.crossover
    }

    pub fn mutation(&self) -> &MutationParams {
        &self.mutation
    }

    /// Number of individuals the selection step puts into the mating pool.
    pub fn mating_pool_size(&self) -> usize {
        (self.selection.mating_pool_fraction * self.population_size as f64).floor() as usize
    }

    fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(GeneticError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }
        if self.elitism.use_elitism && self.elitism.n_ind_elitism > self.population_size {
            return Err(GeneticError::Configuration(format!(
                "n_ind_elitism ({}) exceeds population size ({})",
                self.elitism.n_ind_elitism, self.population_size
            )));
        }
        if self.selection.n_ind_tournament == 0 {
            return Err(GeneticError::EmptyTournament);
        }
        let fraction = self.selection.mating_pool_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(GeneticError::Configuration(format!(
                "mating_pool_fraction must be in (0, 1], got {}",
                fraction
            )));
        }
        if self.mating_pool_size() == 0 {
            return Err(GeneticError::Configuration(format!(
                "mating_pool_fraction {} leaves an empty mating pool for population size {}",
                fraction, self.population_size
            )));
        }
        check_probability("p_crossover", self.crossover.p_crossover)?;
        check_probability("p_mutation", self.mutation.p_mutation)?;
        check_non_negative("alpha", self.crossover.alpha)?;
        check_non_negative("distribution_constant", self.mutation.distribution_constant)?;
        Ok(())
    }
}

pub(crate) fn check_probability(name: &str, p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(GeneticError::Configuration(format!(
            "{} must be in [0, 1], got {}",
            name, p
        )));
    }
    Ok(())
}

pub(crate) fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(GeneticError::Configuration(format!(
            "{} must be a finite, non-negative number, got {}",
            name, value
        )));
    }
    Ok(())
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            seed: 0,
            population_size: 50,
            max_generations: 100,
            direction: OptimizationDirection::Minimize,
            parallel_threshold: 1000, // Default parallel threshold
            elitism: ElitismParams::default(),
            selection: SelectionParams::default(),
            crossover: CrossoverParams::default(),
            mutation: MutationParams::default(),
        }
    }
}

/// Builder for `Parameters`.
///
/// Unset values fall back to [`Parameters::default`]; `build` validates the result.
#[derive(Debug, Clone, Default)]
pub struct ParametersBuilder {
    parameters: Parameters,
}

impl ParametersBuilder {
    pub fn seed(mut self, value: u64) -> Self {
        self.parameters.seed = value;
        self
    }

    pub fn population_size(mut self, value: usize) -> Self {
        self.parameters.population_size = value;
        self
    }

    pub fn max_generations(mut self, value: usize) -> Self {
        self.parameters.max_generations = value;
        self
    }

    pub fn direction(mut self, value: OptimizationDirection) -> Self {
        self.parameters.direction = value;
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parameters.parallel_threshold = value;
        self
    }

    pub fn elitism(mut self, value: ElitismParams) -> Self {
        self.parameters.elitism = value;
        self
    }

    /// Enables elitism with `count` survivors, or disables it when `count` is zero.
    pub fn elite_count(mut self, count: usize) -> Self {
        self.parameters.elitism.use_elitism = count > 0;
        self.parameters.elitism.n_ind_elitism = count;
        self
    }

    pub fn selection(mut self, value: SelectionParams) -> Self {
        self.parameters.selection = value;
        self
    }

    pub fn tournament_size(mut self, value: usize) -> Self {
        self.parameters.selection.n_ind_tournament = value;
        self
    }

    pub fn mating_pool_fraction(mut self, value: f64) -> Self {
        self.parameters.selection.mating_pool_fraction = value;
        self
    }

    pub fn crossover(mut self, value: CrossoverParams) -> Self {
        self.parameters.crossover = value;
        self
    }

    pub fn mutation(mut self, value: MutationParams) -> Self {
        self.parameters.mutation = value;
        self
    }

    pub fn build(self) -> Result<Parameters> {
        self.parameters.validate()?;
        Ok(self.parameters)
    }
}
