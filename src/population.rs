//! # Population
//!
//! An ordered collection of [`Individual`]s bound to one [`SearchSpace`].
//!
//! The population is the only place where individuals are created: every
//! solution passes through [`Population::insert_individual`], which enforces the
//! variable bounds before storing it. Whatever an operator computes, a stored
//! solution is always inside the search space.
//!
//! Each population owns a seed. Random streams for initialisation, bounds repair
//! and the operators are derived from it (see [`Stream`]), so results depend only
//! on the seed and the population contents.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rcga::individual::{Solution, Value};
//! use rcga::population::Population;
//! use rcga::search_space::SearchSpace;
//!
//! let space = Arc::new(SearchSpace::builder().continuous("x", 0.0, 10.0).build().unwrap());
//! let mut population = Population::new(space, 42);
//! population.initialise(5);
//!
//! let model = |s: &Solution| s["x"].as_f64().map(|x| (x - 3.0).powi(2));
//! let count = population.evaluate(&model);
//! assert_eq!(count.evaluations, 5);
//! assert_eq!(population.evaluate(&model).evaluations, 0);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::evolution::model::ModelFunction;
use crate::evolution::options::OptimizationDirection;
use crate::individual::{Individual, Solution};
use crate::rng::{derive_seed, RandomNumberGenerator};
use crate::search_space::SearchSpace;

/// Independent random streams derived from a population seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Initialise,
    Repair,
    Selection,
    Crossover,
    Mutation,
}

impl Stream {
    fn tag(self) -> u64 {
        match self {
            Stream::Initialise => 0,
            Stream::Repair => 1,
            Stream::Selection => 2,
            Stream::Crossover => 3,
            Stream::Mutation => 4,
        }
    }
}

/// Outcome of one [`Population::evaluate`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationCount {
    /// Model calls performed.
    pub evaluations: usize,
    /// Calls that returned no usable fitness.
    pub failures: usize,
}

#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
    search_space: Arc<SearchSpace>,
    seed: u64,
    next_id: usize,
    evaluations: usize,
    failed_evaluations: usize,
    repair_rng: RandomNumberGenerator,
}

impl Population {
    /// Creates an empty population over `search_space`.
    pub fn new(search_space: Arc<SearchSpace>, seed: u64) -> Self {
        Self {
            individuals: Vec::new(),
            search_space,
            seed,
            next_id: 1,
            evaluations: 0,
            failed_evaluations: 0,
            repair_rng: RandomNumberGenerator::from_seed(derive_seed(seed, Stream::Repair.tag())),
        }
    }

    /// Creates an empty population over the same search space with a new seed.
    pub fn spawn(&self, seed: u64) -> Self {
        Self::new(Arc::clone(&self.search_space), seed)
    }

    /// A copy of this population whose random streams derive from `seed`.
    ///
    /// Individuals, ids and fitness values are kept as they are.
    pub(crate) fn reseeded(&self, seed: u64) -> Self {
        let mut copy = self.clone();
        copy.seed = seed;
        copy.repair_rng = RandomNumberGenerator::from_seed(derive_seed(seed, Stream::Repair.tag()));
        copy
    }

    /// A fresh generator for `stream`, seeded from this population's seed.
    pub fn rng_for(&self, stream: Stream) -> RandomNumberGenerator {
        RandomNumberGenerator::from_seed(derive_seed(self.seed, stream.tag()))
    }

    /// Appends `size` uniformly sampled individuals.
    ///
    /// The sampling stream restarts from the population seed, so two populations
    /// with the same seed initialise identically.
    #[instrument(level = "debug", skip(self), fields(seed = self.seed))]
    pub fn initialise(&mut self, size: usize) {
        let mut rng = self.rng_for(Stream::Initialise);
        for _ in 0..size {
            let solution: Solution = self
                .search_space
                .variables()
                .iter()
                .map(|variable| (variable.name().to_string(), variable.sample(&mut rng)))
                .collect();
            self.insert_individual(solution, None);
        }
    }

    /// Stores a new individual and returns its id.
    ///
    /// Every variable is passed through bounds enforcement: numbers are clamped,
    /// invalid tokens and missing entries are redrawn, unknown keys are dropped.
    /// A supplied fitness is kept only if enforcement left the solution unchanged.
    ///
    /// # Arguments
    ///
    /// * `solution` - Candidate values, possibly out of range or incomplete.
    /// * `fitness` - A fitness the caller knows to describe `solution`, if any.
    ///
    /// # Returns
    ///
    /// The id of the new individual. Ids start at 1 and are never reused.
    pub fn insert_individual(&mut self, solution: Solution, fitness: Option<f64>) -> usize {
        let mut changed = solution.len() != self.search_space.number_of_variables();
        let mut enforced = Solution::new();

        for variable in self.search_space.variables() {
            let original = solution.get(variable.name());
            let value = variable.enforce(original, &mut self.repair_rng);
            if original != Some(&value) {
                changed = true;
            }
            enforced.insert(variable.name().to_string(), value);
        }

        let id = self.next_id;
        self.next_id += 1;
        let fitness = if changed { None } else { fitness };
        self.individuals.push(Individual::new(id, enforced, fitness));
        id
    }

    /// Evaluates every individual that has no fitness yet, sequentially.
    pub fn evaluate<M>(&mut self, model: &M) -> EvaluationCount
    where
        M: ModelFunction + ?Sized,
    {
        self.evaluate_with_threshold(model, usize::MAX)
    }

    /// Evaluates every individual that has no fitness yet.
    ///
    /// When at least `parallel_threshold` individuals are pending, the model is
    /// called from rayon's thread pool; results are stored in population order
    /// afterwards. A `None` or non-finite result counts as a failure and leaves the
    /// fitness absent.
    #[instrument(level = "debug", skip(self, model), fields(size = self.individuals.len()))]
    pub fn evaluate_with_threshold<M>(&mut self, model: &M, parallel_threshold: usize) -> EvaluationCount
    where
        M: ModelFunction + ?Sized,
    {
        let pending: Vec<usize> = self
            .individuals
            .iter()
            .enumerate()
            .filter(|(_, individual)| !individual.is_evaluated())
            .map(|(idx, _)| idx)
            .collect();

        let individuals = &self.individuals;
        let results: Vec<Option<f64>> = if pending.len() >= parallel_threshold {
            pending
                .par_iter()
                .map(|&idx| model.evaluate(individuals[idx].solution()))
                .collect()
        } else {
            pending
                .iter()
                .map(|&idx| model.evaluate(individuals[idx].solution()))
                .collect()
        };

        let mut count = EvaluationCount {
            evaluations: pending.len(),
            failures: 0,
        };
        for (idx, result) in pending.into_iter().zip(results) {
            match result.filter(|f| f.is_finite()) {
                Some(fitness) => self.individuals[idx].update_fitness(fitness),
                None => {
                    debug!(id = self.individuals[idx].id(), "evaluation failed");
                    count.failures += 1;
                }
            }
        }

        self.evaluations += count.evaluations;
        self.failed_evaluations += count.failures;
        count
    }

    /// Stable sort by fitness. Unevaluated individuals always go last.
    pub fn sort_by_fitness(&mut self, descending: bool) {
        self.individuals
            .sort_by(|a, b| compare_fitness(a.fitness(), b.fitness(), descending));
    }

    /// The best evaluated individual, first one wins ties.
    ///
    /// Returns `None` when no individual carries a fitness.
    pub fn best_individual(&self, direction: OptimizationDirection) -> Option<&Individual> {
        let mut best: Option<&Individual> = None;
        for individual in &self.individuals {
            let Some(fitness) = individual.fitness() else {
                continue;
            };
            match best.and_then(Individual::fitness) {
                Some(current) if !direction.is_better(fitness, current) => {}
                _ => best = Some(individual),
            }
        }
        best
    }

    /// Returns the individuals in insertion order.
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Consumes the population and returns its individuals in insertion order.
    pub fn into_individuals(self) -> Vec<Individual> {
        self.individuals
    }

    /// Looks an individual up by id.
    pub fn individual(&self, id: usize) -> Option<&Individual> {
        self.individuals.iter().find(|individual| individual.id() == id)
    }

    /// Returns the number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Returns the seed that all of this population's random streams derive from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the shared search space the individuals live in.
    pub fn search_space(&self) -> &Arc<SearchSpace> {
        &self.search_space
    }

    /// Model calls made on this population so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Returns how many model calls gave no usable fitness.
    pub fn failed_evaluations(&self) -> usize {
        self.failed_evaluations
    }
}

fn compare_fitness(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Size: {}", self.individuals.len())?;
        writeln!(f, "Seed: {}", self.seed)?;
        for individual in &self.individuals {
            writeln!(f, "{}", individual)?;
        }
        Ok(())
    }
}
