//! # Engine
//!
//! The generational driver. One run is:
//!
//! ```text
//! Initializing → Evaluating → ConvergedCheck → { Generating → Evaluating → ConvergedCheck }* → Finalizing
//! ```
//!
//! Each generation builds a mating pool by selection, breeds it by crossover,
//! mutates the offspring and assembles the next population: the elites of the
//! previous generation first (fitness kept, not re-evaluated), then offspring
//! until the population is full. The run stops after `max_generations`
//! generations; there is no plateau detection and no rollback.
//!
//! Failed evaluations never stop a run. If a whole generation fails, parents are
//! drawn from the last generation that had an evaluated individual; if none has
//! had one yet, the next generation is sampled afresh from its seed.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::{
    model::ModelFunction,
    operators::Operators,
    options::Parameters,
    report::{GenerationRecord, Reporter, RunStatistics, TracingReporter},
};
use crate::{
    error::{GeneticError, OptionExt, Result},
    individual::Individual,
    population::{Population, Stream},
    rng::derive_seed,
    search_space::SearchSpace,
};

/// Where the engine is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Initializing,
    Evaluating,
    ConvergedCheck,
    Generating,
    Finalizing,
    Finished,
    Failed,
}

/// Runs the genetic algorithm for one search space, parameter set and model.
pub struct Engine<M>
where
    M: ModelFunction,
{
    search_space: Arc<SearchSpace>,
    parameters: Parameters,
    model: M,
    operators: Operators,
    state: RunState,
    generation: usize,
    best: Option<Individual>,
    statistics: RunStatistics,
}

impl<M> Engine<M>
where
    M: ModelFunction,
{
    /// Creates an engine with the operators named in `parameters`.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for an empty search space, or any error
    /// raised while instantiating the operators.
    pub fn new(search_space: SearchSpace, parameters: Parameters, model: M) -> Result<Self> {
        let operators = Operators::from_parameters(&parameters)?;
        Self::with_operators(search_space, parameters, model, operators)
    }

    /// Creates an engine with an explicit operator pipeline.
    pub fn with_operators(
        search_space: SearchSpace,
        parameters: Parameters,
        model: M,
        operators: Operators,
    ) -> Result<Self> {
        if search_space.number_of_variables() == 0 {
            return Err(GeneticError::Configuration(
                "Search space has no variables".to_string(),
            ));
        }

        Ok(Self {
            search_space: Arc::new(search_space),
            parameters,
            model,
            operators,
            state: RunState::Idle,
            generation: 0,
            best: None,
            statistics: RunStatistics::default(),
        })
    }

    /// Runs to completion, logging progress through `tracing`.
    pub fn execute(&mut self) -> Result<Individual> {
        self.execute_with(&mut TracingReporter)
    }

    /// Runs to completion and returns the best individual found.
    ///
    /// `reporter` receives a record per generation and, at the end, either the
    /// best individual or the error that aborted the run. Calling `execute`
    /// again starts a fresh run from the same seed.
    ///
    /// # Errors
    ///
    /// Fails with an `Evolution` error if no individual could be evaluated in any
    /// generation. Failed evaluations alone never cut a run short.
    #[instrument(skip_all, fields(seed = self.parameters.seed()))]
    pub fn execute_with(&mut self, reporter: &mut dyn Reporter) -> Result<Individual> {
        self.reset();

        match self.run(reporter) {
            Ok(best) => {
                self.state = RunState::Finished;
                reporter.on_finish(&best, &self.statistics);
                Ok(best)
            }
            Err(error) => {
                self.state = RunState::Failed;
                reporter.on_abort(&error, &self.statistics);
                Err(error)
            }
        }
    }

    fn reset(&mut self) {
        self.state = RunState::Idle;
        self.generation = 0;
        self.best = None;
        self.statistics = RunStatistics::default();
    }

    fn run(&mut self, reporter: &mut dyn Reporter) -> Result<Individual> {
        self.state = RunState::Initializing;
        let mut population = Population::new(
            Arc::clone(&self.search_space),
            derive_seed(self.parameters.seed(), 0),
        );
        population.initialise(self.parameters.population_size());
        info!(
            population_size = population.len(),
            max_generations = self.parameters.max_generations(),
            "population initialised"
        );

        self.evaluate(&mut population, reporter);

        // last generation holding at least one evaluated individual
        let mut parents: Option<Population> = None;

        loop {
            self.state = RunState::ConvergedCheck;
            if self.generation >= self.parameters.max_generations() {
                break;
            }

            self.state = RunState::Generating;
            let seed = derive_seed(self.parameters.seed(), (self.generation + 1) as u64);
            let failed = !population.individuals().iter().any(Individual::is_evaluated);
            if failed {
                warn!(
                    generation = self.generation,
                    "no individual could be evaluated, falling back"
                );
            } else {
                parents = Some(population);
            }
            population = match &parents {
                // fresh streams, so the fallback does not replay earlier offspring
                Some(previous) if failed => self.next_generation(&previous.reseeded(seed), seed)?,
                Some(previous) => self.next_generation(previous, seed)?,
                None => {
                    let mut fresh = Population::new(Arc::clone(&self.search_space), seed);
                    fresh.initialise(self.parameters.population_size());
                    fresh
                }
            };
            self.generation += 1;

            self.evaluate(&mut population, reporter);
        }

        self.state = RunState::Finalizing;
        self.best.clone().ok_or_else_genetic(|| {
            GeneticError::Evolution(
                "Evolution completed but no individual could be evaluated".to_string(),
            )
        })
    }

    /// Evaluates pending individuals, updates the best-so-far and reports.
    fn evaluate(&mut self, population: &mut Population, reporter: &mut dyn Reporter) {
        self.state = RunState::Evaluating;
        let count =
            population.evaluate_with_threshold(&self.model, self.parameters.parallel_threshold());

        let direction = self.parameters.direction();
        let generation_best = population.best_individual(direction);

        if let Some(candidate) = generation_best {
            let improves = match self.best.as_ref().and_then(Individual::fitness) {
                Some(current) => candidate
                    .fitness()
                    .is_some_and(|fitness| direction.is_better(fitness, current)),
                None => true,
            };
            if improves {
                debug!(generation = self.generation, fitness = ?candidate.fitness(), "new best individual");
                self.best = Some(candidate.clone());
            }
        }

        let record = GenerationRecord {
            generation: self.generation,
            best_fitness: generation_best.and_then(Individual::fitness),
            best_solution: generation_best.map(|best| best.solution().clone()),
            evaluations: count.evaluations,
            failures: count.failures,
        };
        reporter.on_generation(&record);
        self.statistics.record(record);
    }

    /// Builds the next generation, seeded with `seed`, from an evaluated `population`.
    fn next_generation(&self, population: &Population, seed: u64) -> Result<Population> {
        let size = self.parameters.population_size();
        let elites = self.operators.elitism.elites(population);

        let mut rng = population.rng_for(Stream::Selection);
        let mating_pool = self.operators.selection.select(population, &mut rng)?;

        let mut rng = mating_pool.rng_for(Stream::Crossover);
        let offspring = self.operators.crossover.crossover(&mating_pool, &mut rng)?;

        let mut rng = offspring.rng_for(Stream::Mutation);
        let mutated = self.operators.mutation.mutate(offspring, &mut rng)?;

        let mut next = population.spawn(seed);

        for elite in elites {
            let (solution, fitness) = elite.into_parts();
            next.insert_individual(solution, fitness);
        }
        for individual in mutated.into_individuals() {
            if next.len() >= size {
                break;
            }
            let (solution, fitness) = individual.into_parts();
            next.insert_individual(solution, fitness);
        }

        debug!(
            generation = self.generation + 1,
            elites = self.operators.elitism.count().min(next.len()),
            size = next.len(),
            "next generation assembled"
        );
        Ok(next)
    }

    /// Best individual found so far (by the configured direction).
    pub fn best(&self) -> Option<&Individual> {
        self.best.as_ref()
    }

    pub fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }

    /// Index of the last evaluated generation; 0 is the initial population.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn search_space(&self) -> &SearchSpace {
        &self.search_space
    }
}
