//! # Reporting
//!
//! The engine hands its progress to a [`Reporter`]: one [`GenerationRecord`] per
//! generation, then either the final best individual or the error that aborted
//! the run. Persisting results (spreadsheets, files) is left to implementors;
//! [`TracingReporter`] writes them to the `tracing` log.

use tracing::{info, warn};

use crate::error::GeneticError;
use crate::individual::{Individual, Solution};

/// Snapshot of one evaluated generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRecord {
    /// 0 is the initial population.
    pub generation: usize,
    /// Best fitness within this generation, if any individual was evaluated.
    pub best_fitness: Option<f64>,
    pub best_solution: Option<Solution>,
    /// Model calls made for this generation.
    pub evaluations: usize,
    pub failures: usize,
}

/// Cumulative statistics of a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    pub evaluations: usize,
    pub failed_evaluations: usize,
    pub history: Vec<GenerationRecord>,
}

impl RunStatistics {
    pub(crate) fn record(&mut self, record: GenerationRecord) {
        self.evaluations += record.evaluations;
        self.failed_evaluations += record.failures;
        self.history.push(record);
    }

    /// Best fitness of every generation, in order.
    pub fn fitness_trace(&self) -> Vec<Option<f64>> {
        self.history.iter().map(|r| r.best_fitness).collect()
    }
}

/// Consumer of run progress and results.
///
/// Every method has an empty default, so implementors only override what they
/// need.
pub trait Reporter {
    fn on_generation(&mut self, _record: &GenerationRecord) {}

    fn on_finish(&mut self, _best: &Individual, _statistics: &RunStatistics) {}

    fn on_abort(&mut self, _error: &GeneticError, _statistics: &RunStatistics) {}
}

/// Logs progress through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn on_generation(&mut self, record: &GenerationRecord) {
        info!(
            generation = record.generation,
            best_fitness = ?record.best_fitness,
            evaluations = record.evaluations,
            failures = record.failures,
            "generation evaluated"
        );
    }

    fn on_finish(&mut self, best: &Individual, statistics: &RunStatistics) {
        info!(
            best_fitness = ?best.fitness(),
            best_solution = ?best.solution(),
            evaluations = statistics.evaluations,
            failures = statistics.failed_evaluations,
            "run finished"
        );
    }

    fn on_abort(&mut self, error: &GeneticError, statistics: &RunStatistics) {
        warn!(
            %error,
            evaluations = statistics.evaluations,
            failures = statistics.failed_evaluations,
            "run aborted"
        );
    }
}
