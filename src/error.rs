//! # Error Types
//!
//! This module defines the error type shared by every part of the engine.
//! Configuration problems are rejected up front with a typed variant; a failed
//! objective evaluation is *not* an error (it is counted and the run goes on).
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use rcga::error::{GeneticError, Result};
//!
//! fn check_size(size: usize) -> Result<usize> {
//!     if size == 0 {
//!         return Err(GeneticError::Configuration(
//!             "Population size cannot be zero".to_string(),
//!         ));
//!     }
//!     Ok(size)
//! }
//!
//! assert!(check_size(0).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use rcga::error::{GeneticError, OptionExt};
//!
//! fn best_of(fitness: &[f64]) -> rcga::error::Result<f64> {
//!     fitness
//!         .iter()
//!         .cloned()
//!         .fold(None, |acc: Option<f64>, f| Some(acc.map_or(f, |a| a.min(f))))
//!         .ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//!
//! assert_eq!(best_of(&[3.0, 1.0]).unwrap(), 1.0);
//! ```

use thiserror::Error;

/// Represents errors that can occur while configuring or running the engine.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// An invalid parameter or search-space configuration was provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A variable descriptor names a type the engine does not know.
    #[error("Unknown type '{found}' for variable '{variable}'")]
    UnknownVariableType { variable: String, found: String },

    /// An operator was requested by a name that has no registered implementation.
    #[error("Unknown {kind} function '{name}'")]
    UnknownOperator { kind: &'static str, name: String },

    /// A model function was requested by a name that is not registered.
    #[error("Unknown model function '{0}'")]
    UnknownModel(String),

    /// An operator was asked to work on a population with no individuals.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// A tournament was configured with zero participants.
    #[error("Tournament size must be at least 1")]
    EmptyTournament,

    /// An operator needed fitness values but no individual has been evaluated.
    #[error("No evaluated individuals: {0}")]
    NoEvaluatedIndividuals(String),

    /// The generational loop could not continue.
    #[error("Evolution error: {0}")]
    Evolution(String),
}

/// A specialized Result type for engine operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using a closure to
    /// generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
