//! # rcga
//!
//! A real-coded genetic algorithm for black-box optimisation over mixed search
//! spaces: bounded continuous and integer variables, enumerated categories and
//! binary flags.
//!
//! The caller supplies a [`SearchSpace`](search_space::SearchSpace), a set of
//! [`Parameters`](evolution::Parameters) and a model function mapping a
//! [`Solution`](individual::Solution) to a fitness. The
//! [`Engine`](evolution::Engine) then runs a fixed number of generations of
//! elitism, tournament selection, blend crossover and polynomial mutation and
//! returns the best individual it saw.
//!
//! ```rust
//! use rcga::evolution::{Engine, OptimizationDirection, Parameters};
//! use rcga::individual::Solution;
//! use rcga::search_space::SearchSpace;
//!
//! let space = SearchSpace::builder().continuous("x", 0.0, 10.0).build().unwrap();
//! let parameters = Parameters::builder()
//!     .seed(42)
//!     .population_size(20)
//!     .max_generations(30)
//!     .direction(OptimizationDirection::Minimize)
//!     .build()
//!     .unwrap();
//!
//! let model = |s: &Solution| s["x"].as_f64().map(|x| (x - 3.0).powi(2));
//! let mut engine = Engine::new(space, parameters, model).unwrap();
//! let best = engine.execute().unwrap();
//! assert!(best.fitness().is_some());
//! ```
pub mod breeding;
pub mod config;
pub mod error;
pub mod evolution;
pub mod individual;
pub mod population;
pub mod rng;
pub mod search_space;
pub mod selection;

// Re-export commonly used types for convenience
pub use error::{GeneticError, OptionExt, Result};
pub use evolution::{Engine, EngineBuilder, ModelFunction, OptimizationDirection, Parameters};
pub use individual::{Individual, Solution, Value};
pub use population::Population;
pub use search_space::{SearchSpace, Variable, VariableKind};
