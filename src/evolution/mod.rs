pub mod builder;
pub mod engine;
pub mod model;
pub mod operators;
pub mod options;
pub mod report;

pub use builder::EngineBuilder;
pub use engine::{Engine, RunState};
pub use model::{ModelFunction, ModelRegistry, RegisteredModel};
pub use operators::{CrossoverFunction, ElitismFunction, MutationFunction, Operators, SelectionFunction};
pub use options::{
    CrossoverParams, ElitismParams, MutationParams, OptimizationDirection, Parameters,
    SelectionParams,
};
pub use report::{GenerationRecord, Reporter, RunStatistics, TracingReporter};
