//! # Run configuration
//!
//! Plain data structures mirroring the configuration file of a run: a
//! `Decision variables` section (name → [`VariableConfig`]) and a
//! `Main parameters` section. With the `serde` feature they deserialize from any
//! serde format; reading and parsing the file itself is up to the caller.
//!
//! Conversion into the typed model rejects anything the engine cannot run:
//! unknown variable types, operator names or model names.
//!
//! ```rust
//! use rcga::config::{ParametersConfig, RunConfig};
//! use rcga::evolution::{Engine, ModelRegistry};
//! use rcga::individual::Solution;
//! use rcga::search_space::VariableConfig;
//!
//! let mut config = RunConfig::default();
//! config.decision_variables.insert(
//!     "x".to_string(),
//!     VariableConfig { kind: "float".to_string(), lower: Some(0.0), upper: Some(1.0), values: None },
//! );
//! config.main_parameters.model_function = "identity".to_string();
//!
//! let mut registry = ModelRegistry::new();
//! registry.register("identity", |s: &Solution| s["x"].as_f64());
//!
//! let engine = Engine::from_config(config, &registry);
//! assert!(engine.is_ok());
//! ```

use std::collections::BTreeMap;

use crate::error::Result;
use crate::evolution::{
    CrossoverParams, ElitismParams, Engine, ModelRegistry, MutationParams, Parameters,
    RegisteredModel, SelectionParams,
};
use crate::search_space::{SearchSpace, VariableConfig};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ElitismConfig {
    pub use_elitism: bool,
    pub n_ind_elitism: usize,
    pub elitism_function: String,
}

impl Default for ElitismConfig {
    fn default() -> Self {
        let params = ElitismParams::default();
        Self {
            use_elitism: params.use_elitism,
            n_ind_elitism: params.n_ind_elitism,
            elitism_function: params.elitism_function.to_string(),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    pub n_ind_tournament: usize,
    pub mating_pool_fraction: f64,
    pub selection_function: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        let params = SelectionParams::default();
        Self {
            n_ind_tournament: params.n_ind_tournament,
            mating_pool_fraction: params.mating_pool_fraction,
            selection_function: params.selection_function.to_string(),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverConfig {
    pub alpha: f64,
    pub p_crossover: f64,
    pub crossover_function: String,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        let params = CrossoverParams::default();
        Self {
            alpha: params.alpha,
            p_crossover: params.p_crossover,
            crossover_function: params.crossover_function.to_string(),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MutationConfig {
    pub p_mutation: f64,
    pub distribution_constant: f64,
    pub mutation_function: String,
}

impl Default for MutationConfig {
    fn default() -> Self {
        let params = MutationParams::default();
        Self {
            p_mutation: params.p_mutation,
            distribution_constant: params.distribution_constant,
            mutation_function: params.mutation_function.to_string(),
        }
    }
}

/// The `Main parameters` section.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ParametersConfig {
    pub seed: u64,
    pub population_size: usize,
    pub max_generations: usize,
    /// `min` or `max`.
    pub opt_type: String,
    /// Name of a model registered in a [`ModelRegistry`].
    pub model_function: String,
    pub parallel_threshold: usize,
    pub elitism_params: ElitismConfig,
    pub selection_params: SelectionConfig,
    pub crossover_params: CrossoverConfig,
    pub mutation_params: MutationConfig,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        let defaults = Parameters::default();
        Self {
            seed: defaults.seed(),
            population_size: defaults.population_size(),
            max_generations: defaults.max_generations(),
            opt_type: defaults.direction().to_string(),
            model_function: String::new(),
            parallel_threshold: defaults.parallel_threshold(),
            elitism_params: ElitismConfig::default(),
            selection_params: SelectionConfig::default(),
            crossover_params: CrossoverConfig::default(),
            mutation_params: MutationConfig::default(),
        }
    }
}

impl ParametersConfig {
    /// Parses operator names and the direction, then validates the result.
    pub fn to_parameters(&self) -> Result<Parameters> {
        Parameters::builder()
            .seed(self.seed)
            .population_size(self.population_size)
            .max_generations(self.max_generations)
            .direction(self.opt_type.parse()?)
            .parallel_threshold(self.parallel_threshold)
            .elitism(ElitismParams {
                use_elitism: self.elitism_params.use_elitism,
                n_ind_elitism: self.elitism_params.n_ind_elitism,
                elitism_function: self.elitism_params.elitism_function.parse()?,
            })
            .selection(SelectionParams {
                n_ind_tournament: self.selection_params.n_ind_tournament,
                mating_pool_fraction: self.selection_params.mating_pool_fraction,
                selection_function: self.selection_params.selection_function.parse()?,
            })
            .crossover(CrossoverParams {
                alpha: self.crossover_params.alpha,
                p_crossover: self.crossover_params.p_crossover,
                crossover_function: self.crossover_params.crossover_function.parse()?,
            })
            .mutation(MutationParams {
                p_mutation: self.mutation_params.p_mutation,
                distribution_constant: self.mutation_params.distribution_constant,
                mutation_function: self.mutation_params.mutation_function.parse()?,
            })
            .build()
    }
}

/// A whole configuration file.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunConfig {
    #[cfg_attr(feature = "serde", serde(rename = "Decision variables"))]
    pub decision_variables: BTreeMap<String, VariableConfig>,
    #[cfg_attr(feature = "serde", serde(rename = "Main parameters"))]
    pub main_parameters: ParametersConfig,
}

impl Engine<RegisteredModel> {
    /// Builds an engine from a configuration, resolving the model by name.
    ///
    /// # Errors
    ///
    /// Any malformed variable, unknown operator or model name, or invalid
    /// parameter is rejected before the run starts.
    pub fn from_config(config: RunConfig, registry: &ModelRegistry) -> Result<Self> {
        let search_space = SearchSpace::from_config(config.decision_variables)?;
        let parameters = config.main_parameters.to_parameters()?;
        let model = registry.resolve(&config.main_parameters.model_function)?;
        Engine::new(search_space, parameters, model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneticError;
    use crate::evolution::{CrossoverFunction, OptimizationDirection};
    use crate::individual::Solution;

    fn registry() -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        registry.register("sphere", |s: &Solution| {
            s.get("x").and_then(|v| v.as_f64()).map(|x| x * x)
        });
        registry
    }

    fn config() -> RunConfig {
        let mut config = RunConfig::default();
        config.decision_variables.insert(
            "x".to_string(),
            VariableConfig {
                kind: "float".to_string(),
                lower: Some(-5.0),
                upper: Some(5.0),
                values: None,
            },
        );
        config.main_parameters.model_function = "sphere".to_string();
        config
    }

    #[test]
    fn test_default_config_converts() {
        let mut parameters = ParametersConfig::default();
        parameters.opt_type = "max".to_string();
        parameters.crossover_params.crossover_function = "blx_alpha".to_string();
        let parameters = parameters.to_parameters().unwrap();
        assert_eq!(parameters.direction(), OptimizationDirection::Maximize);
        assert_eq!(parameters.crossover().crossover_function, CrossoverFunction::Blend);
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let mut config = config();
        config.main_parameters.mutation_params.mutation_function = "gaussian".to_string();
        assert!(matches!(
            Engine::from_config(config, &registry()),
            Err(GeneticError::UnknownOperator { kind: "mutation", .. })
        ));
    }

    #[test]
    fn test_unknown_model_rejected() {
        let mut config = config();
        config.main_parameters.model_function = "missing".to_string();
        assert!(matches!(
            Engine::from_config(config, &registry()),
            Err(GeneticError::UnknownModel(_))
        ));
    }

    #[test]
    fn test_bad_direction_rejected() {
        let mut config = config();
        config.main_parameters.opt_type = "sideways".to_string();
        assert!(matches!(
            Engine::from_config(config, &registry()),
            Err(GeneticError::Configuration(_))
        ));
    }

    #[test]
    fn test_config_runs() {
        let mut config = config();
        config.main_parameters.population_size = 10;
        config.main_parameters.max_generations = 5;
        let mut engine = Engine::from_config(config, &registry()).unwrap();
        assert!(engine.execute().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_json() {
        let raw = r#"{
            "Decision variables": {
                "x": {"Type": "float", "LBound": 0, "UBound": 10},
                "n": {"Type": "int", "LBound": 1, "UBound": 4},
                "color": {"Type": "enumerate", "Values": ["red", "green", "blue"]},
                "flag": {"Type": "binary"}
            },
            "Main parameters": {
                "seed": 42,
                "population_size": 20,
                "max_generations": 5,
                "opt_type": "min",
                "model_function": "sphere",
                "elitism_params": {"use_elitism": true, "n_ind_elitism": 2, "elitism_function": "elitism"},
                "selection_params": {"n_ind_tournament": 3, "mating_pool_fraction": 0.8, "selection_function": "tournament"},
                "crossover_params": {"alpha": 0.3, "p_crossover": 0.9, "crossover_function": "blend"},
                "mutation_params": {"p_mutation": 0.2, "distribution_constant": 15, "mutation_function": "polynomial"}
            }
        }"#;

        let config: RunConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.decision_variables.len(), 4);
        assert_eq!(config.main_parameters.parallel_threshold, 1000);

        let engine = Engine::from_config(config, &registry()).unwrap();
        assert_eq!(engine.search_space().variable_names(), vec!["color", "flag", "n", "x"]);
        assert_eq!(engine.parameters().selection().n_ind_tournament, 3);
        assert_eq!(engine.parameters().elitism().n_ind_elitism, 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_unknown_type_rejected() {
        let raw = r#"{"z": {"Type": "complex"}}"#;
        let variables: BTreeMap<String, VariableConfig> = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            SearchSpace::from_config(variables),
            Err(GeneticError::UnknownVariableType { .. })
        ));
    }
}
