use crate::{
    breeding::{CrossoverStrategy, MutationStrategy},
    error::{GeneticError, Result},
    search_space::SearchSpace,
    selection::{Elitism, SelectionStrategy},
};

use super::{model::ModelFunction, operators::Operators, options::Parameters, Engine};

/// Assembles an [`Engine`], optionally replacing operators named in the
/// parameters with custom strategies.
///
/// ```rust
/// use rcga::evolution::{EngineBuilder, Parameters};
/// use rcga::individual::Solution;
/// use rcga::search_space::SearchSpace;
///
/// let engine = EngineBuilder::new()
///     .with_search_space(SearchSpace::builder().continuous("x", -1.0, 1.0).build().unwrap())
///     .with_parameters(Parameters::builder().max_generations(5).build().unwrap())
///     .with_model(|s: &Solution| s["x"].as_f64().map(f64::abs))
///     .build();
///
/// assert!(engine.is_ok());
/// ```
pub struct EngineBuilder<M>
where
    M: ModelFunction,
{
    search_space: Option<SearchSpace>,
    parameters: Option<Parameters>,
    model: Option<M>,
    elitism: Option<Elitism>,
    selection_strategy: Option<Box<dyn SelectionStrategy>>,
    crossover_strategy: Option<Box<dyn CrossoverStrategy>>,
    mutation_strategy: Option<Box<dyn MutationStrategy>>,
}

impl<M> EngineBuilder<M>
where
    M: ModelFunction,
{
    pub fn new() -> Self {
        Self {
            search_space: None,
            parameters: None,
            model: None,
            elitism: None,
            selection_strategy: None,
            crossover_strategy: None,
            mutation_strategy: None,
        }
    }

    pub fn with_search_space(mut self, search_space: SearchSpace) -> Self {
        self.search_space = Some(search_space);
        self
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_model(mut self, model: M) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_elitism(mut self, elitism: Elitism) -> Self {
        self.elitism = Some(elitism);
        self
    }

    pub fn with_selection_strategy<S>(mut self, strategy: S) -> Self
    where
        S: SelectionStrategy + 'static,
    {
        self.selection_strategy = Some(Box::new(strategy));
        self
    }

    pub fn with_crossover_strategy<C>(mut self, strategy: C) -> Self
    where
        C: CrossoverStrategy + 'static,
    {
        self.crossover_strategy = Some(Box::new(strategy));
        self
    }

    pub fn with_mutation_strategy<U>(mut self, strategy: U) -> Self
    where
        U: MutationStrategy + 'static,
    {
        self.mutation_strategy = Some(Box::new(strategy));
        self
    }

    pub fn build(self) -> Result<Engine<M>> {
        let search_space = self.search_space.ok_or_else(|| {
            GeneticError::Configuration("Search space not specified".to_string())
        })?;

        let model = self
            .model
            .ok_or_else(|| GeneticError::Configuration("Model function not specified".to_string()))?;

        let parameters = self.parameters.unwrap_or_default();
        let mut operators = Operators::from_parameters(&parameters)?;

        if let Some(elitism) = self.elitism {
            operators.elitism = elitism;
        }
        if let Some(selection) = self.selection_strategy {
            operators.selection = selection;
        }
        if let Some(crossover) = self.crossover_strategy {
            operators.crossover = crossover;
        }
        if let Some(mutation) = self.mutation_strategy {
            operators.mutation = mutation;
        }

        Engine::with_operators(search_space, parameters, model, operators)
    }
}

impl<M> Default for EngineBuilder<M>
where
    M: ModelFunction,
{
    fn default() -> Self {
        Self::new()
    }
}
