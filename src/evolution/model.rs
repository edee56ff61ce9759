use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{GeneticError, Result};
use crate::individual::Solution;

/// The objective being optimised.
///
/// Returns `None` when a solution cannot be evaluated; the engine counts that as
/// a failed evaluation and carries on. Implementations must be `Send + Sync` so
/// large batches can be evaluated in parallel.
///
/// Any `Fn(&Solution) -> Option<f64>` closure is a model function:
///
/// ```rust
/// use rcga::evolution::ModelFunction;
/// use rcga::individual::{Solution, Value};
///
/// let model = |s: &Solution| s.get("x").and_then(Value::as_f64).map(|x| x * x);
///
/// let mut solution = Solution::new();
/// solution.insert("x".to_string(), Value::Real(3.0));
/// assert_eq!(model.evaluate(&solution), Some(9.0));
/// ```
pub trait ModelFunction: Send + Sync {
    fn evaluate(&self, solution: &Solution) -> Option<f64>;
}

impl<F> ModelFunction for F
where
    F: Fn(&Solution) -> Option<f64> + Send + Sync,
{
    fn evaluate(&self, solution: &Solution) -> Option<f64> {
        self(solution)
    }
}

/// A model function resolved from a [`ModelRegistry`].
#[derive(Clone)]
pub struct RegisteredModel {
    name: String,
    model: Arc<dyn ModelFunction>,
}

impl RegisteredModel {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for RegisteredModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredModel")
            .field("name", &self.name)
            .finish()
    }
}

impl ModelFunction for RegisteredModel {
    fn evaluate(&self, solution: &Solution) -> Option<f64> {
        self.model.evaluate(solution)
    }
}

/// Named model functions, so configuration can refer to a model by name.
#[derive(Default, Clone)]
pub struct ModelRegistry {
    models: HashMap<String, Arc<dyn ModelFunction>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `model` under `name`, replacing any previous entry.
    pub fn register<M>(&mut self, name: impl Into<String>, model: M) -> &mut Self
    where
        M: ModelFunction + 'static,
    {
        self.models.insert(name.into(), Arc::new(model));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn resolve(&self, name: &str) -> Result<RegisteredModel> {
        self.models
            .get(name)
            .map(|model| RegisteredModel {
                name: name.to_string(),
                model: Arc::clone(model),
            })
            .ok_or_else(|| GeneticError::UnknownModel(name.to_string()))
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.models.keys().collect();
        names.sort();
        f.debug_struct("ModelRegistry").field("models", &names).finish()
    }
}
