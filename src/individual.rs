//! # Individual
//!
//! One candidate solution: a value per search-space variable and an optional
//! fitness. Individuals are plain values; cloning one yields a fully independent
//! solution mapping.

use std::collections::BTreeMap;
use std::fmt;

/// The value assigned to one variable.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Real(f64),
    Integer(i64),
    Category(String),
    Bit(u8),
}

impl Value {
    /// Numeric view of the value; `None` for categories.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(x) => Some(*x),
            Value::Integer(n) => Some(*n as f64),
            Value::Bit(b) => Some(*b as f64),
            Value::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            Value::Category(token) => Some(token),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Real(x) => write!(f, "{}", x),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Category(token) => f.write_str(token),
            Value::Bit(b) => write!(f, "{}", b),
        }
    }
}

/// Variable name → value.
pub type Solution = BTreeMap<String, Value>;

/// A candidate solution with its (possibly absent) fitness.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    id: usize,
    solution: Solution,
    fitness: Option<f64>,
}

impl Individual {
    pub(crate) fn new(id: usize, solution: Solution, fitness: Option<f64>) -> Self {
        Self {
            id,
            solution,
            fitness,
        }
    }

    /// Sequential identifier, unique within the owning population.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    /// `None` until the individual has been successfully evaluated.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    pub fn update_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Replaces the whole solution.
    ///
    /// The previous fitness is discarded unless the caller passes one it knows to
    /// still describe `solution`.
    pub fn update_solution(&mut self, solution: Solution, fitness: Option<f64>) {
        self.solution = solution;
        self.fitness = fitness;
    }

    /// Gives up the solution and fitness, e.g. to re-insert them elsewhere.
    pub fn into_parts(self) -> (Solution, Option<f64>) {
        (self.solution, self.fitness)
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fitness {
            Some(fitness) => write!(f, "Individual {} has fitness {}", self.id, fitness),
            None => write!(f, "Individual {} has fitness None", self.id),
        }
    }
}
