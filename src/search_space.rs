//! # SearchSpace
//!
//! The typed domain of every decision variable. A `SearchSpace` is immutable once
//! built and is shared (through an `Arc`) by every population of a run.
//!
//! Each variable carries exactly one [`VariableKind`] with the bounds that kind
//! requires. Sampling and bounds enforcement live here too, so that every
//! consumer applies the same per-type policy.
//!
//! ## Example
//!
//! ```rust
//! use rcga::search_space::{SearchSpace, VariableType};
//!
//! let space = SearchSpace::builder()
//!     .continuous("x", 0.0, 10.0)
//!     .integer("n", 1, 5)
//!     .enumerated("color", ["red", "green", "blue"])
//!     .binary("flag")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(space.number_of_variables(), 4);
//! assert_eq!(space.variable_type("n"), Some(VariableType::Integer));
//! assert_eq!(space.lower_bound("color"), None);
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{GeneticError, Result};
use crate::individual::Value;
use crate::rng::RandomNumberGenerator;

/// The four variable types the engine understands.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableType {
    Continuous,
    Integer,
    Enumerated,
    Binary,
}

impl VariableType {
    /// The name used for this type in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::Continuous => "float",
            VariableType::Integer => "int",
            VariableType::Enumerated => "enumerate",
            VariableType::Binary => "binary",
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "float" => Ok(VariableType::Continuous),
            "int" => Ok(VariableType::Integer),
            "enumerate" => Ok(VariableType::Enumerated),
            "binary" => Ok(VariableType::Binary),
            other => Err(other.to_string()),
        }
    }
}

/// Type plus the bounds that type requires.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum VariableKind {
    /// A real value in `[lower, upper]`.
    Continuous { lower: f64, upper: f64 },
    /// An integral value in `[lower, upper]`.
    Integer { lower: i64, upper: i64 },
    /// One of an ordered list of tokens.
    Enumerated { values: Vec<String> },
    /// Either 0 or 1.
    Binary,
}

impl VariableKind {
    pub fn variable_type(&self) -> VariableType {
        match self {
            VariableKind::Continuous { .. } => VariableType::Continuous,
            VariableKind::Integer { .. } => VariableType::Integer,
            VariableKind::Enumerated { .. } => VariableType::Enumerated,
            VariableKind::Binary => VariableType::Binary,
        }
    }
}

/// A named decision variable.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    kind: VariableKind,
}

impl Variable {
    /// Creates a variable without validating it.
    ///
    /// # Arguments
    ///
    /// * `name` - The key the variable's value is stored under in a [`Solution`](crate::individual::Solution).
    /// * `kind` - The variable's type together with its bounds or allowed values.
    ///
    /// Bounds are checked when the variable is added to a [`SearchSpace`].
    pub fn new(name: impl Into<String>, kind: VariableKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type and domain of the variable.
    pub fn kind(&self) -> &VariableKind {
        &self.kind
    }

    /// Draws a value uniformly from this variable's domain.
    pub fn sample(&self, rng: &mut RandomNumberGenerator) -> Value {
        match &self.kind {
            VariableKind::Continuous { lower, upper } => Value::Real(rng.uniform(*lower, *upper)),
            VariableKind::Integer { lower, upper } => Value::Integer(rng.integer(*lower, *upper)),
            VariableKind::Enumerated { values } => {
                Value::Category(values[rng.index(values.len())].clone())
            }
            VariableKind::Binary => Value::Bit(rng.integer(0, 1) as u8),
        }
    }

    /// Maps any candidate value onto this variable's domain.
    ///
    /// Numeric values are clamped to `[lower, upper]` (integers are rounded to the
    /// nearest whole number first). Categorical and binary values outside the
    /// domain, missing values and non-finite numbers are replaced by a uniform draw.
    pub fn enforce(&self, value: Option<&Value>, rng: &mut RandomNumberGenerator) -> Value {
        let numeric = value.and_then(Value::as_f64).filter(|x| x.is_finite());

        match &self.kind {
            VariableKind::Continuous { lower, upper } => match numeric {
                Some(x) if x >= *upper => Value::Real(*upper),
                Some(x) if x <= *lower => Value::Real(*lower),
                Some(x) => Value::Real(x),
                None => self.sample(rng),
            },
            VariableKind::Integer { lower, upper } => match numeric {
                Some(x) => {
                    let rounded = x.round();
                    if rounded >= *upper as f64 {
                        Value::Integer(*upper)
                    } else if rounded <= *lower as f64 {
                        Value::Integer(*lower)
                    } else {
                        Value::Integer(rounded as i64)
                    }
                }
                None => self.sample(rng),
            },
            VariableKind::Enumerated { values } => match value.and_then(Value::as_category) {
                Some(token) if values.iter().any(|v| v == token) => {
                    Value::Category(token.to_string())
                }
                _ => self.sample(rng),
            },
            VariableKind::Binary => match numeric {
                Some(x) if x == 0.0 => Value::Bit(0),
                Some(x) if x == 1.0 => Value::Bit(1),
                _ => self.sample(rng),
            },
        }
    }

    /// Whether `value` already lies inside this variable's domain.
    pub fn contains(&self, value: &Value) -> bool {
        match (&self.kind, value) {
            (VariableKind::Continuous { lower, upper }, Value::Real(x)) => {
                x.is_finite() && *x >= *lower && *x <= *upper
            }
            (VariableKind::Integer { lower, upper }, Value::Integer(n)) => {
                *n >= *lower && *n <= *upper
            }
            (VariableKind::Enumerated { values }, Value::Category(token)) => {
                values.iter().any(|v| v == token)
            }
            (VariableKind::Binary, Value::Bit(b)) => *b <= 1,
            _ => false,
        }
    }

    fn validate(&self) -> Result<()> {
        match &self.kind {
            VariableKind::Continuous { lower, upper } => {
                if !lower.is_finite() || !upper.is_finite() {
                    return Err(GeneticError::Configuration(format!(
                        "Bounds of variable '{}' must be finite",
                        self.name
                    )));
                }
                if lower > upper {
                    return Err(GeneticError::Configuration(format!(
                        "Lower bound {} exceeds upper bound {} for variable '{}'",
                        lower, upper, self.name
                    )));
                }
            }
            VariableKind::Integer { lower, upper } => {
                if lower > upper {
                    return Err(GeneticError::Configuration(format!(
                        "Lower bound {} exceeds upper bound {} for variable '{}'",
                        lower, upper, self.name
                    )));
                }
            }
            VariableKind::Enumerated { values } => {
                if values.is_empty() {
                    return Err(GeneticError::Configuration(format!(
                        "Enumerated variable '{}' has no allowed values",
                        self.name
                    )));
                }
            }
            VariableKind::Binary => {}
        }
        Ok(())
    }
}

/// A raw, untyped variable descriptor as it appears in configuration files.
///
/// Converted into a [`Variable`] by [`SearchSpace::from_config`], which rejects
/// unknown types and missing bounds.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableConfig {
    #[cfg_attr(feature = "serde", serde(rename = "Type"))]
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(rename = "LBound", default))]
    pub lower: Option<f64>,
    #[cfg_attr(feature = "serde", serde(rename = "UBound", default))]
    pub upper: Option<f64>,
    #[cfg_attr(feature = "serde", serde(rename = "Values", default))]
    pub values: Option<Vec<String>>,
}

impl VariableConfig {
    fn into_variable(self, name: &str) -> Result<Variable> {
        let variable_type =
            self.kind
                .parse::<VariableType>()
                .map_err(|found| GeneticError::UnknownVariableType {
                    variable: name.to_string(),
                    found,
                })?;

        let bounds = |lower: Option<f64>, upper: Option<f64>| -> Result<(f64, f64)> {
            match (lower, upper) {
                (Some(l), Some(u)) => Ok((l, u)),
                _ => Err(GeneticError::Configuration(format!(
                    "Variable '{}' of type '{}' requires LBound and UBound",
                    name, variable_type
                ))),
            }
        };

        let kind = match variable_type {
            VariableType::Continuous => {
                let (lower, upper) = bounds(self.lower, self.upper)?;
                VariableKind::Continuous { lower, upper }
            }
            VariableType::Integer => {
                let (lower, upper) = bounds(self.lower, self.upper)?;
                VariableKind::Integer {
                    lower: lower.ceil() as i64,
                    upper: upper.floor() as i64,
                }
            }
            VariableType::Enumerated => VariableKind::Enumerated {
                values: self.values.ok_or_else(|| {
                    GeneticError::Configuration(format!(
                        "Variable '{}' of type 'enumerate' requires Values",
                        name
                    ))
                })?,
            },
            VariableType::Binary => VariableKind::Binary,
        };

        Ok(Variable::new(name, kind))
    }
}

/// Immutable description of the decision variables, in a stable order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpace {
    variables: Vec<Variable>,
}

impl SearchSpace {
    /// Creates a search space from typed variables, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for duplicate names, reversed or
    /// non-finite bounds, or an enumeration without values.
    pub fn new(variables: Vec<Variable>) -> Result<Self> {
        let mut seen = HashSet::new();
        for variable in &variables {
            if !seen.insert(variable.name()) {
                return Err(GeneticError::Configuration(format!(
                    "Duplicate variable name '{}'",
                    variable.name()
                )));
            }
            variable.validate()?;
        }
        Ok(Self { variables })
    }

    /// Builds a search space from raw name → descriptor entries.
    ///
    /// Variables are ordered by name.
    pub fn from_config(config: BTreeMap<String, VariableConfig>) -> Result<Self> {
        let variables = config
            .into_iter()
            .map(|(name, descriptor)| descriptor.into_variable(&name))
            .collect::<Result<Vec<_>>>()?;
        Self::new(variables)
    }

    /// Returns an empty [`SearchSpaceBuilder`].
    pub fn builder() -> SearchSpaceBuilder {
        SearchSpaceBuilder::default()
    }

    /// Returns the number of decision variables.
    pub fn number_of_variables(&self) -> usize {
        self.variables.len()
    }

    /// Returns the variable names in the space's stable order.
    ///
    /// Every operator walks the variables in this order, so the random draws of a
    /// run depend on it.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(Variable::name).collect()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Looks up a variable by name.
    ///
    /// # Returns
    ///
    /// `None` if no variable is called `name`.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name() == name)
    }

    /// Returns the type of the variable called `name`, if there is one.
    pub fn variable_type(&self, name: &str) -> Option<VariableType> {
        self.variable(name).map(|v| v.kind().variable_type())
    }

    /// Lower bound of a continuous or integer variable; `None` for other types.
    pub fn lower_bound(&self, name: &str) -> Option<f64> {
        match self.variable(name)?.kind() {
            VariableKind::Continuous { lower, .. } => Some(*lower),
            VariableKind::Integer { lower, .. } => Some(*lower as f64),
            _ => None,
        }
    }

    /// Upper bound of a continuous or integer variable; `None` for other types.
    pub fn upper_bound(&self, name: &str) -> Option<f64> {
        match self.variable(name)?.kind() {
            VariableKind::Continuous { upper, .. } => Some(*upper),
            VariableKind::Integer { upper, .. } => Some(*upper as f64),
            _ => None,
        }
    }

    /// Allowed tokens of an enumerated variable; `None` for other types.
    pub fn allowed_values(&self, name: &str) -> Option<&[String]> {
        match self.variable(name)?.kind() {
            VariableKind::Enumerated { values } => Some(values),
            _ => None,
        }
    }
}

/// Fluent builder for [`SearchSpace`].
#[derive(Debug, Clone, Default)]
pub struct SearchSpaceBuilder {
    variables: Vec<Variable>,
}

impl SearchSpaceBuilder {
    /// Adds a real-valued variable on the closed interval `[lower, upper]`.
    pub fn continuous(mut self, name: impl Into<String>, lower: f64, upper: f64) -> Self {
        self.variables
            .push(Variable::new(name, VariableKind::Continuous { lower, upper }));
        self
    }

    /// Adds an integer variable on the closed interval `[lower, upper]`.
    pub fn integer(mut self, name: impl Into<String>, lower: i64, upper: i64) -> Self {
        self.variables
            .push(Variable::new(name, VariableKind::Integer { lower, upper }));
        self
    }

    /// Adds a categorical variable whose value is one of `values`.
    ///
    /// The order of `values` matters: blend crossover works on positions in this list.
    pub fn enumerated<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.variables
            .push(Variable::new(name, VariableKind::Enumerated { values }));
        self
    }

    /// Adds a 0/1 variable.
    pub fn binary(mut self, name: impl Into<String>) -> Self {
        self.variables.push(Variable::new(name, VariableKind::Binary));
        self
    }

    /// Validates the variables and builds the [`SearchSpace`].
    ///
    /// # Errors
    ///
    /// Fails with a `Configuration` error on a duplicate name, reversed or
    /// non-finite bounds, or an enumeration without values.
    pub fn build(self) -> Result<SearchSpace> {
        SearchSpace::new(self.variables)
    }
}
