use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

// ---------------------------------------------------------------------------
// ElementKind – how a leaf dataset stores its elements
// ---------------------------------------------------------------------------

/// Element kind of a leaf dataset in the source container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Floating-point scalar elements.
    Float,
    /// Integer scalar elements.
    Integer,
    /// Compound/record elements – read as a table, never shape-grouped.
    Structured,
    /// Anything else (strings, opaque, references). Skipped entirely.
    Other,
}

impl ElementKind {
    /// Whether leaves of this kind take part in extraction at all.
    pub fn is_eligible(self) -> bool {
        !matches!(self, ElementKind::Other)
    }

    /// Whether leaves of this kind are grouped by shape (scalar numeric).
    pub fn is_plain(self) -> bool {
        matches!(self, ElementKind::Float | ElementKind::Integer)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementKind::Float => "float",
            ElementKind::Integer => "integer",
            ElementKind::Structured => "structured",
            ElementKind::Other => "other",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Values / ValueArray – materialized leaf data
// ---------------------------------------------------------------------------

/// Materialized element storage, one variant per supported column type.
///
/// Plain leaves only ever produce `Float` or `Integer`; the `Text` and `Bool`
/// variants carry columns decoded from structured (tabular) leaves.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Values {
    Float(Vec<f64>),
    Integer(Vec<i64>),
    Text(Vec<String>),
    Bool(Vec<bool>),
}

impl Values {
    /// Number of stored elements.
    pub fn len(&self) -> usize {
        match self {
            Values::Float(v) => v.len(),
            Values::Integer(v) => v.len(),
            Values::Text(v) => v.len(),
            Values::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The values as `f64`, when they are numeric.
    pub fn as_f64(&self) -> Option<Vec<f64>> {
        match self {
            Values::Float(v) => Some(v.clone()),
            Values::Integer(v) => Some(v.iter().map(|&i| i as f64).collect()),
            _ => None,
        }
    }
}

/// A shaped, fully materialized array read from one leaf or table column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueArray {
    /// Dimension sizes, outermost first. Zero-length dims are valid.
    pub shape: Vec<usize>,
    pub values: Values,
}

impl ValueArray {
    pub fn floats(shape: Vec<usize>, values: Vec<f64>) -> Self {
        ValueArray {
            shape,
            values: Values::Float(values),
        }
    }

    pub fn integers(shape: Vec<usize>, values: Vec<i64>) -> Self {
        ValueArray {
            shape,
            values: Values::Integer(values),
        }
    }

    /// Element count implied by the shape (product of the dims).
    pub fn n_elements(&self) -> usize {
        self.shape.iter().product()
    }
}

// ---------------------------------------------------------------------------
// Component / Dataset – the normalized output records
// ---------------------------------------------------------------------------

/// One named column/array of values inside a [`Dataset`], plus an optional
/// unit string carried over from the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    pub values: ValueArray,
    pub unit: Option<String>,
}

impl Component {
    pub fn new(values: ValueArray) -> Self {
        Component { values, unit: None }
    }

    pub fn with_unit(values: ValueArray, unit: impl Into<String>) -> Self {
        Component {
            values,
            unit: Some(unit.into()),
        }
    }
}

/// A normalized, flat output record: one label plus an ordered set of named
/// components. Component insertion order is preserved and is part of the
/// extraction contract – downstream consumers see columns in the order the
/// source presented them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    components: IndexMap<String, Component>,
}

impl Dataset {
    pub fn new(label: impl Into<String>) -> Self {
        Dataset {
            label: label.into(),
            components: IndexMap::new(),
        }
    }

    /// Add a component under the given label, keeping insertion order.
    pub fn add_component(&mut self, label: impl Into<String>, component: Component) {
        self.components.insert(label.into(), component);
    }

    pub fn component(&self, label: &str) -> Option<&Component> {
        self.components.get(label)
    }

    /// Components in insertion order.
    pub fn components(&self) -> impl Iterator<Item = (&str, &Component)> {
        self.components.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Component labels in insertion order.
    pub fn component_labels(&self) -> Vec<&str> {
        self.components.keys().map(|k| k.as_str()).collect()
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
