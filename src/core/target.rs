//! Targets - one concrete point in the build matrix.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One axis assignment inside a [`Target`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AxisValue {
    pub axis: String,
    pub value: String,
}

/// A concrete assignment of exactly one value per axis.
///
/// Targets are immutable once created. Equality and hashing use the full
/// ordered `(axis, value)` tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target {
    values: Vec<AxisValue>,
}

impl Target {
    /// Create a target from `(axis, value)` pairs in axis declaration order.
    pub fn from_pairs<I, A, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, V)>,
        A: Into<String>,
        V: Into<String>,
    {
        Target {
            values: pairs
                .into_iter()
                .map(|(axis, value)| AxisValue {
                    axis: axis.into(),
                    value: value.into(),
                })
                .collect(),
        }
    }

    /// Value of `axis`, if the target has that axis.
    pub fn get(&self, axis: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.axis == axis)
            .map(|v| v.value.as_str())
    }

    pub fn has_axis(&self, axis: &str) -> bool {
        self.values.iter().any(|v| v.axis == axis)
    }

    pub fn values(&self) -> &[AxisValue] {
        &self.values
    }

    pub fn axes(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.axis.as_str())
    }

    /// Derived configuration name: the values joined by `_` in axis order,
    /// e.g. `win64_vs2017_debug`.
    pub fn name(&self) -> String {
        self.values
            .iter()
            .map(|v| v.value.as_str())
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Whether `query` names this target, either by derived name or by the
    /// `axis=value,...` form. Comparison is case-insensitive.
    pub fn matches_query(&self, query: &str) -> bool {
        if self.name().eq_ignore_ascii_case(query) {
            return true;
        }

        let mut any = false;
        for part in query.split(',') {
            let Some((axis, value)) = part.split_once('=') else {
                return false;
            };
            match self.get(axis.trim()) {
                Some(v) if v.eq_ignore_ascii_case(value.trim()) => any = true,
                _ => return false,
            }
        }
        any
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
