//! Build axes - the orthogonal dimensions of the build matrix.
//!
//! An [`AxisSet`] is an ordered list of named axes. Order matters: it decides
//! the order of the expanded targets and the shape of derived configuration
//! names.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::builder::errors::PlanError;

/// Conventional axis names.
pub mod names {
    /// Target platform, e.g. `win64`.
    pub const PLATFORM: &str = "platform";
    /// IDE / toolchain version, e.g. `vs2017`, `vs2022`.
    pub const DEV_ENV: &str = "devenv";
    /// Optimization level, e.g. `debug`, `release`.
    pub const OPTIMIZATION: &str = "optimization";
}

/// A named dimension with an ordered set of discrete values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Axis {
    pub name: String,
    pub values: Vec<String>,
}

impl Axis {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Axis {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// Ordered collection of axes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisSet {
    axes: Vec<Axis>,
}

impl AxisSet {
    pub fn new(axes: Vec<Axis>) -> Self {
        AxisSet { axes }
    }

    /// Builder-style append.
    pub fn with_axis<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.axes.push(Axis::new(name, values));
        self
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn axis(&self, name: &str) -> Option<&Axis> {
        self.axes.iter().find(|a| a.name == name)
    }

    pub fn contains_axis(&self, name: &str) -> bool {
        self.axis(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// Number of targets the set expands to.
    pub fn cardinality(&self) -> usize {
        if self.axes.is_empty() {
            return 0;
        }
        self.axes.iter().map(Axis::len).product()
    }

    /// Check the structural invariants: at least one axis, no empty axis,
    /// no duplicate axis names and no duplicate values within an axis.
    /// Values end up in `conf.name` and output paths, so each must be a
    /// single path segment.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.axes.is_empty() {
            return Err(PlanError::config(
                "no axes declared; at least one axis is required to expand targets",
            ));
        }

        let mut seen_axes = HashSet::new();
        for axis in &self.axes {
            if axis.name.trim().is_empty() {
                return Err(PlanError::config("axis with an empty name"));
            }
            if !seen_axes.insert(axis.name.as_str()) {
                return Err(PlanError::config(format!(
                    "axis `{}` is declared more than once",
                    axis.name
                )));
            }
            if axis.values.is_empty() {
                return Err(PlanError::config(format!(
                    "axis `{}` has no values",
                    axis.name
                )));
            }

            let mut seen_values = HashSet::new();
            for value in &axis.values {
                if value.trim().is_empty() {
                    return Err(PlanError::config(format!(
                        "axis `{}` has an empty value",
                        axis.name
                    )));
                }
                if value.contains(['/', '\\']) || value == "." || value == ".." {
                    return Err(PlanError::config(format!(
                        "value `{}` of axis `{}` is not a single path segment",
                        value, axis.name
                    )));
                }
                if !seen_values.insert(value.as_str()) {
                    return Err(PlanError::config(format!(
                        "value `{}` appears more than once in axis `{}`",
                        value, axis.name
                    )));
                }
            }
        }

        Ok(())
    }
}

impl From<Vec<Axis>> for AxisSet {
    fn from(axes: Vec<Axis>) -> Self {
        AxisSet::new(axes)
    }
}
