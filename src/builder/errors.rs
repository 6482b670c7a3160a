//! Planning error types and diagnostics.

use std::fmt;

use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Error raised while expanding targets, resolving paths, building
/// configurations, or composing solutions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("invalid configuration: {message}")]
    Config { message: String },

    #[error("unresolved placeholder `[{placeholder}]` in `{template}`")]
    UnresolvedPlaceholder {
        placeholder: String,
        template: String,
    },

    #[error("{owner}: no rule sets `{field}` for target `{target}`")]
    UnhandledTarget {
        owner: String,
        target: String,
        field: String,
    },

    #[error("project `{project}` has no configuration for target `{target}`")]
    MissingConfiguration { project: String, target: String },
}

impl PlanError {
    /// Shorthand for a [`PlanError::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        PlanError::Config {
            message: message.into(),
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            PlanError::Config { message } => Diagnostic::error(format!(
                "invalid configuration: {}",
                message
            ))
            .with_suggestion("Check the axis and rule declarations in Slipway.toml"),

            PlanError::UnresolvedPlaceholder {
                placeholder,
                template,
            } => Diagnostic::error(format!("unresolved placeholder `[{}]`", placeholder))
                .with_context(format!("in template `{}`", template))
                .with_context(
                    "known placeholders: project.*, solution.*, target.<axis>, conf.name, \
                     conf.project_path, conf.target_path, conf.intermediate_path",
                )
                .with_suggestion("Fix the spelling or declare the axis the placeholder refers to"),

            PlanError::UnhandledTarget {
                owner,
                target,
                field,
            } => Diagnostic::error(format!("no value for `{}` on target `{}`", field, target))
                .with_context(format!("while configuring {}", owner))
                .with_context("no branch matched and the field has no default")
                .with_suggestion(format!("Add a branch to the `{}` select covering this target", field))
                .with_suggestion(format!("Or give the `{}` select a `default`", field)),

            PlanError::MissingConfiguration { project, target } => Diagnostic::error(format!(
                "project `{}` is not configured for target `{}`",
                project, target
            ))
            .with_context("the solution declares a target the project does not build")
            .with_suggestion(format!("Add the missing axis values to project `{}`", project))
            .with_suggestion("Or narrow the solution's axes to the project's targets"),
        }
    }
}

/// All errors collected from a batch operation.
///
/// Batch planning keeps going after a target fails so that the caller sees the
/// whole broken part of the build matrix at once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlanErrors {
    errors: Vec<PlanError>,
}

impl PlanErrors {
    pub fn new() -> Self {
        PlanErrors::default()
    }

    pub fn push(&mut self, error: PlanError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, other: PlanErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlanError> {
        self.errors.iter()
    }

    pub fn into_vec(self) -> Vec<PlanError> {
        self.errors
    }

    /// `Ok(value)` when nothing was collected.
    pub fn into_result<T>(self, value: T) -> Result<T, PlanErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<PlanError> for PlanErrors {
    fn from(error: PlanError) -> Self {
        PlanErrors {
            errors: vec![error],
        }
    }
}

impl FromIterator<PlanError> for PlanErrors {
    fn from_iter<I: IntoIterator<Item = PlanError>>(iter: I) -> Self {
        PlanErrors {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PlanErrors {
    type Item = PlanError;
    type IntoIter = std::vec::IntoIter<PlanError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for PlanErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "no errors"),
            [single] => write!(f, "{}", single),
            many => {
                write!(f, "{} errors while planning", many.len())?;
                for error in many {
                    write!(f, "\n  - {}", error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for PlanErrors {}
