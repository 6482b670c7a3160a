//! User-friendly diagnostic messages.
//!
//! Every error shown to the user carries the failing target or template and
//! at least one suggested fix.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource,
    SourceSpan,
};
use thiserror::Error;

use crate::builder::errors::PlanErrors;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when no manifest file is found.
    pub const NO_MANIFEST: &str = "help: Run `slipway init` to create a starter Slipway.toml";

    /// Suggestion when a project is not found.
    pub const PROJECT_NOT_FOUND: &str = "help: Run `slipway targets` to see declared projects";

    /// Suggestion when a target query matches nothing.
    pub const TARGET_NOT_FOUND: &str =
        "help: Run `slipway targets --project <name>` to see expanded targets";
}

/// An error message with context lines and suggested fixes.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let prefix = if color {
            "\x1b[1;31merror\x1b[0m"
        } else {
            "error"
        };
        output.push_str(&format!("{}: {}\n", prefix, self.message));

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Manifest syntax or schema error, pointing at the offending span.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("failed to parse {file}: {message}")]
#[diagnostic(
    code(slipway::manifest::parse),
    help("Axes are `[[axis]]` tables; projects and solutions carry `[[project.rule]]` / `[[solution.rule]]` entries")
)]
pub struct ManifestParseError {
    pub file: String,
    pub message: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: Option<SourceSpan>,
}

impl ManifestParseError {
    pub fn from_toml(file: &str, content: &str, err: &toml::de::Error) -> Self {
        ManifestParseError {
            file: file.to_string(),
            message: err.message().to_string(),
            src: NamedSource::new(file, content.to_string()),
            span: err.span().map(SourceSpan::from),
        }
    }
}

/// Render a top-level error for the terminal.
///
/// Manifest syntax errors get a source snippet, planning failures one
/// diagnostic per failing target; anything else is shown with its cause
/// chain.
pub fn render_error(err: &anyhow::Error, color: bool) -> String {
    if let Some(parse) = err.downcast_ref::<ManifestParseError>() {
        let theme = if color {
            GraphicalTheme::unicode()
        } else {
            GraphicalTheme::unicode_nocolor()
        };
        let mut out = String::new();
        if GraphicalReportHandler::new_themed(theme)
            .render_report(&mut out, parse)
            .is_ok()
        {
            return out;
        }
    }

    if let Some(errors) = err.downcast_ref::<PlanErrors>() {
        let mut out = errors
            .iter()
            .map(|e| e.to_diagnostic().format(color))
            .collect::<Vec<_>>()
            .join("\n");
        if errors.len() > 1 {
            out.push_str(&format!("\n{} errors while planning\n", errors.len()));
        }
        return out;
    }

    Diagnostic::error(format!("{:#}", err)).format(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("no value for `project_path` on target `win64_v2_Debug`")
            .with_context("while configuring project `App`")
            .with_suggestion("Add a branch covering this target")
            .with_suggestion("Or give the select a `default`");

        let output = diag.format(false);
        assert!(output.contains("error: no value for `project_path`"));
        assert!(output.contains("while configuring project `App`"));
        assert!(output.contains("help: consider:"));
        assert!(output.contains("2. Or give the select"));
        assert!(!output.contains("-->"));
    }

    #[test]
    fn test_diagnostic_colored_prefix() {
        let output = Diagnostic::error("boom").format(true);
        assert!(output.starts_with("\x1b[1;31merror\x1b[0m: boom"));
    }

    #[test]
    fn test_manifest_parse_error_span() {
        let content = "[[axis]]\nname = \n";
        let err = toml::from_str::<toml::Value>(content).unwrap_err();
        let diag = ManifestParseError::from_toml("Slipway.toml", content, &err);

        assert_eq!(diag.file, "Slipway.toml");
        assert!(diag.span.is_some());
        assert!(diag.to_string().starts_with("failed to parse Slipway.toml"));
    }

    #[test]
    fn test_render_plan_errors() {
        use crate::builder::errors::PlanError;

        let errors: PlanErrors = vec![
            PlanError::MissingConfiguration {
                project: "BirdGame".to_string(),
                target: "win64_vs2017_debug".to_string(),
            },
            PlanError::config("axis `devenv` has no values"),
        ]
        .into_iter()
        .collect();

        let output = render_error(&anyhow::Error::new(errors), false);
        assert!(output.contains("project `BirdGame` is not configured for target `win64_vs2017_debug`"));
        assert!(output.contains("invalid configuration: axis `devenv` has no values"));
        assert!(output.ends_with("2 errors while planning\n"));
    }

    #[test]
    fn test_render_parse_error_shows_file() {
        let content = "[[axis]]\nname = \n";
        let err = toml::from_str::<toml::Value>(content).unwrap_err();
        let parse = ManifestParseError::from_toml("Slipway.toml", content, &err);

        let output = render_error(&anyhow::Error::new(parse), false);
        assert!(output.contains("Slipway.toml"));
        assert!(output.contains("here"));
    }

    #[test]
    fn test_render_plain_error_keeps_chain() {
        let err = anyhow::anyhow!("file missing").context("failed to read manifest");
        let output = render_error(&err, false);
        assert_eq!(output, "error: failed to read manifest: file missing\n");
    }
}
