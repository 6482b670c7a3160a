//! Build steps - declarative units of build effect.
//!
//! A step is generic over its path payload so the same vocabulary serves
//! both rule effects (paths still templated) and resolved configurations
//! (concrete `PathBuf`s).

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::options::{OptionKind, VcOption};

/// A build step in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuildStep<P = PathBuf> {
    /// Compiler-side option (general or compiler page)
    CompilerOption { option: VcOption },
    /// Linker-side option
    LinkerOption { option: VcOption },
    /// Library to link against, by name
    LibraryReference { name: String },
    /// Additional include directory
    IncludePath { path: P },
    /// Copy files after a successful build
    PostBuildCopy(CopyStep<P>),
    /// Debugger launch settings
    DebuggerSetting(DebuggerSettings<P>),
}

/// Post-build copy parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyStep<P = PathBuf> {
    pub source: P,
    pub destination: P,
    /// Copy only files whose names match `pattern` exactly.
    #[serde(default)]
    pub name_specific: bool,
    #[serde(default = "default_pattern")]
    pub pattern: String,
    /// Treat `source` as a file rather than a directory tree.
    #[serde(default = "default_true")]
    pub file_copy: bool,
    #[serde(default = "default_true")]
    pub recursive: bool,
    /// Delete destination files that no longer exist in `source`.
    #[serde(default)]
    pub mirror: bool,
}

/// Debugger settings written to the IDE's per-user file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DebuggerSettings<P = PathBuf> {
    pub working_directory: P,
}

fn default_pattern() -> String {
    "*".to_string()
}

fn default_true() -> bool {
    true
}

impl<P> CopyStep<P> {
    /// Copy with default flags: `*` pattern, recursive, no mirroring.
    pub fn new(source: P, destination: P) -> Self {
        CopyStep {
            source,
            destination,
            name_specific: false,
            pattern: default_pattern(),
            file_copy: true,
            recursive: true,
            mirror: false,
        }
    }

    pub fn mirrored(mut self) -> Self {
        self.mirror = true;
        self
    }
}

impl<P> BuildStep<P> {
    /// Wrap an option in the step variant matching its kind.
    pub fn option(option: VcOption) -> Self {
        match option.kind() {
            OptionKind::Compiler => BuildStep::CompilerOption { option },
            OptionKind::Linker => BuildStep::LinkerOption { option },
        }
    }

    pub fn library(name: impl Into<String>) -> Self {
        BuildStep::LibraryReference { name: name.into() }
    }

    /// Short label for the variant, used in listings.
    pub fn label(&self) -> &'static str {
        match self {
            BuildStep::CompilerOption { .. } => "compiler",
            BuildStep::LinkerOption { .. } => "linker",
            BuildStep::LibraryReference { .. } => "library",
            BuildStep::IncludePath { .. } => "include",
            BuildStep::PostBuildCopy(_) => "post-build",
            BuildStep::DebuggerSetting(_) => "debugger",
        }
    }

    /// Convert every path payload with `f`, stopping at the first error.
    pub fn try_map_paths<Q, E, F>(self, mut f: F) -> Result<BuildStep<Q>, E>
    where
        F: FnMut(P) -> Result<Q, E>,
    {
        Ok(match self {
            BuildStep::CompilerOption { option } => BuildStep::CompilerOption { option },
            BuildStep::LinkerOption { option } => BuildStep::LinkerOption { option },
            BuildStep::LibraryReference { name } => BuildStep::LibraryReference { name },
            BuildStep::IncludePath { path } => BuildStep::IncludePath { path: f(path)? },
            BuildStep::PostBuildCopy(copy) => BuildStep::PostBuildCopy(CopyStep {
                source: f(copy.source)?,
                destination: f(copy.destination)?,
                name_specific: copy.name_specific,
                pattern: copy.pattern,
                file_copy: copy.file_copy,
                recursive: copy.recursive,
                mirror: copy.mirror,
            }),
            BuildStep::DebuggerSetting(settings) => BuildStep::DebuggerSetting(DebuggerSettings {
                working_directory: f(settings.working_directory)?,
            }),
        })
    }
}

impl fmt::Display for BuildStep<PathBuf> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStep::CompilerOption { option } | BuildStep::LinkerOption { option } => {
                write!(f, "{}", option)
            }
            BuildStep::LibraryReference { name } => write!(f, "{}", name),
            BuildStep::IncludePath { path } => write!(f, "{}", path.display()),
            BuildStep::PostBuildCopy(copy) => {
                write!(
                    f,
                    "copy {} -> {} (pattern `{}`",
                    copy.source.display(),
                    copy.destination.display(),
                    copy.pattern
                )?;
                if copy.recursive {
                    write!(f, ", recursive")?;
                }
                if copy.mirror {
                    write!(f, ", mirror")?;
                }
                write!(f, ")")
            }
            BuildStep::DebuggerSetting(settings) => {
                write!(f, "working directory {}", settings.working_directory.display())
            }
        }
    }
}
