//! Resolved configurations.
//!
//! A [`Configuration`] is the complete, resolved set of build settings for one
//! (project, target) pair. It is only produced by the configuration builder
//! and is never modified afterwards; a changed rule set means building a new
//! one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::options::VcOption;
use crate::core::step::{BuildStep, CopyStep, DebuggerSettings};
use crate::core::Target;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub(crate) project_name: String,
    pub(crate) name: String,
    pub(crate) target: Target,
    pub(crate) project_path: PathBuf,
    pub(crate) target_path: PathBuf,
    pub(crate) intermediate_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) precomp_header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) precomp_source: Option<String>,
    pub(crate) steps: Vec<BuildStep>,
    pub(crate) options: BTreeMap<String, String>,
}

impl Configuration {
    /// Name of the generated project file (without extension).
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Derived configuration name, e.g. `win64_vs2017_debug`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Directory the project file is generated into.
    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// Output root for build artifacts.
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    pub fn intermediate_path(&self) -> &Path {
        &self.intermediate_path
    }

    pub fn precomp_header(&self) -> Option<&str> {
        self.precomp_header.as_deref()
    }

    pub fn precomp_source(&self) -> Option<&str> {
        self.precomp_source.as_deref()
    }

    /// All build steps in declaration order.
    pub fn steps(&self) -> &[BuildStep] {
        &self.steps
    }

    /// Effective emitter options (last writer wins per key).
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn compiler_options(&self) -> impl Iterator<Item = &VcOption> {
        self.steps.iter().filter_map(|s| match s {
            BuildStep::CompilerOption { option } => Some(option),
            _ => None,
        })
    }

    pub fn linker_options(&self) -> impl Iterator<Item = &VcOption> {
        self.steps.iter().filter_map(|s| match s {
            BuildStep::LinkerOption { option } => Some(option),
            _ => None,
        })
    }

    pub fn include_paths(&self) -> impl Iterator<Item = &Path> {
        self.steps.iter().filter_map(|s| match s {
            BuildStep::IncludePath { path } => Some(path.as_path()),
            _ => None,
        })
    }

    pub fn libraries(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|s| match s {
            BuildStep::LibraryReference { name } => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn post_build_copies(&self) -> impl Iterator<Item = &CopyStep> {
        self.steps.iter().filter_map(|s| match s {
            BuildStep::PostBuildCopy(copy) => Some(copy),
            _ => None,
        })
    }

    /// The last debugger setting declared, if any.
    pub fn debugger(&self) -> Option<&DebuggerSettings> {
        self.steps.iter().rev().find_map(|s| match s {
            BuildStep::DebuggerSetting(settings) => Some(settings),
            _ => None,
        })
    }
}
