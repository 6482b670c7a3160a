//! Projects - named build units owning one configuration per target.

use std::path::{Path, PathBuf};

use crate::builder::path::PathTemplate;
use crate::builder::rules::RuleSet;
use crate::core::{AxisSet, Configuration, Target};

/// A project as declared in the manifest, before any target is built.
#[derive(Debug, Clone)]
pub struct ProjectSpec {
    pub name: String,
    /// Directory the manifest lives in; bound to `[project.root]`.
    pub root: PathBuf,
    pub source_root: PathTemplate,
    pub additional_source_roots: Vec<PathTemplate>,
    pub axes: AxisSet,
    pub rules: RuleSet,
}

impl ProjectSpec {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, axes: AxisSet) -> Self {
        ProjectSpec {
            name: name.into(),
            root: root.into(),
            source_root: PathTemplate::new("[project.root]/src"),
            additional_source_roots: Vec::new(),
            axes,
            rules: RuleSet::new(),
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_source_root(mut self, template: impl Into<PathTemplate>) -> Self {
        self.source_root = template.into();
        self
    }

    /// Label used in diagnostics.
    pub fn owner(&self) -> String {
        format!("project `{}`", self.name)
    }
}

/// A built project: resolved roots plus one configuration per target, in
/// target expansion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub(crate) name: String,
    pub(crate) guid: String,
    pub(crate) root: PathBuf,
    pub(crate) source_root: PathBuf,
    pub(crate) additional_source_roots: Vec<PathBuf>,
    pub(crate) configurations: Vec<Configuration>,
}

impl Project {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stable identifier derived from the project name.
    pub fn guid(&self) -> &str {
        &self.guid
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn additional_source_roots(&self) -> &[PathBuf] {
        &self.additional_source_roots
    }

    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    /// The configuration built for `target`, matched by target equality.
    pub fn configuration(&self, target: &Target) -> Option<&Configuration> {
        self.configurations.iter().find(|c| c.target() == target)
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.configurations.iter().map(Configuration::target)
    }
}
