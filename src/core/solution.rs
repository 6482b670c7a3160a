//! Solutions - aggregates of projects with one active configuration per
//! project and target.
//!
//! A [`Solution`] borrows the projects it references; project lifetime is
//! owned by the caller. [`SolutionDescriptor`] is the owned, serializable
//! shape handed to emitters.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::builder::rules::{Rule, RuleSet};
use crate::core::{AxisSet, Configuration, Project, Target};
use crate::util::fs::relative_path;

/// A solution as declared in the manifest.
#[derive(Debug, Clone)]
pub struct SolutionSpec {
    pub name: String,
    /// Directory the manifest lives in; bound to `[solution.root]`.
    pub root: PathBuf,
    pub axes: AxisSet,
    pub rules: RuleSet,
}

impl SolutionSpec {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, axes: AxisSet) -> Self {
        SolutionSpec {
            name: name.into(),
            root: root.into(),
            axes,
            rules: RuleSet::new(),
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn owner(&self) -> String {
        format!("solution `{}`", self.name)
    }

    /// Every project any rule may add, regardless of target.
    pub fn referenced_projects(&self) -> BTreeSet<&str> {
        self.rules
            .rules()
            .iter()
            .filter_map(|rule| match rule {
                Rule::When { effects, .. } => Some(effects.projects.iter().map(String::as_str)),
                Rule::Select(_) => None,
            })
            .flatten()
            .collect()
    }
}

/// A composed solution.
#[derive(Debug, Clone)]
pub struct Solution<'a> {
    pub(crate) name: String,
    pub(crate) targets: Vec<Target>,
    pub(crate) projects: Vec<&'a Project>,
    pub(crate) configurations: Vec<SolutionConfiguration<'a>>,
}

/// The solution's view of one target.
#[derive(Debug, Clone)]
pub struct SolutionConfiguration<'a> {
    pub(crate) target: Target,
    pub(crate) solution_path: PathBuf,
    pub(crate) entries: Vec<SolutionEntry<'a>>,
}

/// Which configuration of a project is active for a solution target.
#[derive(Debug, Clone, Copy)]
pub struct SolutionEntry<'a> {
    pub project: &'a Project,
    pub configuration: &'a Configuration,
}

impl<'a> Solution<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Every project referenced by at least one target, in first-use order.
    pub fn projects(&self) -> &[&'a Project] {
        &self.projects
    }

    pub fn configurations(&self) -> &[SolutionConfiguration<'a>] {
        &self.configurations
    }

    pub fn configuration(&self, target: &Target) -> Option<&SolutionConfiguration<'a>> {
        self.configurations.iter().find(|c| &c.target == target)
    }

    /// Owned descriptor for emitters.
    pub fn to_descriptor(&self) -> SolutionDescriptor {
        let projects = self
            .projects
            .iter()
            .map(|project| ProjectDescriptor {
                name: project.name().to_string(),
                guid: project.guid().to_string(),
                source_root: project.source_root().to_path_buf(),
                additional_source_roots: project.additional_source_roots().to_vec(),
                configurations: self
                    .targets
                    .iter()
                    .filter_map(|target| {
                        project.configuration(target).map(|c| TargetConfiguration {
                            target: target.clone(),
                            configuration: c.clone(),
                        })
                    })
                    .collect(),
            })
            .collect();

        let configurations = self
            .configurations
            .iter()
            .map(|sc| SolutionConfigurationDescriptor {
                target: sc.target.clone(),
                name: sc.name(),
                solution_path: sc.solution_path.clone(),
                projects: sc
                    .entries
                    .iter()
                    .map(|entry| ActiveProject {
                        project: entry.project.name().to_string(),
                        configuration: entry.configuration.name().to_string(),
                        project_file: project_file(&sc.solution_path, entry.configuration),
                    })
                    .collect(),
            })
            .collect();

        SolutionDescriptor {
            name: self.name.clone(),
            targets: self.targets.clone(),
            projects,
            configurations,
        }
    }
}

impl<'a> SolutionConfiguration<'a> {
    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn name(&self) -> String {
        self.target.name()
    }

    /// Directory the solution file is generated into for this target.
    pub fn solution_path(&self) -> &Path {
        &self.solution_path
    }

    pub fn entries(&self) -> &[SolutionEntry<'a>] {
        &self.entries
    }
}

/// Project file location relative to the solution directory, falling back to
/// the absolute location when no relative path exists.
fn project_file(solution_path: &Path, configuration: &Configuration) -> PathBuf {
    let file = configuration
        .project_path()
        .join(configuration.project_name());
    relative_path(solution_path, &file)
}

/// Serializable solution shape consumed by emitters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionDescriptor {
    pub name: String,
    pub targets: Vec<Target>,
    pub projects: Vec<ProjectDescriptor>,
    pub configurations: Vec<SolutionConfigurationDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub name: String,
    pub guid: String,
    pub source_root: PathBuf,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_source_roots: Vec<PathBuf>,
    pub configurations: Vec<TargetConfiguration>,
}

/// One `target -> configuration` association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfiguration {
    pub target: Target,
    pub configuration: Configuration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionConfigurationDescriptor {
    pub target: Target,
    pub name: String,
    pub solution_path: PathBuf,
    pub projects: Vec<ActiveProject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveProject {
    pub project: String,
    pub configuration: String,
    /// Project file path relative to `solution_path` (no extension).
    pub project_file: PathBuf,
}

impl SolutionDescriptor {
    /// Every `(project, target, configuration name)` association.
    pub fn associations(&self) -> Vec<(String, Target, String)> {
        self.projects
            .iter()
            .flat_map(|p| {
                p.configurations.iter().map(move |tc| {
                    (
                        p.name.clone(),
                        tc.target.clone(),
                        tc.configuration.name().to_string(),
                    )
                })
            })
            .collect()
    }

    pub fn project(&self, name: &str) -> Option<&ProjectDescriptor> {
        self.projects.iter().find(|p| p.name == name)
    }
}

impl ProjectDescriptor {
    pub fn configuration(&self, target: &Target) -> Option<&Configuration> {
        self.configurations
            .iter()
            .find(|tc| &tc.target == target)
            .map(|tc| &tc.configuration)
    }
}
