//! Slipway.toml manifest parsing and schema.
//!
//! The manifest declares a default axis set, any number of projects and any
//! number of solutions. Projects and solutions may override the axis set and
//! carry an ordered list of rules:
//!
//! ```toml
//! [[axis]]
//! name = "devenv"
//! values = ["vs2017", "vs2022"]
//!
//! [[project]]
//! name = "BirdGame"
//!
//! [[project.rule]]
//! select = "project_path"
//! branches = [{ when = { devenv = "vs2017" }, value = "[project.root]/legacy" }]
//! default = "[project.root]/current"
//!
//! [[solution]]
//! name = "BirdGame"
//! projects = ["BirdGame"]
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use thiserror::Error;

use crate::builder::errors::{PlanError, PlanErrors};
use crate::builder::path::PathTemplate;
use crate::builder::rules::{
    AxisMatch, Branch, Effects, Field, FieldParseError, Predicate, Rule, RuleSet, Select,
};
use crate::core::options::VcOption;
use crate::core::step::{CopyStep, DebuggerSettings};
use crate::core::{Axis, AxisSet, ProjectSpec, SolutionSpec};
use crate::util::diagnostic::ManifestParseError;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Slipway.toml";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find `{}` in `{}` or any parent directory", MANIFEST_NAME, dir.display())]
    NotFound { dir: PathBuf },
}

/// Find the manifest starting at `start` and searching upward.
pub fn find_manifest(start: &Path) -> Result<PathBuf, ManifestError> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(ManifestError::NotFound {
                dir: start.to_path_buf(),
            });
        }
    }
}

/// A parsed and validated manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Directory containing the manifest; bound to `[project.root]` and
    /// `[solution.root]`.
    pub root: PathBuf,

    /// Axis set shared by every project and solution that declares none.
    pub axes: AxisSet,

    pub projects: Vec<ProjectSpec>,

    pub solutions: Vec<SolutionSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    axis: Vec<Axis>,
    #[serde(default)]
    project: Vec<RawProject>,
    #[serde(default)]
    solution: Vec<RawSolution>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProject {
    name: String,
    source_root: Option<PathTemplate>,
    #[serde(default)]
    additional_source_roots: Vec<PathTemplate>,
    #[serde(default)]
    axis: Vec<Axis>,
    #[serde(default)]
    rule: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSolution {
    name: String,
    #[serde(default)]
    axis: Vec<Axis>,
    /// Always-on shorthand for a rule adding these projects.
    #[serde(default)]
    projects: Vec<String>,
    #[serde(default)]
    rule: Vec<RawRule>,
}

/// One `[[project.rule]]` or `[[solution.rule]]` entry. Either a select
/// (`select` + `branches` + optional `default`) or a conditional bundle of
/// effects (`when` / `unless` + effects).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    when: Option<BTreeMap<String, AxisMatch>>,
    unless: Option<BTreeMap<String, AxisMatch>>,

    select: Option<String>,
    #[serde(default)]
    branches: Vec<RawBranch>,
    default: Option<String>,

    #[serde(default)]
    set: BTreeMap<String, String>,
    #[serde(default)]
    options: Vec<VcOption>,
    #[serde(default)]
    flags: BTreeMap<String, String>,
    #[serde(default)]
    include_paths: Vec<PathTemplate>,
    #[serde(default)]
    libraries: Vec<String>,
    #[serde(default)]
    post_build_copy: Vec<CopyStep<PathTemplate>>,
    debugger: Option<DebuggerSettings<PathTemplate>>,
    #[serde(default)]
    projects: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBranch {
    #[serde(default)]
    when: BTreeMap<String, AxisMatch>,
    #[serde(default)]
    unless: BTreeMap<String, AxisMatch>,
    value: String,
}

impl RawRule {
    fn has_effects(&self) -> bool {
        !self.set.is_empty()
            || !self.options.is_empty()
            || !self.flags.is_empty()
            || !self.include_paths.is_empty()
            || !self.libraries.is_empty()
            || !self.post_build_copy.is_empty()
            || self.debugger.is_some()
            || !self.projects.is_empty()
    }

    fn lower(self, owner: &str, index: usize) -> Result<Rule, PlanError> {
        let at = |msg: &str| PlanError::config(format!("{}, rule {}: {}", owner, index + 1, msg));

        if let Some(ref field) = self.select {
            if self.when.is_some() || self.unless.is_some() {
                return Err(at("a select cannot carry `when`/`unless`; put them on its branches"));
            }
            if self.has_effects() {
                return Err(at("a select cannot carry other effects"));
            }
            let field: Field = field.parse().map_err(|e: FieldParseError| at(&e.to_string()))?;
            let branches = self
                .branches
                .into_iter()
                .map(|b| Branch {
                    predicate: Predicate {
                        all: b.when,
                        none: b.unless,
                    },
                    value: b.value,
                })
                .collect();
            return Ok(Rule::Select(Select {
                field,
                branches,
                default: self.default,
            }));
        }

        if !self.branches.is_empty() || self.default.is_some() {
            return Err(at("`branches` and `default` require `select`"));
        }

        let mut set = BTreeMap::new();
        for (name, value) in self.set {
            let field: Field = name.parse().map_err(|e: FieldParseError| at(&e.to_string()))?;
            set.insert(field, value);
        }

        Ok(Rule::When {
            predicate: Predicate {
                all: self.when.unwrap_or_default(),
                none: self.unless.unwrap_or_default(),
            },
            effects: Effects {
                set,
                options: self.options,
                flags: self.flags,
                include_paths: self.include_paths,
                libraries: self.libraries,
                post_build_copy: self.post_build_copy,
                debugger: self.debugger,
                projects: self.projects,
            },
        })
    }
}

fn lower_rules(raw: Vec<RawRule>, owner: &str, errors: &mut PlanErrors) -> RuleSet {
    raw.into_iter()
        .enumerate()
        .filter_map(|(i, rule)| match rule.lower(owner, i) {
            Ok(rule) => Some(rule),
            Err(e) => {
                errors.push(e);
                None
            }
        })
        .collect()
}

fn axes_or_default(own: Vec<Axis>, default: &AxisSet) -> AxisSet {
    if own.is_empty() {
        default.clone()
    } else {
        AxisSet::new(own)
    }
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = crate::util::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Parse manifest content. `path` names the file in diagnostics and its
    /// parent directory becomes the manifest root.
    ///
    /// Syntax errors come back as [`ManifestParseError`], semantic ones as
    /// [`PlanErrors`]; both can be recovered with `downcast_ref`.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| MANIFEST_NAME.to_string());
        let raw: RawManifest = toml::from_str(content)
            .map_err(|e| ManifestParseError::from_toml(&file, content, &e))?;

        let root = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self::lower(raw, root)?)
    }

    fn lower(raw: RawManifest, root: PathBuf) -> Result<Self, PlanErrors> {
        let mut errors = PlanErrors::new();
        let axes = AxisSet::new(raw.axis);

        let mut seen = HashSet::new();
        let mut projects = Vec::with_capacity(raw.project.len());
        for p in raw.project {
            if p.name.trim().is_empty() {
                errors.push(PlanError::config("project with an empty name"));
                continue;
            }
            if !seen.insert(p.name.clone()) {
                errors.push(PlanError::config(format!(
                    "project `{}` is declared more than once",
                    p.name
                )));
                continue;
            }

            let mut spec = ProjectSpec::new(p.name, &root, axes_or_default(p.axis, &axes));
            let owner = spec.owner();
            if let Some(source_root) = p.source_root {
                spec.source_root = source_root;
            }
            spec.additional_source_roots = p.additional_source_roots;
            spec.rules = lower_rules(p.rule, &owner, &mut errors);
            projects.push(spec);
        }

        let mut seen_solutions = HashSet::new();
        let mut solutions = Vec::with_capacity(raw.solution.len());
        for s in raw.solution {
            if s.name.trim().is_empty() {
                errors.push(PlanError::config("solution with an empty name"));
                continue;
            }
            if !seen_solutions.insert(s.name.clone()) {
                errors.push(PlanError::config(format!(
                    "solution `{}` is declared more than once",
                    s.name
                )));
                continue;
            }

            let mut spec = SolutionSpec::new(s.name, &root, axes_or_default(s.axis, &axes));
            let owner = spec.owner();

            let mut rules = RuleSet::new();
            if !s.projects.is_empty() {
                rules.push(Rule::When {
                    predicate: Predicate::always(),
                    effects: Effects {
                        projects: s.projects,
                        ..Effects::default()
                    },
                });
            }
            for rule in lower_rules(s.rule, &owner, &mut errors).rules() {
                rules.push(rule.clone());
            }

            spec.rules = rules;

            for name in spec.referenced_projects() {
                if !seen.contains(name) {
                    errors.push(PlanError::config(format!(
                        "{} references unknown project `{}`",
                        owner, name
                    )));
                }
            }
            solutions.push(spec);
        }

        tracing::debug!(
            "manifest at {}: {} projects, {} solutions",
            root.display(),
            projects.len(),
            solutions.len()
        );

        errors.into_result(Manifest {
            root,
            axes,
            projects,
            solutions,
        })
    }

    pub fn project(&self, name: &str) -> Option<&ProjectSpec> {
        self.projects.iter().find(|p| p.name == name)
    }

    pub fn solution(&self, name: &str) -> Option<&SolutionSpec> {
        self.solutions.iter().find(|s| s.name == name)
    }
}

/// Starter manifest written by `slipway init`: one project and one solution
/// over `{win64} x {vs2017, vs2022} x {debug, release}`.
pub fn generate_manifest(name: &str) -> String {
    format!(
        r#"# Axes are expanded in declaration order; the first varies slowest.
[[axis]]
name = "platform"
values = ["win64"]

[[axis]]
name = "devenv"
values = ["vs2017", "vs2022"]

[[axis]]
name = "optimization"
values = ["debug", "release"]

[[project]]
name = "{name}"

[[project.rule]]
select = "project_path"
branches = [
    {{ when = {{ devenv = "vs2017" }}, value = "[project.root]/generated/vs2017" }},
    {{ when = {{ devenv = "vs2022" }}, value = "[project.root]/generated/vs2022" }},
]

[[project.rule]]
options = [
    {{ character_set = "unicode" }},
    {{ warning_level = "level3" }},
    {{ cpp_language_standard = "cpp17" }},
    {{ sub_system = "windows" }},
]
include_paths = ["[project.root]/include"]
debugger = {{ working_directory = "[conf.target_path]" }}

[[project.rule]]
when = {{ devenv = "vs2022" }}
options = [{{ windows_target_platform_version = "latest" }}]

[[solution]]
name = "{name}"
projects = ["{name}"]

[[solution.rule]]
select = "solution_path"
branches = [
    {{ when = {{ devenv = "vs2017" }}, value = "[solution.root]/generated/vs2017" }},
    {{ when = {{ devenv = "vs2022" }}, value = "[solution.root]/generated/vs2022" }},
]
"#,
        name = name
    )
}
