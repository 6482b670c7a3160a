//! Conditional configuration rules.
//!
//! A [`RuleSet`] is an ordered list of rules folded over an empty
//! [`ConfigurationDraft`] for one target. Scalar fields are last-writer-wins;
//! steps, include paths and libraries append in declaration order.
//!
//! Two kinds of rule exist:
//! - `When`: apply a bundle of effects if the predicate matches the target.
//! - `Select`: a mutually-exclusive group choosing one scalar value. Exactly
//!   one branch must match; with no match the `default` is used, and with no
//!   default the target is reported as unhandled.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::builder::errors::PlanError;
use crate::builder::path::PathTemplate;
use crate::core::options::VcOption;
use crate::core::step::{BuildStep, CopyStep, DebuggerSettings};
use crate::core::{AxisSet, Target};

/// A build step whose paths are still templates.
pub type StepTemplate = BuildStep<PathTemplate>;

/// Matcher for a single axis value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisMatch {
    One(String),
    AnyOf(Vec<String>),
}

impl AxisMatch {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            AxisMatch::One(v) => v == value,
            AxisMatch::AnyOf(vs) => vs.iter().any(|v| v == value),
        }
    }

    fn values(&self) -> Vec<&str> {
        match self {
            AxisMatch::One(v) => vec![v.as_str()],
            AxisMatch::AnyOf(vs) => vs.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for AxisMatch {
    fn from(s: &str) -> Self {
        AxisMatch::One(s.to_string())
    }
}

/// Test on a target's axis values.
///
/// Matches when every `all` entry matches and no `none` entry does. The empty
/// predicate always matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    pub all: BTreeMap<String, AxisMatch>,
    pub none: BTreeMap<String, AxisMatch>,
}

impl Predicate {
    pub fn always() -> Self {
        Predicate::default()
    }

    /// `axis == value`
    pub fn axis_eq(axis: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::always().and(axis, AxisMatch::One(value.into()))
    }

    pub fn and(mut self, axis: impl Into<String>, matcher: AxisMatch) -> Self {
        self.all.insert(axis.into(), matcher);
        self
    }

    pub fn unless(mut self, axis: impl Into<String>, matcher: AxisMatch) -> Self {
        self.none.insert(axis.into(), matcher);
        self
    }

    pub fn is_always(&self) -> bool {
        self.all.is_empty() && self.none.is_empty()
    }

    /// Evaluate against `target`. Naming an axis the target lacks is an error.
    pub fn evaluate(&self, target: &Target) -> Result<bool, PlanError> {
        for (axis, matcher) in &self.all {
            if !matcher.matches(axis_value(target, axis)?) {
                return Ok(false);
            }
        }
        for (axis, matcher) in &self.none {
            if matcher.matches(axis_value(target, axis)?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn axes(&self) -> impl Iterator<Item = (&String, &AxisMatch)> {
        self.all.iter().chain(self.none.iter())
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_always() {
            return f.write_str("always");
        }
        let mut parts = Vec::new();
        for (axis, m) in &self.all {
            parts.push(format!("{} in [{}]", axis, m.values().join(", ")));
        }
        for (axis, m) in &self.none {
            parts.push(format!("{} not in [{}]", axis, m.values().join(", ")));
        }
        f.write_str(&parts.join(" and "))
    }
}

fn axis_value<'t>(target: &'t Target, axis: &str) -> Result<&'t str, PlanError> {
    target.get(axis).ok_or_else(|| {
        PlanError::config(format!(
            "rule tests axis `{}` but target `{}` has no such axis",
            axis, target
        ))
    })
}

/// Scalar configuration fields a rule can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ProjectName,
    ProjectPath,
    TargetPath,
    IntermediatePath,
    PrecompHeader,
    PrecompSource,
    SolutionPath,
}

/// Which kind of owner a rule set configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Project,
    Solution,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::ProjectName,
        Field::ProjectPath,
        Field::TargetPath,
        Field::IntermediatePath,
        Field::PrecompHeader,
        Field::PrecompSource,
        Field::SolutionPath,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ProjectName => "project_name",
            Field::ProjectPath => "project_path",
            Field::TargetPath => "target_path",
            Field::IntermediatePath => "intermediate_path",
            Field::PrecompHeader => "precomp_header",
            Field::PrecompSource => "precomp_source",
            Field::SolutionPath => "solution_path",
        }
    }

    pub fn scope(&self) -> Scope {
        match self {
            Field::SolutionPath => Scope::Solution,
            _ => Scope::Project,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| FieldParseError(s.to_string()))
    }
}

/// Error returned when parsing an unknown field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldParseError(pub String);

impl fmt::Display for FieldParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<_> = Field::ALL.iter().map(Field::as_str).collect();
        write!(
            f,
            "unknown field `{}`, expected one of: {}",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for FieldParseError {}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scope::Project => "project",
            Scope::Solution => "solution",
        })
    }
}

/// Effects applied by a matching `When` rule.
///
/// Within one rule the steps are appended in a fixed order: options, include
/// paths, libraries, post-build copies, debugger settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    pub set: BTreeMap<Field, String>,
    pub options: Vec<VcOption>,
    pub flags: BTreeMap<String, String>,
    pub include_paths: Vec<PathTemplate>,
    pub libraries: Vec<String>,
    pub post_build_copy: Vec<CopyStep<PathTemplate>>,
    pub debugger: Option<DebuggerSettings<PathTemplate>>,
    /// Solution only: projects to include for matching targets.
    pub projects: Vec<String>,
}

impl Effects {
    pub fn set(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set.insert(field, value.into());
        self
    }

    pub fn option(mut self, option: VcOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn flag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.flags.insert(key.into(), value.into());
        self
    }

    pub fn include_path(mut self, path: impl Into<PathTemplate>) -> Self {
        self.include_paths.push(path.into());
        self
    }

    pub fn library(mut self, name: impl Into<String>) -> Self {
        self.libraries.push(name.into());
        self
    }

    pub fn post_build_copy(mut self, copy: CopyStep<PathTemplate>) -> Self {
        self.post_build_copy.push(copy);
        self
    }

    pub fn debugger(mut self, working_directory: impl Into<PathTemplate>) -> Self {
        self.debugger = Some(DebuggerSettings {
            working_directory: working_directory.into(),
        });
        self
    }

    pub fn project(mut self, name: impl Into<String>) -> Self {
        self.projects.push(name.into());
        self
    }

    fn has_project_effects(&self) -> bool {
        !self.options.is_empty()
            || !self.flags.is_empty()
            || !self.include_paths.is_empty()
            || !self.libraries.is_empty()
            || !self.post_build_copy.is_empty()
            || self.debugger.is_some()
    }

    fn apply(&self, draft: &mut ConfigurationDraft) {
        for (field, value) in &self.set {
            draft.scalars.insert(*field, value.clone());
        }

        for option in &self.options {
            draft
                .options
                .insert(option.key().to_string(), option.value());
            draft.steps.push(BuildStep::option(option.clone()));
        }
        for (key, value) in &self.flags {
            draft.options.insert(key.clone(), value.clone());
        }

        draft.steps.extend(
            self.include_paths
                .iter()
                .map(|path| BuildStep::IncludePath { path: path.clone() }),
        );
        draft
            .steps
            .extend(self.libraries.iter().map(|name| BuildStep::library(name.clone())));
        draft.steps.extend(
            self.post_build_copy
                .iter()
                .map(|copy| BuildStep::PostBuildCopy(copy.clone())),
        );
        if let Some(ref debugger) = self.debugger {
            draft.steps.push(BuildStep::DebuggerSetting(debugger.clone()));
        }

        draft.projects.extend(self.projects.iter().cloned());
    }
}

/// One arm of a [`Select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub predicate: Predicate,
    pub value: String,
}

/// Mutually-exclusive choice of a scalar field's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    pub field: Field,
    pub branches: Vec<Branch>,
    pub default: Option<String>,
}

impl Select {
    pub fn new(field: Field) -> Self {
        Select {
            field,
            branches: Vec::new(),
            default: None,
        }
    }

    pub fn branch(mut self, predicate: Predicate, value: impl Into<String>) -> Self {
        self.branches.push(Branch {
            predicate,
            value: value.into(),
        });
        self
    }

    pub fn or_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// The value this select picks for `target`.
    pub fn choose(&self, target: &Target, owner: &str) -> Result<&str, PlanError> {
        let mut matched: Option<usize> = None;

        for (i, branch) in self.branches.iter().enumerate() {
            if !branch.predicate.evaluate(target)? {
                continue;
            }
            if let Some(first) = matched {
                return Err(PlanError::config(format!(
                    "{}: branches {} and {} of the `{}` select both match target `{}`",
                    owner,
                    first + 1,
                    i + 1,
                    self.field,
                    target
                )));
            }
            matched = Some(i);
        }

        match (matched, &self.default) {
            (Some(i), _) => Ok(self.branches[i].value.as_str()),
            (None, Some(default)) => Ok(default.as_str()),
            (None, None) => Err(PlanError::UnhandledTarget {
                owner: owner.to_string(),
                target: target.to_string(),
                field: self.field.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    When {
        predicate: Predicate,
        effects: Effects,
    },
    Select(Select),
}

impl Rule {
    fn apply(
        &self,
        target: &Target,
        owner: &str,
        draft: &mut ConfigurationDraft,
    ) -> Result<(), PlanError> {
        match self {
            Rule::When { predicate, effects } => {
                if predicate.evaluate(target)? {
                    effects.apply(draft);
                }
            }
            Rule::Select(select) => {
                let value = select.choose(target, owner)?;
                draft.scalars.insert(select.field, value.to_string());
            }
        }
        Ok(())
    }
}

/// Ordered list of rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        RuleSet::default()
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Builder-style `When` rule.
    pub fn when(mut self, predicate: Predicate, effects: Effects) -> Self {
        self.rules.push(Rule::When { predicate, effects });
        self
    }

    /// Builder-style unconditional rule.
    pub fn always(self, effects: Effects) -> Self {
        self.when(Predicate::always(), effects)
    }

    /// Builder-style `Select` rule.
    pub fn select(mut self, select: Select) -> Self {
        self.rules.push(Rule::Select(select));
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Fold every rule, in order, into a fresh draft for `target`.
    pub fn fold(&self, target: &Target, owner: &str) -> Result<ConfigurationDraft, PlanError> {
        self.rules
            .iter()
            .try_fold(ConfigurationDraft::default(), |mut draft, rule| {
                rule.apply(target, owner, &mut draft)?;
                Ok(draft)
            })
    }

    /// Static checks against the axes the rules will run over: every tested
    /// axis and value exists, fields belong to `scope`, and selects have at
    /// least one branch.
    pub fn validate(&self, scope: Scope, axes: &AxisSet, owner: &str) -> Result<(), PlanError> {
        let check_predicate = |predicate: &Predicate| -> Result<(), PlanError> {
            for (name, matcher) in predicate.axes() {
                let axis = axes.axis(name).ok_or_else(|| {
                    PlanError::config(format!("{}: rule tests unknown axis `{}`", owner, name))
                })?;
                for value in matcher.values() {
                    if !axis.contains(value) {
                        return Err(PlanError::config(format!(
                            "{}: rule tests `{} = {}` but axis `{}` has values [{}]",
                            owner,
                            name,
                            value,
                            name,
                            axis.values.join(", ")
                        )));
                    }
                }
            }
            Ok(())
        };
        let check_field = |field: Field| -> Result<(), PlanError> {
            if field.scope() != scope {
                return Err(PlanError::config(format!(
                    "{}: field `{}` cannot be set on a {}",
                    owner, field, scope
                )));
            }
            Ok(())
        };

        for rule in &self.rules {
            match rule {
                Rule::When { predicate, effects } => {
                    check_predicate(predicate)?;
                    for field in effects.set.keys() {
                        check_field(*field)?;
                    }
                    match scope {
                        Scope::Solution if effects.has_project_effects() => {
                            return Err(PlanError::config(format!(
                                "{}: solutions only accept `set` and `projects` effects",
                                owner
                            )));
                        }
                        Scope::Project if !effects.projects.is_empty() => {
                            return Err(PlanError::config(format!(
                                "{}: `projects` can only be used in a solution",
                                owner
                            )));
                        }
                        _ => {}
                    }
                    if effects.libraries.iter().any(|l| l.trim().is_empty()) {
                        return Err(PlanError::config(format!(
                            "{}: empty library name",
                            owner
                        )));
                    }
                }
                Rule::Select(select) => {
                    check_field(select.field)?;
                    if select.branches.is_empty() {
                        return Err(PlanError::config(format!(
                            "{}: `{}` select has no branches",
                            owner, select.field
                        )));
                    }
                    for branch in &select.branches {
                        check_predicate(&branch.predicate)?;
                    }
                }
            }
        }

        Ok(())
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        RuleSet {
            rules: iter.into_iter().collect(),
        }
    }
}

/// Accumulated, still unresolved result of a rule fold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationDraft {
    pub scalars: BTreeMap<Field, String>,
    pub steps: Vec<StepTemplate>,
    pub options: BTreeMap<String, String>,
    pub projects: Vec<String>,
}

impl ConfigurationDraft {
    pub fn scalar(&self, field: Field) -> Option<&str> {
        self.scalars.get(&field).map(String::as_str)
    }
}
