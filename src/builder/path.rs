//! Path templates and their resolution.
//!
//! A template is a path string with `[dotted.name]` placeholders, e.g.
//! `[project.root]/generated/[target.devenv]`. Resolution substitutes every
//! placeholder from an explicit [`Bindings`] value, joins the segments with
//! `PathBuf::push` and normalizes the result lexically. Both `/` and `\`
//! are accepted as separators in templates.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR_STR};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::builder::errors::PlanError;
use crate::core::Target;

/// Well-known binding names.
pub mod keys {
    pub const PROJECT_ROOT: &str = "project.root";
    pub const PROJECT_NAME: &str = "project.name";
    pub const PROJECT_SOURCE_ROOT: &str = "project.source_root";
    pub const SOLUTION_ROOT: &str = "solution.root";
    pub const SOLUTION_NAME: &str = "solution.name";
    pub const CONF_NAME: &str = "conf.name";
    pub const CONF_PROJECT_PATH: &str = "conf.project_path";
    pub const CONF_TARGET_PATH: &str = "conf.target_path";
    pub const CONF_INTERMEDIATE_PATH: &str = "conf.intermediate_path";

    /// Prefix for per-axis bindings (`target.devenv`, ...).
    pub const TARGET_PREFIX: &str = "target.";
}

/// Any bracketed token; every one must be a well-formed, bound name.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\[\]]*\]").expect("placeholder pattern is a valid regex"));

static PLACEHOLDER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("placeholder name pattern is a valid regex")
});

/// A path with zero or more `[name]` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathTemplate(String);

impl PathTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        PathTemplate(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Names of the placeholders referenced by this template, in order.
    pub fn placeholders(&self) -> Vec<&str> {
        PLACEHOLDER
            .find_iter(&self.0)
            .map(|m| strip_brackets(m.as_str()))
            .collect()
    }

    pub fn resolve(&self, bindings: &Bindings) -> Result<PathBuf, PlanError> {
        resolve(self, bindings)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PathTemplate {
    fn from(s: &str) -> Self {
        PathTemplate::new(s)
    }
}

impl From<String> for PathTemplate {
    fn from(s: String) -> Self {
        PathTemplate(s)
    }
}

/// Named values available to placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Bindings::default()
    }

    /// Bind `target.<axis>` for every axis plus `conf.name`.
    pub fn for_target(target: &Target) -> Self {
        let mut bindings = Bindings::new();
        bindings.bind_target(target);
        bindings
    }

    pub fn bind_target(&mut self, target: &Target) -> &mut Self {
        for av in target.values() {
            self.bind(format!("{}{}", keys::TARGET_PREFIX, av.axis), av.value.clone());
        }
        self.bind(keys::CONF_NAME, target.name())
    }

    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn bind_path(&mut self, name: impl Into<String>, path: &Path) -> &mut Self {
        self.bind(name, path.to_string_lossy().into_owned())
    }

    /// Builder-style [`Bindings::bind`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.bind(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

/// Resolve a template into a normalized path.
pub fn resolve(template: &PathTemplate, bindings: &Bindings) -> Result<PathBuf, PlanError> {
    let raw = template.as_str();
    let mut path = PathBuf::new();

    if raw.starts_with(['/', '\\']) {
        path.push(MAIN_SEPARATOR_STR);
    }

    for (i, segment) in raw.split(['/', '\\']).filter(|s| !s.is_empty()).enumerate() {
        let rendered = render(segment, template, bindings)?;
        // `push` would discard everything before an absolute segment.
        if i > 0 && Path::new(&rendered).has_root() {
            return Err(PlanError::config(format!(
                "`{}` renders to absolute path `{}` after the first segment of `{}`",
                segment, rendered, template
            )));
        }
        path.push(rendered);
    }

    Ok(normalize(&path))
}

/// Substitute placeholders in `text` without any path handling.
pub fn render(text: &str, template: &PathTemplate, bindings: &Bindings) -> Result<String, PlanError> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in PLACEHOLDER.find_iter(text) {
        let name = strip_brackets(m.as_str());
        let value = Some(name)
            .filter(|n| PLACEHOLDER_NAME.is_match(n))
            .and_then(|n| bindings.get(n))
            .ok_or_else(|| PlanError::UnresolvedPlaceholder {
                placeholder: name.to_string(),
                template: template.as_str().to_string(),
            })?;
        out.push_str(&text[last..m.start()]);
        out.push_str(value);
        last = m.end();
    }
    out.push_str(&text[last..]);

    Ok(out)
}

/// Lexically normalize a path: drop `.` components, fold `..` into a
/// preceding normal component, never climb above the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

fn strip_brackets(placeholder: &str) -> &str {
    &placeholder[1..placeholder.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings() -> Bindings {
        Bindings::new()
            .with(keys::PROJECT_ROOT, "/work/bird")
            .with("target.devenv", "vs2017")
            .with(keys::CONF_NAME, "win64_vs2017_debug")
    }

    #[test]
    fn test_resolve_basic() {
        let template = PathTemplate::new("[project.root]/generated/[target.devenv]");
        let path = resolve(&template, &bindings()).unwrap();
        assert_eq!(path, PathBuf::from("/work/bird/generated/vs2017"));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let template = PathTemplate::new("[project.root]/output/[conf.name]");
        let b = bindings();
        assert_eq!(resolve(&template, &b).unwrap(), resolve(&template, &b).unwrap());
    }

    #[test]
    fn test_mixed_separators_and_trailing() {
        let template = PathTemplate::new("[project.root]\\generated//x/./y/../z/");
        let path = resolve(&template, &bindings()).unwrap();
        assert_eq!(path, PathBuf::from("/work/bird/generated/x/z"));
    }

    #[test]
    fn test_placeholder_inside_segment() {
        let template = PathTemplate::new("[project.root]/bin_[target.devenv]");
        let path = resolve(&template, &bindings()).unwrap();
        assert_eq!(path, PathBuf::from("/work/bird/bin_vs2017"));
    }

    #[test]
    fn test_unknown_placeholder() {
        let template = PathTemplate::new("[project.root]/[conf.target_path]/assets");
        let err = resolve(&template, &bindings()).unwrap_err();
        assert_eq!(
            err,
            PlanError::UnresolvedPlaceholder {
                placeholder: "conf.target_path".to_string(),
                template: "[project.root]/[conf.target_path]/assets".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_placeholder_is_unresolved() {
        for raw in ["[project-root]/assets", "[conf.target path]/x", "[]/x"] {
            let err = resolve(&PathTemplate::new(raw), &bindings()).unwrap_err();
            assert!(
                matches!(err, PlanError::UnresolvedPlaceholder { ref template, .. } if template == raw),
                "{}: {:?}",
                raw,
                err
            );
        }
    }

    #[test]
    fn test_absolute_value_in_later_segment_rejected() {
        let template = PathTemplate::new("out/[project.root]/assets");
        let err = resolve(&template, &bindings()).unwrap_err();
        assert!(matches!(err, PlanError::Config { .. }));
        assert!(err.to_string().contains("out/[project.root]/assets"));

        // A leading absolute placeholder is the normal case.
        let template = PathTemplate::new("/[project.root]/assets");
        assert_eq!(
            resolve(&template, &bindings()).unwrap(),
            PathBuf::from("/work/bird/assets")
        );
    }

    #[test]
    fn test_relative_template() {
        let template = PathTemplate::new("assets");
        assert_eq!(resolve(&template, &Bindings::new()).unwrap(), PathBuf::from("assets"));

        let template = PathTemplate::new("../shared/./assets");
        assert_eq!(
            resolve(&template, &Bindings::new()).unwrap(),
            PathBuf::from("../shared/assets")
        );
    }

    #[test]
    fn test_normalize_never_climbs_above_root() {
        assert_eq!(normalize(Path::new("/a/../../b")), PathBuf::from("/b"));
        assert_eq!(normalize(Path::new("")), PathBuf::from("."));
    }

    #[test]
    fn test_placeholders_listing() {
        let template = PathTemplate::new("[project.root]/x/[target.platform]_[conf.name]");
        assert_eq!(
            template.placeholders(),
            vec!["project.root", "target.platform", "conf.name"]
        );
        assert!(PathTemplate::new("plain/path").placeholders().is_empty());
    }

    #[test]
    fn test_bindings_for_target() {
        let target = Target::from_pairs([("platform", "win64"), ("optimization", "release")]);
        let b = Bindings::for_target(&target);
        assert_eq!(b.get("target.platform"), Some("win64"));
        assert_eq!(b.get("target.optimization"), Some("release"));
        assert_eq!(b.get(keys::CONF_NAME), Some("win64_release"));
    }
}
