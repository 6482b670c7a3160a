//! Test fixtures for common test scenarios.
//!
//! The recurring example is a small DirectX game: one platform, two IDE
//! generations and two optimization levels, with one project and one
//! solution generated per IDE generation.

use std::path::Path;

use crate::builder::rules::{Effects, Field, Predicate, RuleSet, Select};
use crate::core::axis::names;
use crate::core::options::{
    CharacterSet, CppLanguageStandard, ExceptionHandling, LargeAddress, PlatformVersion,
    SubSystem, VcOption, WarningLevel,
};
use crate::core::step::CopyStep;
use crate::core::{AxisSet, ProjectSpec, SolutionSpec};

/// `{win64} x {vs2017, vs2022} x {debug, release}`
pub fn bird_game_axes() -> AxisSet {
    AxisSet::default()
        .with_axis(names::PLATFORM, ["win64"])
        .with_axis(names::DEV_ENV, ["vs2017", "vs2022"])
        .with_axis(names::OPTIMIZATION, ["debug", "release"])
}

/// The BirdGame project rules, restricted to the given `devenv` values.
pub fn bird_game_rules_for(devenvs: &[&str]) -> RuleSet {
    let mut project_path = Select::new(Field::ProjectPath);
    for devenv in devenvs {
        project_path = project_path.branch(
            Predicate::axis_eq(names::DEV_ENV, *devenv),
            format!("[project.root]/generated/{}", devenv),
        );
    }

    let common = Effects::default()
        .set(Field::PrecompHeader, "pch.h")
        .set(Field::PrecompSource, "pch.cpp")
        .option(VcOption::CharacterSet(CharacterSet::Unicode))
        .option(VcOption::WarningLevel(WarningLevel::Level3))
        .option(VcOption::TreatWarningsAsErrors(true))
        .option(VcOption::CppLanguageStandard(CppLanguageStandard::Cpp17))
        .option(VcOption::Exceptions(ExceptionHandling::Enable))
        .option(VcOption::SubSystem(SubSystem::Windows))
        .option(VcOption::LargeAddress(LargeAddress::SupportLargerThan2Gb))
        .include_path("[project.root]/include")
        .library("d3d12")
        .library("dxgi")
        .library("d3dcompiler")
        .library("dxguid")
        .post_build_copy(
            CopyStep::new("[project.root]/assets".into(), "[conf.target_path]/assets".into())
                .mirrored(),
        )
        .debugger("[conf.target_path]");

    let mut rules = RuleSet::new().select(project_path).always(common);
    for devenv in devenvs {
        let version = match *devenv {
            "vs2017" => PlatformVersion::Version("10.0.17763.0".to_string()),
            _ => PlatformVersion::Latest,
        };
        rules = rules.when(
            Predicate::axis_eq(names::DEV_ENV, *devenv),
            Effects::default().option(VcOption::WindowsTargetPlatformVersion(version)),
        );
    }
    rules
}

pub fn bird_game_project(root: &Path) -> ProjectSpec {
    ProjectSpec::new("BirdGame", root, bird_game_axes())
        .with_rules(bird_game_rules_for(&["vs2017", "vs2022"]))
}

pub fn bird_game_solution(root: &Path) -> SolutionSpec {
    let solution_path = Select::new(Field::SolutionPath)
        .branch(
            Predicate::axis_eq(names::DEV_ENV, "vs2017"),
            "[solution.root]/generated/vs2017",
        )
        .branch(
            Predicate::axis_eq(names::DEV_ENV, "vs2022"),
            "[solution.root]/generated/vs2022",
        );

    SolutionSpec::new("BirdGame", root, bird_game_axes()).with_rules(
        RuleSet::new()
            .always(Effects::default().project("BirdGame"))
            .select(solution_path),
    )
}

/// Manifest text equivalent to [`bird_game_project`] and [`bird_game_solution`].
pub const BIRD_GAME_MANIFEST: &str = r#"
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
name = "BirdGame"

[[project.rule]]
select = "project_path"
branches = [
    { when = { devenv = "vs2017" }, value = "[project.root]/generated/vs2017" },
    { when = { devenv = "vs2022" }, value = "[project.root]/generated/vs2022" },
]

[[project.rule]]
set = { precomp_header = "pch.h", precomp_source = "pch.cpp" }
options = [
    { character_set = "unicode" },
    { warning_level = "level3" },
    { treat_warnings_as_errors = true },
    { cpp_language_standard = "cpp17" },
    { exceptions = "enable" },
    { sub_system = "windows" },
    { large_address = "support_larger_than_2gb" },
]
include_paths = ["[project.root]/include"]
libraries = ["d3d12", "dxgi", "d3dcompiler", "dxguid"]
post_build_copy = [
    { source = "[project.root]/assets", destination = "[conf.target_path]/assets", mirror = true },
]
debugger = { working_directory = "[conf.target_path]" }

[[project.rule]]
when = { devenv = "vs2017" }
options = [{ windows_target_platform_version = "10.0.17763.0" }]

[[project.rule]]
when = { devenv = "vs2022" }
options = [{ windows_target_platform_version = "latest" }]

[[solution]]
name = "BirdGame"
projects = ["BirdGame"]

[[solution.rule]]
select = "solution_path"
branches = [
    { when = { devenv = "vs2017" }, value = "[solution.root]/generated/vs2017" },
    { when = { devenv = "vs2022" }, value = "[solution.root]/generated/vs2022" },
]
"#;

/// A project whose `project_path` select only handles one IDE generation.
pub const UNHANDLED_MANIFEST: &str = r#"
[[axis]]
name = "devenv"
values = ["v1", "v2"]

[[project]]
name = "App"

[[project.rule]]
select = "project_path"
branches = [{ when = { devenv = "v1" }, value = "[project.root]/legacy" }]

[[solution]]
name = "App"
projects = ["App"]

[[solution.rule]]
set = { solution_path = "[solution.root]/sln" }
"#;
