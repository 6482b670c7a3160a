//! Typed compiler and linker options understood by project emitters.
//!
//! Each option has a stable key (e.g. `General.WarningLevel`) used in the
//! configuration's option map, and a display value (e.g. `Level3`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which tool an option applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Compiler,
    Linker,
}

/// An emitter option with its value.
///
/// In a manifest these are written as single-key tables:
/// `{ warning_level = "level3" }`, `{ treat_warnings_as_errors = true }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VcOption {
    CharacterSet(CharacterSet),
    WarningLevel(WarningLevel),
    TreatWarningsAsErrors(bool),
    WindowsTargetPlatformVersion(PlatformVersion),
    CppLanguageStandard(CppLanguageStandard),
    Exceptions(ExceptionHandling),
    SubSystem(SubSystem),
    LargeAddress(LargeAddress),
}

impl VcOption {
    /// Key in the configuration option map. Later options with the same key
    /// replace earlier ones.
    pub fn key(&self) -> &'static str {
        match self {
            VcOption::CharacterSet(_) => "General.CharacterSet",
            VcOption::WarningLevel(_) => "General.WarningLevel",
            VcOption::TreatWarningsAsErrors(_) => "General.TreatWarningsAsErrors",
            VcOption::WindowsTargetPlatformVersion(_) => "General.WindowsTargetPlatformVersion",
            VcOption::CppLanguageStandard(_) => "Compiler.CppLanguageStandard",
            VcOption::Exceptions(_) => "Compiler.Exceptions",
            VcOption::SubSystem(_) => "Linker.SubSystem",
            VcOption::LargeAddress(_) => "Linker.LargeAddress",
        }
    }

    pub fn kind(&self) -> OptionKind {
        match self {
            VcOption::SubSystem(_) | VcOption::LargeAddress(_) => OptionKind::Linker,
            _ => OptionKind::Compiler,
        }
    }

    pub fn value(&self) -> String {
        match self {
            VcOption::CharacterSet(v) => v.to_string(),
            VcOption::WarningLevel(v) => v.to_string(),
            VcOption::TreatWarningsAsErrors(true) => "Enable".to_string(),
            VcOption::TreatWarningsAsErrors(false) => "Disable".to_string(),
            VcOption::WindowsTargetPlatformVersion(v) => v.to_string(),
            VcOption::CppLanguageStandard(v) => v.to_string(),
            VcOption::Exceptions(v) => v.to_string(),
            VcOption::SubSystem(v) => v.to_string(),
            VcOption::LargeAddress(v) => v.to_string(),
        }
    }
}

impl fmt::Display for VcOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key(), self.value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterSet {
    Default,
    Unicode,
    #[serde(alias = "mbcs")]
    MultiByte,
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CharacterSet::Default => "Default",
            CharacterSet::Unicode => "Unicode",
            CharacterSet::MultiByte => "MultiByte",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    Level0,
    Level1,
    Level2,
    Level3,
    Level4,
}

impl fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = match self {
            WarningLevel::Level0 => 0,
            WarningLevel::Level1 => 1,
            WarningLevel::Level2 => 2,
            WarningLevel::Level3 => 3,
            WarningLevel::Level4 => 4,
        };
        write!(f, "Level{}", n)
    }
}

/// Windows SDK version a project targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlatformVersion {
    /// Whatever SDK the IDE considers latest.
    Latest,
    /// An explicit SDK version such as `10.0.17763.0`.
    Version(String),
}

impl From<String> for PlatformVersion {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case("latest") {
            PlatformVersion::Latest
        } else {
            PlatformVersion::Version(s)
        }
    }
}

impl From<PlatformVersion> for String {
    fn from(v: PlatformVersion) -> Self {
        match v {
            PlatformVersion::Latest => "latest".to_string(),
            PlatformVersion::Version(s) => s,
        }
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformVersion::Latest => f.write_str("Latest"),
            PlatformVersion::Version(v) => f.write_str(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CppLanguageStandard {
    #[serde(alias = "c++14")]
    Cpp14,
    #[serde(alias = "c++17")]
    Cpp17,
    #[serde(alias = "c++20")]
    Cpp20,
    Latest,
}

impl fmt::Display for CppLanguageStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CppLanguageStandard::Cpp14 => "CPP14",
            CppLanguageStandard::Cpp17 => "CPP17",
            CppLanguageStandard::Cpp20 => "CPP20",
            CppLanguageStandard::Latest => "Latest",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionHandling {
    Disable,
    Enable,
    #[serde(rename = "enable_with_seh")]
    EnableWithSeh,
}

impl fmt::Display for ExceptionHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExceptionHandling::Disable => "Disable",
            ExceptionHandling::Enable => "Enable",
            ExceptionHandling::EnableWithSeh => "EnableWithSEH",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubSystem {
    Console,
    Windows,
}

impl fmt::Display for SubSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubSystem::Console => "Console",
            SubSystem::Windows => "Windows",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LargeAddress {
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "not_support_larger_than_2gb")]
    NotSupportLargerThan2Gb,
    #[serde(rename = "support_larger_than_2gb")]
    SupportLargerThan2Gb,
}

impl fmt::Display for LargeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LargeAddress::Default => "Default",
            LargeAddress::NotSupportLargerThan2Gb => "NotSupportLargerThan2Gb",
            LargeAddress::SupportLargerThan2Gb => "SupportLargerThan2Gb",
        })
    }
}
