//! Test utilities shared by Slipway unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use slipway::test_support::{create_test_workspace, BIRD_GAME_MANIFEST};
//!
//! #[test]
//! fn test_example() {
//!     let workspace = create_test_workspace(BIRD_GAME_MANIFEST);
//!     // Load and plan the manifest from workspace.path()...
//! }
//! ```

pub mod fixtures;

use std::path::{Path, PathBuf};

use crate::core::manifest::MANIFEST_NAME;

// Re-export fixtures for convenience
pub use fixtures::*;

/// Create a temporary directory holding a `Slipway.toml` with `manifest`.
///
/// Returns the TempDir handle - dropping it will clean up the directory.
pub fn create_test_workspace(manifest: &str) -> tempfile::TempDir {
    let tmp = tempfile::TempDir::new().expect("failed to create temp dir");
    write_manifest(tmp.path(), manifest);
    tmp
}

/// Write `content` as the manifest in `dir`, returning its path.
pub fn write_manifest(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join(MANIFEST_NAME);
    std::fs::write(&path, content).expect("failed to write manifest");
    path
}

/// Assertion helpers for testing.
pub mod assertions {
    use crate::builder::errors::{PlanError, PlanErrors};

    /// Assert that a result is Ok and return the value.
    pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
        match result {
            Ok(v) => v,
            Err(e) => panic!("expected Ok, got Err: {:?}", e),
        }
    }

    /// Assert that an error message contains a substring.
    pub fn assert_error_contains<T: std::fmt::Debug>(
        result: Result<T, anyhow::Error>,
        substring: &str,
    ) {
        match result {
            Ok(v) => panic!("expected Err containing '{}', got Ok: {:?}", substring, v),
            Err(e) => {
                let msg = format!("{:#}", e);
                assert!(
                    msg.contains(substring),
                    "error '{}' does not contain '{}'",
                    msg,
                    substring
                );
            }
        }
    }

    /// Assert that at least one collected error satisfies `pred`.
    pub fn assert_any_error(errors: &PlanErrors, pred: impl Fn(&PlanError) -> bool) {
        assert!(
            errors.iter().any(pred),
            "no matching error among:\n{}",
            errors
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_workspace() {
        let workspace = create_test_workspace(BIRD_GAME_MANIFEST);
        let manifest = workspace.path().join("Slipway.toml");
        assert!(manifest.exists());

        let content = std::fs::read_to_string(manifest).unwrap();
        assert!(content.contains("name = \"BirdGame\""));
    }

    #[test]
    fn test_assertions() {
        use assertions::*;

        let ok_result: Result<i32, &str> = Ok(42);
        assert_eq!(assert_ok(ok_result), 42);

        assert_error_contains::<()>(Err(anyhow::anyhow!("boom: bad axis")), "bad axis");
    }
}
