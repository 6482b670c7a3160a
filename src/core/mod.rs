//! Core data structures for Slipway.
//!
//! This module contains the declarative model the builder works on:
//! - Axes and the targets they expand into
//! - Build steps and typed emitter options
//! - Immutable configurations, projects and solutions
//! - The `Slipway.toml` manifest

pub mod axis;
pub mod configuration;
pub mod manifest;
pub mod options;
pub mod project;
pub mod solution;
pub mod step;
pub mod target;

pub use axis::{Axis, AxisSet};
pub use configuration::Configuration;
pub use manifest::{find_manifest, Manifest, MANIFEST_NAME};
pub use options::VcOption;
pub use project::{Project, ProjectSpec};
pub use solution::{Solution, SolutionDescriptor, SolutionSpec};
pub use step::{BuildStep, CopyStep, DebuggerSettings};
pub use target::{AxisValue, Target};
