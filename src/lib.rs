//! Slipway - a declarative build-matrix expander and IDE project generator
//!
//! This crate provides the core library functionality for Slipway: axis
//! expansion, rule folding, path resolution, configuration building,
//! solution composition and emission.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Fixtures and helpers for Slipway unit tests.
#[cfg(test)]
pub mod test_support;

pub use builder::{Emitter, PlanError, PlanErrors};
pub use core::{
    Axis, AxisSet, Configuration, Manifest, Project, ProjectSpec, Solution, SolutionDescriptor,
    SolutionSpec, Target,
};
pub use util::context::GlobalContext;
