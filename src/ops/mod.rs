//! High-level operations.
//!
//! This module contains the implementation of Slipway commands.

pub mod slipway_generate;
pub mod slipway_init;
pub mod slipway_inspect;

pub use slipway_generate::{generate, plan, GenerateOptions, GenerateResult};
pub use slipway_init::{init_project, InitOptions};
pub use slipway_inspect::{list_targets, show_configuration, ConfigurationReport};
