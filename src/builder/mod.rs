//! Configuration planning.
//!
//! The pipeline runs in one direction: axes are expanded into targets, rules
//! are folded per target and their templates resolved into immutable
//! configurations, projects are composed into solutions, and emitters write
//! the resulting descriptors. Everything before the emitter is pure.

pub mod compose;
pub mod configure;
pub mod emit;
pub mod errors;
pub mod expand;
pub mod path;
pub mod rules;

pub use compose::compose;
pub use configure::{build, build_project};
pub use emit::{EmitReport, EmitStatus, Emitter, EmitterRegistry, JsonEmitter};
pub use errors::{PlanError, PlanErrors};
pub use expand::expand;
pub use path::{resolve, Bindings, PathTemplate};
pub use rules::{Effects, Field, Predicate, Rule, RuleSet, Select};
