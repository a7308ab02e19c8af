//! ShapeDiff Core - compatibility analysis for interface models
//!
//! This crate compares two versions of a validated shape graph and
//! classifies every difference by its impact on existing clients:
//! - Shape graph model with ids, kinds, members and traits, plus a JSON AST codec
//! - Diff index partitioning shapes into added, removed and matched
//! - Built-in evaluators for shape, member and trait changes
//! - Orchestration with deterministic ordering, suppression and a verdict
//! - Text, JSON and Markdown renderings of the result
//!
//! The diff engine performs no I/O; models are built or decoded by the caller
//! and only [`DiffConfig::load`] touches the filesystem.

pub mod config;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;

pub use shapediff_core_types as core_types;

// Re-export commonly used types
pub use config::DiffConfig;
pub use diff::{diff, DiffResult, ModelDiffEngine, Severity, Suppression, ValidationEvent};
pub use errors::{ExError, ExErrorKind, ModelError, Result};
pub use model::{Model, Shape, ShapeId, ShapeKind};
