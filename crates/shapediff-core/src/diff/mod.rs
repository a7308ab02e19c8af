//! Model diff engine.
//!
//! Compares two versions of a shape graph and reports every difference as a
//! [`ValidationEvent`] classified by backward-compatibility impact.
//!
//! ## Entry point
//!
//! ```
//! use shapediff_core::diff::{diff, render_text};
//! use shapediff_core::model::{Model, Shape, ShapeId, ShapeKind};
//!
//! let old = Model::empty();
//! let new = Model::builder()
//!     .add_shape(Shape::new(ShapeId::parse("acme#City").unwrap(), ShapeKind::Structure))
//!     .build()
//!     .unwrap();
//!
//! let result = diff(&old, &new, &[]).unwrap();
//! assert!(!result.has_errors());
//! assert_eq!(
//!     render_text(result.events()),
//!     "NOTE: ShapeAdded: acme#City: Added structure `acme#City`\n"
//! );
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce byte-identical output for any
//!   evaluator order and any degree of parallelism.
//! - **Identity by id**: shapes are matched by [`ShapeId`](crate::model::ShapeId)
//!   only; a rename is a removal plus an addition.
//! - **Audit trail**: suppressed events stay in the output with status
//!   `SUPPRESSED`.
//! - **Local degradation**: a change an evaluator cannot classify becomes an
//!   `UnrecognizedChange` warning instead of failing the run.

pub mod engine;
pub mod evaluator;
pub mod evaluators;
pub mod event;
pub mod human_summary;
pub mod index;
pub mod render;
pub mod suppression;
pub mod trait_rules;

pub use engine::{diff, DiffResult, ModelDiffEngine, Parallelism};
pub use evaluator::{Evaluator, EvaluatorRegistry};
pub use evaluators::UNRECOGNIZED_CHANGE;
pub use event::{EventStatus, Severity, ValidationEvent};
pub use human_summary::render_human_summary;
pub use index::{DiffIndex, MatchedShape, MemberDelta, RetainedMember, TraitChange, TraitDelta};
pub use render::{render_json, render_text, result_digest};
pub use suppression::{apply_suppressions, Suppression};
pub use trait_rules::{
    BoundsComparator, ComparisonAnomaly, ContentVerdict, TraitComparator, TraitRules,
};
