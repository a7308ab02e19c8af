//! Shape graph consumed by the diff engine.
//!
//! A [`Model`] is an immutable, validated map from [`ShapeId`] to [`Shape`].
//! The engine relies on only two capabilities: iterating shapes and looking
//! one up by id. Everything else here exists so callers and tests can build
//! models that already satisfy those guarantees.

pub mod graph;
pub mod json;
pub mod shape;
pub mod shape_id;

pub use graph::{Model, ModelBuilder, PRELUDE_NAMESPACE};
pub use json::{decode_model, decode_model_str, encode_model};
pub use shape::{canonical_json, MemberShape, Shape, ShapeKind, TraitMap};
pub use shape_id::ShapeId;
