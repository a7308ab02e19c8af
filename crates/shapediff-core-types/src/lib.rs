//! Core types shared across the shapediff crates
//!
//! This crate holds the small vocabulary that both the diff engine and its
//! callers agree on:
//!
//! - **Correlation types**: RequestId, TraceId, RequestContext
//! - **Schema constants**: Canonical log field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
