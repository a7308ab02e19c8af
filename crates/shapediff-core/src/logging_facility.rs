//! Structured logging facility for shapediff
//!
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use shapediff_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! The diff engine itself never initializes logging; it only emits events.
//! Binaries and test harnesses own the subscriber.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
