//! Caller-provided suppressions.
//!
//! A suppression pairs an event-id pattern with a shape-id pattern. Both are
//! glob patterns (`*`, `?`, `[..]`), so `"*"` matches everything and a plain
//! id matches only itself. A shape pattern of `acme#City` does not match the
//! member `acme#City$name`; use `acme#City*` to cover the members too.

#![allow(clippy::result_large_err)]

use glob::Pattern;
use std::fmt;

use super::event::ValidationEvent;
use crate::errors::{ExError, ExErrorKind, Result};

/// Downgrades matching events to `SUPPRESSED`
#[derive(Clone, PartialEq, Eq)]
pub struct Suppression {
    event_id: Pattern,
    shape_id: Pattern,
    reason: String,
}

impl fmt::Debug for Suppression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suppression")
            .field("event_id", &self.event_id.as_str())
            .field("shape_id", &self.shape_id.as_str())
            .field("reason", &self.reason)
            .finish()
    }
}

fn compile(field: &str, pattern: &str) -> Result<Pattern> {
    if pattern.trim().is_empty() {
        return Err(ExError::new(ExErrorKind::InvalidSuppression)
            .with_op("suppression")
            .with_message(format!("`{}` pattern must not be empty", field)));
    }
    Pattern::new(pattern).map_err(|e| {
        ExError::new(ExErrorKind::InvalidSuppression)
            .with_op("suppression")
            .with_message(format!("invalid `{}` pattern '{}': {}", field, pattern, e))
    })
}

impl Suppression {
    /// Compile a suppression
    ///
    /// # Errors
    ///
    /// `InvalidSuppression` if either pattern is blank or not a valid glob,
    /// or if no reason is given.
    pub fn new(event_id: &str, shape_id: &str, reason: &str) -> Result<Self> {
        if reason.trim().is_empty() {
            return Err(ExError::new(ExErrorKind::InvalidSuppression)
                .with_op("suppression")
                .with_message(format!(
                    "suppression of `{}` on `{}` needs a reason",
                    event_id, shape_id
                )));
        }
        Ok(Self {
            event_id: compile("event_id", event_id)?,
            shape_id: compile("shape_id", shape_id)?,
            reason: reason.to_string(),
        })
    }

    pub fn event_id_pattern(&self) -> &str {
        self.event_id.as_str()
    }

    pub fn shape_id_pattern(&self) -> &str {
        self.shape_id.as_str()
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn matches(&self, event: &ValidationEvent) -> bool {
        self.event_id.matches(event.event_id())
            && self.shape_id.matches(&event.shape_id().to_string())
    }
}

/// Mark every event matched by any suppression as suppressed
///
/// Order and count are preserved; nothing is removed.
pub fn apply_suppressions(
    events: Vec<ValidationEvent>,
    suppressions: &[Suppression],
) -> Vec<ValidationEvent> {
    if suppressions.is_empty() {
        return events;
    }
    events
        .into_iter()
        .map(|event| {
            if suppressions.iter().any(|s| s.matches(&event)) {
                event.into_suppressed()
            } else {
                event
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::event::EventStatus;
    use crate::model::ShapeId;

    fn event(event_id: &str, shape: &str) -> ValidationEvent {
        ValidationEvent::error(event_id, ShapeId::parse(shape).unwrap(), "msg")
    }

    #[test]
    fn test_exact_match() {
        let s = Suppression::new("TraitAdded", "a#S$name", "test").unwrap();
        assert!(s.matches(&event("TraitAdded", "a#S$name")));
        assert!(!s.matches(&event("TraitAdded", "a#S")));
        assert!(!s.matches(&event("TraitRemoved", "a#S$name")));
    }

    #[test]
    fn test_wildcards() {
        let s = Suppression::new("*", "acme.weather#*", "test").unwrap();
        assert!(s.matches(&event("ShapeRemoved", "acme.weather#City")));
        assert!(s.matches(&event("MemberRemoved", "acme.weather#City$name")));
        assert!(!s.matches(&event("ShapeRemoved", "acme.other#City")));
    }

    #[test]
    fn test_apply_keeps_every_event() {
        let events = vec![event("ShapeRemoved", "a#A"), event("ShapeRemoved", "a#B")];
        let suppression = Suppression::new("ShapeRemoved", "a#B", "test").unwrap();
        let out = apply_suppressions(events, &[suppression]);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].status(), EventStatus::Active);
        assert_eq!(out[1].status(), EventStatus::Suppressed);
    }

    #[test]
    fn test_invalid_patterns_rejected() {
        let err = Suppression::new("", "a#A", "test").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidSuppression);

        let err = Suppression::new("ShapeRemoved", "a#***", "test").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidSuppression);

        let err = Suppression::new("ShapeRemoved", "a#A", "  ").unwrap_err();
        assert!(err.message().contains("reason"));
    }

    #[test]
    fn test_reason_is_kept() {
        let s = Suppression::new("*", "*", "migration window").unwrap();
        assert_eq!(s.reason(), "migration window");
        assert_eq!(s.event_id_pattern(), "*");
    }
}
