//! Diagnostic events emitted by evaluators.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::model::ShapeId;

/// Backward-compatibility impact of a change
///
/// The declaration order is the total order used as a sort tiebreaker:
/// `Note < Warning < Danger < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Additive or informational; existing clients are unaffected
    Note,
    /// May affect some clients depending on how the shape is used
    Warning,
    /// Likely to break clients in some protocols or languages
    Danger,
    /// Breaks existing clients
    Error,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Note,
        Severity::Warning,
        Severity::Danger,
        Severity::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Note => "NOTE",
            Severity::Warning => "WARNING",
            Severity::Danger => "DANGER",
            Severity::Error => "ERROR",
        }
    }

    /// Severities that fail the aggregate verdict when active
    pub fn is_breaking(&self) -> bool {
        matches!(self, Severity::Danger | Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Active,
    /// Matched by a caller suppression; kept for audit, ignored by the verdict
    Suppressed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Active => "ACTIVE",
            EventStatus::Suppressed => "SUPPRESSED",
        }
    }
}

/// One detected difference, classified by impact
///
/// Events are values: suppression produces a new event rather than mutating
/// an existing one. Their `Ord` is the canonical output order:
/// shape id, then event id, then severity, then message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidationEvent {
    event_id: String,
    severity: Severity,
    shape_id: ShapeId,
    message: String,
    status: EventStatus,
}

impl ValidationEvent {
    /// Create an active event
    pub fn new(
        event_id: impl Into<String>,
        severity: Severity,
        shape_id: ShapeId,
        message: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            severity,
            shape_id,
            message: message.into(),
            status: EventStatus::Active,
        }
    }

    pub fn note(event_id: &str, shape_id: ShapeId, message: impl Into<String>) -> Self {
        Self::new(event_id, Severity::Note, shape_id, message)
    }

    pub fn warning(event_id: &str, shape_id: ShapeId, message: impl Into<String>) -> Self {
        Self::new(event_id, Severity::Warning, shape_id, message)
    }

    pub fn danger(event_id: &str, shape_id: ShapeId, message: impl Into<String>) -> Self {
        Self::new(event_id, Severity::Danger, shape_id, message)
    }

    pub fn error(event_id: &str, shape_id: ShapeId, message: impl Into<String>) -> Self {
        Self::new(event_id, Severity::Error, shape_id, message)
    }

    /// A copy of this event marked as suppressed
    pub fn into_suppressed(self) -> Self {
        Self {
            status: EventStatus::Suppressed,
            ..self
        }
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn shape_id(&self) -> &ShapeId {
        &self.shape_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> EventStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == EventStatus::Active
    }

    /// Active and breaking; what the aggregate verdict counts
    pub fn is_blocking(&self) -> bool {
        self.is_active() && self.severity.is_breaking()
    }
}

impl Ord for ValidationEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.shape_id
            .cmp(&other.shape_id)
            .then_with(|| self.event_id.cmp(&other.event_id))
            .then_with(|| self.severity.cmp(&other.severity))
            .then_with(|| self.message.cmp(&other.message))
            .then_with(|| self.status.cmp(&other.status))
    }
}

impl PartialOrd for ValidationEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ValidationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}: {}",
            self.severity, self.event_id, self.shape_id, self.message
        )
    }
}
