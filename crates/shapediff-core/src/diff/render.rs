//! Text and JSON renderings of diff results.
//!
//! Both forms are explicit encodings with a fixed field order, so the same
//! result always renders to the same bytes.
//!
//! ## Digest
//!
//! [`result_digest`] hashes the compact JSON rendering with SHA256. Gating
//! tools compare digests to assert that two runs produced identical output.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::diff::engine::DiffResult;
use crate::diff::event::{EventStatus, ValidationEvent};

/// One line per event: `SEVERITY: EventId: ShapeId: message`
///
/// Suppressed events end in ` (suppressed)`. Every line, including the last,
/// is newline terminated.
pub fn render_text(events: &[ValidationEvent]) -> String {
    let mut out = String::new();
    for event in events {
        out.push_str(&event.to_string());
        if event.status() == EventStatus::Suppressed {
            out.push_str(" (suppressed)");
        }
        out.push('\n');
    }
    out
}

fn encode_event(event: &ValidationEvent) -> Value {
    let mut obj = Map::new();
    obj.insert("event_id".to_string(), Value::String(event.event_id().to_string()));
    obj.insert(
        "severity".to_string(),
        Value::String(event.severity().as_str().to_string()),
    );
    obj.insert(
        "shape_id".to_string(),
        Value::String(event.shape_id().to_string()),
    );
    obj.insert("message".to_string(), Value::String(event.message().to_string()));
    obj.insert(
        "status".to_string(),
        Value::String(event.status().as_str().to_string()),
    );
    Value::Object(obj)
}

/// Array of `{event_id, severity, shape_id, message, status}` objects
pub fn render_json(result: &DiffResult) -> Value {
    Value::Array(result.events().iter().map(encode_event).collect())
}

/// Hex-encoded SHA256 of the compact JSON rendering (64 characters)
pub fn result_digest(result: &DiffResult) -> String {
    hash_string(&render_json(result).to_string())
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
