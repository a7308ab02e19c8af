//! Human-readable summary renderer for model diffs.

use crate::diff::engine::DiffResult;
use crate::diff::event::{Severity, ValidationEvent};

/// Render a Markdown summary of a [`DiffResult`].
///
/// The summary is intended for review workflows and release notes.
/// It is informational only and does not affect the structured result.
pub fn render_human_summary(result: &DiffResult) -> String {
    let mut out = String::new();

    // Header
    out.push_str("## Model Diff\n\n");

    let verdict = if result.has_errors() {
        "Breaking"
    } else {
        "Compatible"
    };
    let max = result
        .max_active_severity()
        .map_or("None", |s| s.as_str());
    out.push_str(&format!(
        "**Verdict**: {verdict}  \n**Highest severity**: {max}\n\n"
    ));

    if result.is_empty() {
        out.push_str("_No differences detected._\n");
        return out;
    }

    // Counts
    let counts = result.count_by_severity();
    out.push_str("| Severity | Active |\n|---|---|\n");
    for severity in Severity::ALL.iter().rev() {
        out.push_str(&format!(
            "| {} | {} |\n",
            severity,
            counts.get(severity).copied().unwrap_or(0)
        ));
    }
    out.push('\n');

    // Breaking changes
    let breaking: Vec<&ValidationEvent> = result.active().filter(|e| e.is_blocking()).collect();
    if !breaking.is_empty() {
        out.push_str("### Breaking Changes\n\n");
        out.push_str("| Severity | Event | Shape | Message |\n|---|---|---|---|\n");
        for event in breaking {
            out.push_str(&format!(
                "| {} | {} | `{}` | {} |\n",
                event.severity(),
                event.event_id(),
                event.shape_id(),
                escape_cell(event.message())
            ));
        }
        out.push('\n');
    }

    // Everything else that is still active
    let other: Vec<&ValidationEvent> = result.active().filter(|e| !e.is_blocking()).collect();
    if !other.is_empty() {
        out.push_str("### Other Changes\n\n");
        for event in other {
            out.push_str(&format!(
                "- **{}** {} `{}`: {}\n",
                event.severity(),
                event.event_id(),
                event.shape_id(),
                event.message()
            ));
        }
        out.push('\n');
    }

    // Suppressed
    let suppressed: Vec<&ValidationEvent> = result.suppressed().collect();
    if !suppressed.is_empty() {
        out.push_str(&format!("### Suppressed ({})\n\n", suppressed.len()));
        for event in suppressed {
            out.push_str(&format!(
                "- ~~{} {} `{}`~~\n",
                event.severity(),
                event.event_id(),
                event.shape_id()
            ));
        }
        out.push('\n');
    }

    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
