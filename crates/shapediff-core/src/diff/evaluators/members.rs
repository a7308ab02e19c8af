use super::unrecognized;
use crate::diff::evaluator::Evaluator;
use crate::diff::event::{Severity, ValidationEvent};
use crate::diff::index::{DiffIndex, MatchedShape, MemberDelta};
use crate::model::Shape;

/// Matched shapes with a member delta, paired with that delta
fn member_deltas<'i, 'a>(
    index: &'i DiffIndex<'a>,
) -> impl Iterator<Item = (&'i MatchedShape<'a>, &'i MemberDelta)> {
    index
        .changed_shapes()
        .filter_map(|m| m.members.as_ref().map(|delta| (m, delta)))
}

fn member_event(
    event_id: &str,
    severity: Severity,
    shape: &Shape,
    name: &str,
    describe: impl FnOnce(&str) -> String,
) -> ValidationEvent {
    match shape.member(name) {
        Some(member) => ValidationEvent::new(
            event_id,
            severity,
            member.id().clone(),
            describe(&member.id().to_string()),
        ),
        None => unrecognized(
            shape.id().clone(),
            format!("member `{}` is listed in the delta but not on the shape", name),
        ),
    }
}

/// A member present only in the new version of a matched shape
///
/// Adding a member to a shape consumed as operation input may introduce a
/// field older clients never send, so it is a WARNING there and a NOTE
/// everywhere else.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberAdded;

impl Evaluator for MemberAdded {
    fn event_id(&self) -> &'static str {
        "MemberAdded"
    }

    fn evaluate(&self, index: &DiffIndex<'_>) -> Vec<ValidationEvent> {
        let mut events = Vec::new();
        for (matched, delta) in member_deltas(index) {
            let severity = if index.is_input(matched.id()) {
                Severity::Warning
            } else {
                Severity::Note
            };
            for name in &delta.added {
                events.push(member_event(
                    self.event_id(),
                    severity,
                    matched.new,
                    name,
                    |id| format!("Added member `{}`", id),
                ));
            }
        }
        events
    }
}

/// A member present only in the old version of a matched shape
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberRemoved;

impl Evaluator for MemberRemoved {
    fn event_id(&self) -> &'static str {
        "MemberRemoved"
    }

    fn evaluate(&self, index: &DiffIndex<'_>) -> Vec<ValidationEvent> {
        let mut events = Vec::new();
        for (matched, delta) in member_deltas(index) {
            for name in &delta.removed {
                events.push(member_event(
                    self.event_id(),
                    Severity::Error,
                    matched.old,
                    name,
                    |id| format!("Removed member `{}`", id),
                ));
            }
        }
        events
    }
}

/// A retained member that now targets a different shape
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberTargetChanged;

impl Evaluator for MemberTargetChanged {
    fn event_id(&self) -> &'static str {
        "MemberTargetChanged"
    }

    fn evaluate(&self, index: &DiffIndex<'_>) -> Vec<ValidationEvent> {
        member_deltas(index)
            .flat_map(|(_, delta)| delta.retained.iter())
            .filter(|m| m.target_changed())
            .map(|m| {
                ValidationEvent::error(
                    self.event_id(),
                    m.id.clone(),
                    format!(
                        "Member `{}` target changed from `{}` to `{}`",
                        m.id, m.old_target, m.new_target
                    ),
                )
            })
            .collect()
    }
}

/// Retained members of a structure or union listed in a different order
///
/// Positional serializers and generated constructors depend on declaration
/// order. Lists, maps and service bindings are not positional.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberOrderChanged;

impl Evaluator for MemberOrderChanged {
    fn event_id(&self) -> &'static str {
        "MemberOrderChanged"
    }

    fn evaluate(&self, index: &DiffIndex<'_>) -> Vec<ValidationEvent> {
        member_deltas(index)
            .filter(|(matched, delta)| {
                delta.order_changed && matched.new.kind().has_ordered_members()
            })
            .map(|(matched, _)| {
                let order = |shape: &Shape| {
                    shape
                        .members()
                        .iter()
                        .map(|m| m.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                ValidationEvent::danger(
                    self.event_id(),
                    matched.id().clone(),
                    format!(
                        "Members of `{}` were reordered from [{}] to [{}]",
                        matched.id(),
                        order(matched.old),
                        order(matched.new)
                    ),
                )
            })
            .collect()
    }
}
