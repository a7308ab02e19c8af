use super::unrecognized;
use crate::diff::evaluator::Evaluator;
use crate::diff::event::ValidationEvent;
use crate::diff::index::DiffIndex;

/// A shape that exists only in the new model
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeAdded;

impl Evaluator for ShapeAdded {
    fn event_id(&self) -> &'static str {
        "ShapeAdded"
    }

    fn evaluate(&self, index: &DiffIndex<'_>) -> Vec<ValidationEvent> {
        index
            .added()
            .iter()
            .map(|id| match index.new_model().get(id) {
                Some(shape) => ValidationEvent::note(
                    self.event_id(),
                    id.clone(),
                    format!("Added {} `{}`", shape.kind(), id),
                ),
                None => unrecognized(id.clone(), "added shape is missing from the new model"),
            })
            .collect()
    }
}

/// A shape that exists only in the old model
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeRemoved;

impl Evaluator for ShapeRemoved {
    fn event_id(&self) -> &'static str {
        "ShapeRemoved"
    }

    fn evaluate(&self, index: &DiffIndex<'_>) -> Vec<ValidationEvent> {
        index
            .removed()
            .iter()
            .map(|id| match index.old_model().get(id) {
                Some(shape) => ValidationEvent::error(
                    self.event_id(),
                    id.clone(),
                    format!("Removed {} `{}`", shape.kind(), id),
                ),
                None => unrecognized(id.clone(), "removed shape is missing from the old model"),
            })
            .collect()
    }
}

/// A matched shape whose kind differs between versions
///
/// Member changes of such a shape are not reported; the member delta is not
/// meaningful across kinds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeTypeChanged;

impl Evaluator for ShapeTypeChanged {
    fn event_id(&self) -> &'static str {
        "ShapeTypeChanged"
    }

    fn evaluate(&self, index: &DiffIndex<'_>) -> Vec<ValidationEvent> {
        index
            .changed_shapes()
            .filter(|m| m.kind_changed())
            .map(|m| {
                ValidationEvent::error(
                    self.event_id(),
                    m.id().clone(),
                    format!(
                        "Shape `{}` type changed from `{}` to `{}`",
                        m.id(),
                        m.old.kind(),
                        m.new.kind()
                    ),
                )
            })
            .collect()
    }
}
