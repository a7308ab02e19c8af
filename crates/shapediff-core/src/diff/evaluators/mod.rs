//! Built-in evaluators, one per change category.
//!
//! | Event id              | Fires on                                   | Severity                 |
//! |-----------------------|--------------------------------------------|--------------------------|
//! | `ShapeAdded`          | id only in the new model                   | NOTE                     |
//! | `ShapeRemoved`        | id only in the old model                   | ERROR                    |
//! | `ShapeTypeChanged`    | matched id whose kind differs              | ERROR                    |
//! | `MemberAdded`         | member only in the new shape               | WARNING on input, else NOTE |
//! | `MemberRemoved`       | member only in the old shape               | ERROR                    |
//! | `MemberTargetChanged` | retained member with a different target    | ERROR                    |
//! | `MemberOrderChanged`  | structure/union members reordered          | DANGER                   |
//! | `TraitAdded`          | trait only on the new shape or member      | WARNING, ERROR if escalated |
//! | `TraitRemoved`        | trait only on the old shape or member      | WARNING, ERROR if escalated |
//! | `TraitContentChanged` | trait value differs                        | per [`TraitRules`](super::trait_rules::TraitRules) |
//!
//! Anything an evaluator cannot classify is reported under
//! [`UNRECOGNIZED_CHANGE`] as a WARNING.

mod members;
mod shapes;
mod traits;

pub use members::{MemberAdded, MemberOrderChanged, MemberRemoved, MemberTargetChanged};
pub use shapes::{ShapeAdded, ShapeRemoved, ShapeTypeChanged};
pub use traits::{TraitAdded, TraitContentChanged, TraitRemoved};

use super::event::ValidationEvent;
use super::index::{DiffIndex, TraitDelta};
use crate::model::ShapeId;

/// Event id for changes an evaluator saw but could not classify
pub const UNRECOGNIZED_CHANGE: &str = "UnrecognizedChange";

pub(crate) fn unrecognized(shape_id: ShapeId, detail: impl AsRef<str>) -> ValidationEvent {
    let message = format!("Unrecognized change to `{}`: {}", shape_id, detail.as_ref());
    ValidationEvent::warning(UNRECOGNIZED_CHANGE, shape_id, message)
}

/// Every (shape or member id, trait delta) pair of matched shapes, in id order
///
/// Members of added or removed containers are never visited; their
/// containers are reported as a whole.
fn trait_sites<'i>(index: &'i DiffIndex<'_>) -> Vec<(&'i ShapeId, &'i TraitDelta)> {
    let mut sites = Vec::new();
    for matched in index.changed_shapes() {
        if !matched.traits.is_empty() {
            sites.push((matched.id(), &matched.traits));
        }
        if let Some(members) = &matched.members {
            sites.extend(
                members
                    .retained
                    .iter()
                    .filter(|m| !m.traits.is_empty())
                    .map(|m| (&m.id, &m.traits)),
            );
        }
    }
    sites
}
