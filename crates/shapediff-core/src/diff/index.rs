//! Precomputed differences between two models.
//!
//! The index is built once per diff call and shared read-only by every
//! evaluator. All collections are ordered so that iteration, and therefore
//! evaluator output, is reproducible.

#![allow(clippy::result_large_err)]

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::{MemberShape, Model, Shape, ShapeId, ShapeKind, TraitMap};

/// Name of the operation member whose target is the request payload
pub const INPUT_MEMBER: &str = "input";

/// One trait that differs between the two sides
#[derive(Debug, Clone, PartialEq)]
pub struct TraitChange {
    pub trait_id: String,
    /// Value in the old model (`None` if the trait was added)
    pub old: Option<Value>,
    /// Value in the new model (`None` if the trait was removed)
    pub new: Option<Value>,
}

/// Trait differences for one shape or member, each list sorted by trait id
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TraitDelta {
    pub added: Vec<TraitChange>,
    pub removed: Vec<TraitChange>,
    /// Present on both sides with structurally unequal values
    pub changed: Vec<TraitChange>,
}

impl TraitDelta {
    /// Compare two trait maps
    ///
    /// Values are compared as JSON documents; object key order is irrelevant.
    pub fn between(old: &TraitMap, new: &TraitMap) -> Self {
        let mut delta = TraitDelta::default();
        for (trait_id, old_value) in old {
            match new.get(trait_id) {
                None => delta.removed.push(TraitChange {
                    trait_id: trait_id.clone(),
                    old: Some(old_value.clone()),
                    new: None,
                }),
                Some(new_value) if new_value != old_value => delta.changed.push(TraitChange {
                    trait_id: trait_id.clone(),
                    old: Some(old_value.clone()),
                    new: Some(new_value.clone()),
                }),
                Some(_) => {}
            }
        }
        for (trait_id, new_value) in new {
            if !old.contains_key(trait_id) {
                delta.added.push(TraitChange {
                    trait_id: trait_id.clone(),
                    old: None,
                    new: Some(new_value.clone()),
                });
            }
        }
        delta
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// A member present under the same name on both sides
#[derive(Debug, Clone, PartialEq)]
pub struct RetainedMember {
    pub name: String,
    pub id: ShapeId,
    pub old_target: ShapeId,
    pub new_target: ShapeId,
    pub traits: TraitDelta,
}

impl RetainedMember {
    pub fn target_changed(&self) -> bool {
        self.old_target != self.new_target
    }

    pub fn is_unchanged(&self) -> bool {
        !self.target_changed() && self.traits.is_empty()
    }
}

/// Member differences of a matched shape
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemberDelta {
    /// Names only in the new shape, in new declaration order
    pub added: Vec<String>,
    /// Names only in the old shape, in old declaration order
    pub removed: Vec<String>,
    /// Names on both sides, in old declaration order
    pub retained: Vec<RetainedMember>,
    /// The retained names appear in a different relative order
    pub order_changed: bool,
}

impl MemberDelta {
    fn between(old: &Shape, new: &Shape) -> Self {
        let old_names: Vec<&str> = old.members().iter().map(MemberShape::name).collect();
        let new_names: Vec<&str> = new.members().iter().map(MemberShape::name).collect();
        let old_set: BTreeSet<&str> = old_names.iter().copied().collect();
        let new_set: BTreeSet<&str> = new_names.iter().copied().collect();

        let added = new_names
            .iter()
            .filter(|n| !old_set.contains(*n))
            .map(|n| n.to_string())
            .collect();
        let removed = old_names
            .iter()
            .filter(|n| !new_set.contains(*n))
            .map(|n| n.to_string())
            .collect();

        let retained: Vec<RetainedMember> = old
            .members()
            .iter()
            .filter_map(|old_member| {
                let new_member = new.member(old_member.name())?;
                Some(RetainedMember {
                    name: old_member.name().to_string(),
                    id: old_member.id().clone(),
                    old_target: old_member.target().clone(),
                    new_target: new_member.target().clone(),
                    traits: TraitDelta::between(old_member.traits(), new_member.traits()),
                })
            })
            .collect();

        let old_order: Vec<&str> = old_names
            .iter()
            .copied()
            .filter(|n| new_set.contains(n))
            .collect();
        let new_order: Vec<&str> = new_names
            .iter()
            .copied()
            .filter(|n| old_set.contains(n))
            .collect();

        Self {
            added,
            removed,
            retained,
            order_changed: old_order != new_order,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && !self.order_changed
            && self.retained.iter().all(RetainedMember::is_unchanged)
    }
}

/// A shape id present in both models, with its computed deltas
#[derive(Debug, Clone)]
pub struct MatchedShape<'a> {
    pub old: &'a Shape,
    pub new: &'a Shape,
    pub traits: TraitDelta,
    /// `None` when the kind changed or the kind carries no members
    pub members: Option<MemberDelta>,
}

impl MatchedShape<'_> {
    pub fn id(&self) -> &ShapeId {
        self.new.id()
    }

    pub fn kind_changed(&self) -> bool {
        self.old.kind() != self.new.kind()
    }

    pub fn is_unchanged(&self) -> bool {
        !self.kind_changed()
            && self.traits.is_empty()
            && self.members.as_ref().map_or(true, MemberDelta::is_empty)
    }
}

/// Partition of shape ids into removed/added/matched, plus per-shape deltas
#[derive(Debug, Clone)]
pub struct DiffIndex<'a> {
    old: &'a Model,
    new: &'a Model,
    removed: BTreeSet<ShapeId>,
    added: BTreeSet<ShapeId>,
    matched: BTreeMap<ShapeId, MatchedShape<'a>>,
    input_closure: BTreeSet<ShapeId>,
}

impl<'a> DiffIndex<'a> {
    /// Build the index for `old` → `new`
    ///
    /// Pure over its inputs; neither model is modified.
    ///
    /// # Errors
    ///
    /// `PartitionViolation` if the computed partitions overlap or do not
    /// cover every id of both models. This indicates a bug, not bad input.
    pub fn build(old: &'a Model, new: &'a Model) -> Result<Self> {
        let old_ids = old.ids();
        let new_ids = new.ids();

        let removed: BTreeSet<ShapeId> = old_ids
            .difference(&new_ids)
            .map(|id| (*id).clone())
            .collect();
        let added: BTreeSet<ShapeId> = new_ids
            .difference(&old_ids)
            .map(|id| (*id).clone())
            .collect();

        let mut matched = BTreeMap::new();
        for id in old_ids.intersection(&new_ids) {
            let (Some(old_shape), Some(new_shape)) = (old.get(id), new.get(id)) else {
                continue;
            };
            let members = (old_shape.kind() == new_shape.kind() && old_shape.kind().has_members())
                .then(|| MemberDelta::between(old_shape, new_shape));
            matched.insert(
                (*id).clone(),
                MatchedShape {
                    old: old_shape,
                    new: new_shape,
                    traits: TraitDelta::between(old_shape.traits(), new_shape.traits()),
                    members,
                },
            );
        }

        let index = Self {
            old,
            new,
            removed,
            added,
            matched,
            input_closure: input_closure(new),
        };
        index.check_partitions()?;
        Ok(index)
    }

    fn check_partitions(&self) -> Result<()> {
        let violation = |id: &ShapeId, message: &str| {
            ExError::new(ExErrorKind::PartitionViolation)
                .with_op("build_diff_index")
                .with_shape_id(id.to_string())
                .with_message(message.to_string())
        };

        for id in &self.removed {
            if self.added.contains(id) || self.matched.contains_key(id) {
                return Err(violation(id, "id appears in more than one partition"));
            }
        }
        for id in self.added.iter() {
            if self.matched.contains_key(id) {
                return Err(violation(id, "id appears in more than one partition"));
            }
        }

        let expected = self.old.len() + self.new.len() - self.matched.len();
        let covered = self.removed.len() + self.added.len() + self.matched.len();
        if expected != covered {
            let missing = self
                .old
                .shapes()
                .chain(self.new.shapes())
                .map(|(id, _)| id)
                .find(|id| {
                    !self.removed.contains(*id)
                        && !self.added.contains(*id)
                        && !self.matched.contains_key(*id)
                });
            if let Some(id) = missing {
                return Err(violation(id, "id is missing from every partition"));
            }
        }
        Ok(())
    }

    pub fn old_model(&self) -> &'a Model {
        self.old
    }

    pub fn new_model(&self) -> &'a Model {
        self.new
    }

    /// Ids only in the old model
    pub fn removed(&self) -> &BTreeSet<ShapeId> {
        &self.removed
    }

    /// Ids only in the new model
    pub fn added(&self) -> &BTreeSet<ShapeId> {
        &self.added
    }

    /// Ids in both models
    pub fn matched(&self) -> impl Iterator<Item = &ShapeId> {
        self.matched.keys()
    }

    /// Matched pairs with at least one difference, in id order
    pub fn changed_shapes(&self) -> impl Iterator<Item = &MatchedShape<'a>> {
        self.matched.values().filter(|m| !m.is_unchanged())
    }

    /// Delta for a matched id
    pub fn changed(&self, id: &ShapeId) -> Option<&MatchedShape<'a>> {
        self.matched.get(id)
    }

    /// Whether a new-model shape is reachable from any operation input
    pub fn is_input(&self, id: &ShapeId) -> bool {
        self.input_closure.contains(id)
    }

    /// True if `id` (shape or member) exists in either model
    pub fn contains_in_either(&self, id: &ShapeId) -> bool {
        self.old.contains(id) || self.new.contains(id)
    }

    /// No differences at all
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed_shapes().next().is_none()
    }

    pub fn matched_len(&self) -> usize {
        self.matched.len()
    }
}

/// Every shape reachable from an operation's `input` member
fn input_closure(model: &Model) -> BTreeSet<ShapeId> {
    let mut queue: VecDeque<&ShapeId> = model
        .shapes()
        .filter(|(_, shape)| shape.kind() == ShapeKind::Operation)
        .filter_map(|(_, shape)| shape.member(INPUT_MEMBER))
        .map(MemberShape::target)
        .collect();

    let mut seen = BTreeSet::new();
    while let Some(id) = queue.pop_front() {
        if !seen.insert(id.clone()) {
            continue;
        }
        if let Some(shape) = model.get(id) {
            queue.extend(shape.members().iter().map(MemberShape::target));
        }
    }
    seen
}
