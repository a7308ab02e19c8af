use std::sync::Arc;

use super::{trait_sites, unrecognized};
use crate::diff::evaluator::Evaluator;
use crate::diff::event::ValidationEvent;
use crate::diff::index::DiffIndex;
use crate::diff::trait_rules::{ContentVerdict, TraitRules};

/// A trait attached to a matched shape or retained member
#[derive(Debug, Clone)]
pub struct TraitAdded {
    rules: Arc<TraitRules>,
}

impl TraitAdded {
    pub fn new(rules: Arc<TraitRules>) -> Self {
        Self { rules }
    }
}

impl Evaluator for TraitAdded {
    fn event_id(&self) -> &'static str {
        "TraitAdded"
    }

    fn evaluate(&self, index: &DiffIndex<'_>) -> Vec<ValidationEvent> {
        trait_sites(index)
            .into_iter()
            .flat_map(|(id, delta)| delta.added.iter().map(move |change| (id, change)))
            .map(|(id, change)| {
                ValidationEvent::new(
                    self.event_id(),
                    self.rules.presence_severity(&change.trait_id),
                    id.clone(),
                    format!("Added trait `{}` to `{}`", change.trait_id, id),
                )
            })
            .collect()
    }
}

/// A trait detached from a matched shape or retained member
#[derive(Debug, Clone)]
pub struct TraitRemoved {
    rules: Arc<TraitRules>,
}

impl TraitRemoved {
    pub fn new(rules: Arc<TraitRules>) -> Self {
        Self { rules }
    }
}

impl Evaluator for TraitRemoved {
    fn event_id(&self) -> &'static str {
        "TraitRemoved"
    }

    fn evaluate(&self, index: &DiffIndex<'_>) -> Vec<ValidationEvent> {
        trait_sites(index)
            .into_iter()
            .flat_map(|(id, delta)| delta.removed.iter().map(move |change| (id, change)))
            .map(|(id, change)| {
                ValidationEvent::new(
                    self.event_id(),
                    self.rules.presence_severity(&change.trait_id),
                    id.clone(),
                    format!("Removed trait `{}` from `{}`", change.trait_id, id),
                )
            })
            .collect()
    }
}

/// A trait present on both sides whose value differs
///
/// Classification is delegated to [`TraitRules`]. A comparator that cannot
/// read a value yields an `UnrecognizedChange` warning for that site.
#[derive(Debug, Clone)]
pub struct TraitContentChanged {
    rules: Arc<TraitRules>,
}

impl TraitContentChanged {
    pub fn new(rules: Arc<TraitRules>) -> Self {
        Self { rules }
    }
}

impl Evaluator for TraitContentChanged {
    fn event_id(&self) -> &'static str {
        "TraitContentChanged"
    }

    fn evaluate(&self, index: &DiffIndex<'_>) -> Vec<ValidationEvent> {
        let mut events = Vec::new();
        for (id, delta) in trait_sites(index) {
            for change in &delta.changed {
                let (Some(old), Some(new)) = (&change.old, &change.new) else {
                    events.push(unrecognized(
                        id.clone(),
                        format!("trait `{}` changed without both values", change.trait_id),
                    ));
                    continue;
                };
                match self.rules.classify_content(&change.trait_id, old, new) {
                    ContentVerdict::Equivalent => {}
                    ContentVerdict::Classified { severity, message } => events.push(
                        ValidationEvent::new(self.event_id(), severity, id.clone(), message),
                    ),
                    ContentVerdict::Unrecognized(anomaly) => events.push(unrecognized(
                        id.clone(),
                        format!("trait `{}`: {}", change.trait_id, anomaly),
                    )),
                }
            }
        }
        events
    }
}
