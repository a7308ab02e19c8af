//! The evaluator seam and its registry.

use std::fmt;
use std::sync::Arc;

use super::evaluators::{
    MemberAdded, MemberOrderChanged, MemberRemoved, MemberTargetChanged, ShapeAdded,
    ShapeRemoved, ShapeTypeChanged, TraitAdded, TraitContentChanged, TraitRemoved,
};
use super::event::ValidationEvent;
use super::index::DiffIndex;
use super::trait_rules::TraitRules;

/// Inspects one category of change and reports it as events
///
/// Evaluators are stateless with respect to any single diff call: the same
/// index always yields the same events, and an evaluator never sees another
/// evaluator's output. Implementations must be `Send + Sync` so the engine
/// may run them concurrently.
pub trait Evaluator: Send + Sync {
    /// Event id this evaluator primarily emits; also its name in logs
    fn event_id(&self) -> &'static str;

    /// Produce events for the differences this evaluator is responsible for
    ///
    /// Anything the evaluator cannot classify must be reported as an
    /// [`UNRECOGNIZED_CHANGE`](super::evaluators::UNRECOGNIZED_CHANGE)
    /// warning rather than dropped or panicked on.
    fn evaluate(&self, index: &DiffIndex<'_>) -> Vec<ValidationEvent>;
}

/// Ordered set of evaluators the engine runs on every diff
///
/// Registration order has no effect on output; the engine sorts events.
#[derive(Clone, Default)]
pub struct EvaluatorRegistry {
    evaluators: Vec<Arc<dyn Evaluator>>,
}

impl fmt::Debug for EvaluatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.event_ids()).finish()
    }
}

impl EvaluatorRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every built-in evaluator, with trait classification taken from `rules`
    pub fn standard(rules: TraitRules) -> Self {
        let rules = Arc::new(rules);
        Self::empty()
            .with(Arc::new(ShapeAdded))
            .with(Arc::new(ShapeRemoved))
            .with(Arc::new(ShapeTypeChanged))
            .with(Arc::new(MemberAdded))
            .with(Arc::new(MemberRemoved))
            .with(Arc::new(MemberTargetChanged))
            .with(Arc::new(MemberOrderChanged))
            .with(Arc::new(TraitAdded::new(Arc::clone(&rules))))
            .with(Arc::new(TraitRemoved::new(Arc::clone(&rules))))
            .with(Arc::new(TraitContentChanged::new(rules)))
    }

    pub fn from_evaluators(evaluators: Vec<Arc<dyn Evaluator>>) -> Self {
        Self { evaluators }
    }

    pub fn with(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluators.push(evaluator);
        self
    }

    pub fn event_ids(&self) -> Vec<&'static str> {
        self.evaluators.iter().map(|e| e.event_id()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Evaluator>> {
        self.evaluators.iter()
    }

    pub(crate) fn as_slice(&self) -> &[Arc<dyn Evaluator>] {
        &self.evaluators
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }
}
