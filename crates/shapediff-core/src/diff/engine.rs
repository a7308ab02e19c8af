//! Model diff orchestration.
//!
//! [`ModelDiffEngine::diff`] builds the [`DiffIndex`] once, fans the
//! registered evaluators out over it, and post-processes the merged output:
//!
//! 1. contract check (every event names a shape of either model)
//! 2. canonical sort by shape id, event id, severity, message
//! 3. suppression (matched events become `SUPPRESSED`, nothing is dropped)
//! 4. verdict (`has_errors` if any active event is ERROR or DANGER)
//!
//! Evaluators may run on the rayon pool; the sort in step 2 is what makes the
//! output independent of completion order and registration order.

#![allow(clippy::result_large_err)]

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use super::evaluator::{Evaluator, EvaluatorRegistry};
use super::event::{Severity, ValidationEvent};
use super::index::DiffIndex;
use super::suppression::{apply_suppressions, Suppression};
use super::trait_rules::TraitRules;
use crate::config::DiffConfig;
use crate::core_types::{RequestContext, TraceId};
use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::Model;
use crate::{log_op_end, log_op_error, log_op_start};

const OP_DIFF: &str = "diff";

/// How evaluators are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// One after another on the calling thread
    Sequential,
    /// One rayon task per evaluator
    #[default]
    Parallel,
}

/// Outcome of one diff call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    events: Vec<ValidationEvent>,
    has_errors: bool,
}

impl DiffResult {
    fn new(events: Vec<ValidationEvent>) -> Self {
        let has_errors = events.iter().any(ValidationEvent::is_blocking);
        Self { events, has_errors }
    }

    /// Every event in canonical order, suppressed ones included
    pub fn events(&self) -> &[ValidationEvent] {
        &self.events
    }

    /// True if any active event is ERROR or DANGER
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn active(&self) -> impl Iterator<Item = &ValidationEvent> {
        self.events.iter().filter(|e| e.is_active())
    }

    pub fn suppressed(&self) -> impl Iterator<Item = &ValidationEvent> {
        self.events.iter().filter(|e| !e.is_active())
    }

    /// Number of active events per severity; every severity has an entry
    pub fn count_by_severity(&self) -> BTreeMap<Severity, usize> {
        let mut counts: BTreeMap<Severity, usize> =
            Severity::ALL.into_iter().map(|s| (s, 0)).collect();
        for event in self.active() {
            *counts.entry(event.severity()).or_default() += 1;
        }
        counts
    }

    pub fn max_active_severity(&self) -> Option<Severity> {
        self.active().map(ValidationEvent::severity).max()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_parts(self) -> (Vec<ValidationEvent>, bool) {
        (self.events, self.has_errors)
    }
}

/// Runs a fixed evaluator registry over pairs of models
#[derive(Debug, Clone)]
pub struct ModelDiffEngine {
    registry: EvaluatorRegistry,
    parallelism: Parallelism,
}

impl Default for ModelDiffEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl ModelDiffEngine {
    pub fn new(registry: EvaluatorRegistry) -> Self {
        Self {
            registry,
            parallelism: Parallelism::default(),
        }
    }

    /// Every built-in evaluator with the default trait rules
    pub fn standard() -> Self {
        Self::new(EvaluatorRegistry::standard(TraitRules::standard()))
    }

    /// Built-in evaluators with trait rules and scheduling taken from `config`
    ///
    /// Suppressions in the config are not part of the engine; pass
    /// [`DiffConfig::suppressions`] to [`ModelDiffEngine::diff`].
    pub fn from_config(config: &DiffConfig) -> Self {
        Self::new(EvaluatorRegistry::standard(config.trait_rules()))
            .with_parallelism(config.parallelism())
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn registry(&self) -> &EvaluatorRegistry {
        &self.registry
    }

    pub fn parallelism(&self) -> Parallelism {
        self.parallelism
    }

    /// Diff `old` against `new`
    ///
    /// # Errors
    ///
    /// - `PartitionViolation`: the diff index failed its partition check
    /// - `ContractViolation`: an evaluator reported a shape id found in
    ///   neither model
    pub fn diff(
        &self,
        old: &Model,
        new: &Model,
        suppressions: &[Suppression],
    ) -> Result<DiffResult> {
        self.diff_with_context(&RequestContext::new(), old, new, suppressions)
    }

    /// As [`ModelDiffEngine::diff`], logging under the caller's request id
    ///
    /// # Errors
    ///
    /// See [`ModelDiffEngine::diff`].
    pub fn diff_with_context(
        &self,
        ctx: &RequestContext,
        old: &Model,
        new: &Model,
        suppressions: &[Suppression],
    ) -> Result<DiffResult> {
        let request_id = ctx.request_id.as_str();
        let trace_id = ctx.trace_id.as_ref().map(TraceId::as_str);
        let span = tracing::info_span!("diff", request_id = request_id, trace_id = trace_id);
        let _guard = span.enter();

        log_op_start!(
            OP_DIFF,
            request_id = request_id,
            trace_id = trace_id,
            evaluators = self.registry.len(),
            suppressions = suppressions.len()
        );
        let start = Instant::now();

        let result = self.diff_impl(request_id, old, new, suppressions).map_err(|e| {
            log_op_error!(
                OP_DIFF,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = request_id,
                shape_id = e.shape_id()
            );
            e
        })?;

        log_op_end!(
            OP_DIFF,
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = request_id,
            event_count = result.events().len(),
            suppressed_count = result.suppressed().count(),
            has_errors = result.has_errors()
        );
        Ok(result)
    }

    fn diff_impl(
        &self,
        request_id: &str,
        old: &Model,
        new: &Model,
        suppressions: &[Suppression],
    ) -> Result<DiffResult> {
        let index = DiffIndex::build(old, new)?;
        tracing::debug!(
            request_id = request_id,
            added = index.added().len(),
            removed = index.removed().len(),
            matched = index.matched_len(),
            "diff index built"
        );

        let evaluators = self.registry.as_slice();
        let outputs: Vec<(&'static str, Vec<ValidationEvent>)> = match self.parallelism {
            Parallelism::Sequential => evaluators
                .iter()
                .map(|e| run_evaluator(request_id, e, &index))
                .collect(),
            Parallelism::Parallel => evaluators
                .par_iter()
                .map(|e| run_evaluator(request_id, e, &index))
                .collect(),
        };

        let mut events = Vec::with_capacity(outputs.iter().map(|(_, v)| v.len()).sum());
        for (evaluator, produced) in outputs {
            check_contract(&index, evaluator, &produced)?;
            events.extend(produced);
        }

        events.sort();
        let events = apply_suppressions(events, suppressions);
        for event in events.iter().filter(|e| !e.is_active()) {
            tracing::debug!(
                request_id = request_id,
                event_id = event.event_id(),
                shape_id = %event.shape_id(),
                severity = event.severity().as_str(),
                "event suppressed"
            );
        }

        Ok(DiffResult::new(events))
    }
}

fn run_evaluator(
    request_id: &str,
    evaluator: &Arc<dyn Evaluator>,
    index: &DiffIndex<'_>,
) -> (&'static str, Vec<ValidationEvent>) {
    let events = evaluator.evaluate(index);
    tracing::debug!(
        request_id = request_id,
        evaluator = evaluator.event_id(),
        event_count = events.len(),
        "evaluator finished"
    );
    (evaluator.event_id(), events)
}

fn check_contract(
    index: &DiffIndex<'_>,
    evaluator: &str,
    events: &[ValidationEvent],
) -> Result<()> {
    match events.iter().find(|e| !index.contains_in_either(e.shape_id())) {
        Some(rogue) => Err(ExError::new(ExErrorKind::ContractViolation)
            .with_op(OP_DIFF)
            .with_shape_id(rogue.shape_id().to_string())
            .with_message(format!(
                "evaluator `{}` reported `{}` for a shape found in neither model",
                evaluator,
                rogue.event_id()
            ))),
        None => Ok(()),
    }
}

/// Diff with the standard engine
///
/// # Errors
///
/// See [`ModelDiffEngine::diff`].
pub fn diff(old: &Model, new: &Model, suppressions: &[Suppression]) -> Result<DiffResult> {
    ModelDiffEngine::standard().diff(old, new, suppressions)
}
