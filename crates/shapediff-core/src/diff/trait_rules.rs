//! Per-trait classification rules used by the trait evaluators.
//!
//! The engine only knows trait presence and structural equality. Anything
//! finer (e.g. "a length bound got tighter") lives behind
//! [`TraitComparator`], registered per trait id at construction time.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use super::event::Severity;
use crate::model::canonical_json;

/// Traits whose presence changes required-ness or the serialized form
pub const DEFAULT_ESCALATED_TRAITS: &[&str] = &[
    "smithy.api#required",
    "smithy.api#default",
    "smithy.api#clientOptional",
    "smithy.api#jsonName",
    "smithy.api#xmlName",
    "smithy.api#xmlAttribute",
    "smithy.api#xmlFlattened",
    "smithy.api#xmlNamespace",
    "smithy.api#timestampFormat",
    "smithy.api#httpLabel",
    "smithy.api#httpQuery",
    "smithy.api#httpQueryParams",
    "smithy.api#httpHeader",
    "smithy.api#httpPrefixHeaders",
    "smithy.api#httpPayload",
    "smithy.api#httpResponseCode",
    "smithy.api#http",
    "smithy.api#streaming",
    "smithy.api#eventPayload",
    "smithy.api#eventHeader",
    "smithy.api#sparse",
    "smithy.api#idempotencyToken",
    "smithy.api#hostLabel",
];

pub const LENGTH_TRAIT: &str = "smithy.api#length";
pub const RANGE_TRAIT: &str = "smithy.api#range";

/// A comparator could not make sense of a trait value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonAnomaly {
    pub reason: String,
}

impl ComparisonAnomaly {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ComparisonAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Outcome of comparing two values of one trait
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentVerdict {
    /// Values differ textually but mean the same thing
    Equivalent,
    Classified { severity: Severity, message: String },
    /// The comparator could not classify the change
    Unrecognized(ComparisonAnomaly),
}

/// Domain-specific comparison for one trait
pub trait TraitComparator: Send + Sync {
    /// Compare the old and new value of `trait_id`
    ///
    /// Returns `Ok(None)` when the values are semantically equivalent.
    ///
    /// # Errors
    ///
    /// `ComparisonAnomaly` when either value has a form the comparator does
    /// not understand.
    fn compare(
        &self,
        trait_id: &str,
        old: &Value,
        new: &Value,
    ) -> Result<Option<(Severity, String)>, ComparisonAnomaly>;
}

/// Compares `{min, max}` bound traits such as `length` and `range`
///
/// Raising `min`, lowering `max`, or introducing either bound tightens the
/// accepted value space and is reported as DANGER. Any other change only
/// loosens it and is a NOTE.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsComparator;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    min: Option<f64>,
    max: Option<f64>,
}

impl Bounds {
    fn parse(value: &Value) -> Result<Self, ComparisonAnomaly> {
        let obj = value.as_object().ok_or_else(|| {
            ComparisonAnomaly::new(format!("expected an object, got {}", canonical_json(value)))
        })?;
        let bound = |key: &str| -> Result<Option<f64>, ComparisonAnomaly> {
            match obj.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(v) => v.as_f64().map(Some).ok_or_else(|| {
                    ComparisonAnomaly::new(format!(
                        "`{}` must be a number, got {}",
                        key,
                        canonical_json(v)
                    ))
                }),
            }
        };
        Ok(Self {
            min: bound("min")?,
            max: bound("max")?,
        })
    }
}

fn describe(bound: Option<f64>) -> String {
    bound.map_or_else(|| "unbounded".to_string(), |b| b.to_string())
}

impl TraitComparator for BoundsComparator {
    fn compare(
        &self,
        trait_id: &str,
        old: &Value,
        new: &Value,
    ) -> Result<Option<(Severity, String)>, ComparisonAnomaly> {
        let old = Bounds::parse(old)?;
        let new = Bounds::parse(new)?;
        if old == new {
            return Ok(None);
        }

        let min_tightened = match (old.min, new.min) {
            (None, Some(_)) => true,
            (Some(o), Some(n)) => n > o,
            _ => false,
        };
        let max_tightened = match (old.max, new.max) {
            (None, Some(_)) => true,
            (Some(o), Some(n)) => n < o,
            _ => false,
        };

        let detail = format!(
            "min {} -> {}, max {} -> {}",
            describe(old.min),
            describe(new.min),
            describe(old.max),
            describe(new.max)
        );
        if min_tightened || max_tightened {
            Ok(Some((
                Severity::Danger,
                format!("`{}` was tightened ({})", trait_id, detail),
            )))
        } else {
            Ok(Some((
                Severity::Note,
                format!("`{}` was relaxed ({})", trait_id, detail),
            )))
        }
    }
}

/// Static registry of per-trait classification rules
#[derive(Clone)]
pub struct TraitRules {
    escalated: BTreeSet<String>,
    content_overrides: BTreeMap<String, Severity>,
    comparators: BTreeMap<String, Arc<dyn TraitComparator>>,
}

impl fmt::Debug for TraitRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraitRules")
            .field("escalated", &self.escalated)
            .field("content_overrides", &self.content_overrides)
            .field("comparators", &self.comparators.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for TraitRules {
    fn default() -> Self {
        Self::standard()
    }
}

impl TraitRules {
    /// No escalations, no overrides, no comparators
    pub fn empty() -> Self {
        Self {
            escalated: BTreeSet::new(),
            content_overrides: BTreeMap::new(),
            comparators: BTreeMap::new(),
        }
    }

    /// The default allowlist plus the bounds comparator for length/range
    pub fn standard() -> Self {
        Self::empty()
            .with_escalated(DEFAULT_ESCALATED_TRAITS.iter().copied())
            .with_comparator(LENGTH_TRAIT, Arc::new(BoundsComparator))
            .with_comparator(RANGE_TRAIT, Arc::new(BoundsComparator))
    }

    /// Add trait ids whose addition or removal is an ERROR
    pub fn with_escalated<I, S>(mut self, trait_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.escalated.extend(trait_ids.into_iter().map(Into::into));
        self
    }

    /// Drop every escalated trait id
    pub fn without_escalations(mut self) -> Self {
        self.escalated.clear();
        self
    }

    /// Force the severity of content changes to `trait_id`
    pub fn with_content_override(mut self, trait_id: impl Into<String>, severity: Severity) -> Self {
        self.content_overrides.insert(trait_id.into(), severity);
        self
    }

    /// Register a comparator for `trait_id`, replacing any previous one
    pub fn with_comparator(
        mut self,
        trait_id: impl Into<String>,
        comparator: Arc<dyn TraitComparator>,
    ) -> Self {
        self.comparators.insert(trait_id.into(), comparator);
        self
    }

    pub fn is_escalated(&self, trait_id: &str) -> bool {
        self.escalated.contains(trait_id)
    }

    pub fn escalated(&self) -> impl Iterator<Item = &str> {
        self.escalated.iter().map(String::as_str)
    }

    /// Severity of adding or removing `trait_id`
    pub fn presence_severity(&self, trait_id: &str) -> Severity {
        if self.is_escalated(trait_id) {
            Severity::Error
        } else {
            Severity::Warning
        }
    }

    /// Classify a change of value of `trait_id`
    ///
    /// A configured override wins over a comparator; without either the
    /// change is a WARNING.
    pub fn classify_content(&self, trait_id: &str, old: &Value, new: &Value) -> ContentVerdict {
        if let Some(severity) = self.content_overrides.get(trait_id) {
            return ContentVerdict::Classified {
                severity: *severity,
                message: changed_message(trait_id, old, new),
            };
        }
        match self.comparators.get(trait_id) {
            Some(comparator) => match comparator.compare(trait_id, old, new) {
                Ok(None) => ContentVerdict::Equivalent,
                Ok(Some((severity, message))) => ContentVerdict::Classified { severity, message },
                Err(anomaly) => ContentVerdict::Unrecognized(anomaly),
            },
            None => ContentVerdict::Classified {
                severity: Severity::Warning,
                message: changed_message(trait_id, old, new),
            },
        }
    }
}

fn changed_message(trait_id: &str, old: &Value, new: &Value) -> String {
    format!(
        "Changed trait `{}` from {} to {}",
        trait_id,
        canonical_json(old),
        canonical_json(new)
    )
}
