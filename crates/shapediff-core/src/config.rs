//! Diff configuration (`shapediff.toml`).
//!
//! Selects evaluator scheduling, adjusts trait classification, and lists
//! suppressions. Every field has a default, so an empty document (or a
//! missing file) yields the standard engine.
//!
//! ```toml
//! parallel = true
//!
//! [traits]
//! extra_escalate = ["acme#wireFormat"]
//!
//! [traits.content_severity]
//! "acme#pagination" = "DANGER"
//!
//! [[suppressions]]
//! event_id = "TraitAdded"
//! shape_id = "acme.example#*"
//! reason = "migration window"
//! ```

#![allow(clippy::result_large_err)]

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::diff::engine::Parallelism;
use crate::diff::event::Severity;
use crate::diff::suppression::Suppression;
use crate::diff::trait_rules::TraitRules;
use crate::errors::{ExError, ExErrorKind, Result};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level diff configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffConfig {
    /// Run evaluators on the rayon pool (default: `true`).
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Trait classification settings.
    #[serde(default)]
    pub traits: TraitsConfig,

    /// Caller suppressions, applied after sorting.
    #[serde(default)]
    pub suppressions: Vec<SuppressionConfig>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            traits: TraitsConfig::default(),
            suppressions: Vec::new(),
        }
    }
}

const fn default_parallel() -> bool {
    true
}

// ---------------------------------------------------------------------------
// TraitsConfig
// ---------------------------------------------------------------------------

/// Trait classification settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraitsConfig {
    /// Replaces the built-in escalation allowlist when present.
    #[serde(default)]
    pub escalate: Option<Vec<String>>,

    /// Appended to the escalation allowlist.
    #[serde(default)]
    pub extra_escalate: Vec<String>,

    /// Fixed severity for value changes of the named traits.
    #[serde(default)]
    pub content_severity: BTreeMap<String, Severity>,
}

// ---------------------------------------------------------------------------
// SuppressionConfig
// ---------------------------------------------------------------------------

/// One `[[suppressions]]` entry, compiled by [`DiffConfig::suppressions`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuppressionConfig {
    pub event_id: String,
    pub shape_id: String,
    pub reason: String,
}

impl DiffConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ExError::new(ExErrorKind::InvalidConfig)
                    .with_op("load_config")
                    .with_message(format!("could not read {}: {}", path.display(), e)))
            }
        };
        Self::from_toml_str(&contents).map_err(|e| {
            let message = format!("{}: {}", path.display(), e.message());
            ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_config")
                .with_message(message)
        })
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on invalid TOML, unknown fields, or unknown severity
    /// names. The message carries the line number when known.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e: toml::de::Error| {
            let mut message = e.message().to_owned();
            if let Some(span) = e.span() {
                let line = toml_str[..span.start]
                    .chars()
                    .filter(|&c| c == '\n')
                    .count()
                    + 1;
                message = format!("line {line}: {message}");
            }
            ExError::new(ExErrorKind::InvalidConfig)
                .with_op("parse_config")
                .with_message(message)
        })
    }

    pub fn parallelism(&self) -> Parallelism {
        if self.parallel {
            Parallelism::Parallel
        } else {
            Parallelism::Sequential
        }
    }

    /// Standard trait rules adjusted by the `[traits]` table
    pub fn trait_rules(&self) -> TraitRules {
        let mut rules = TraitRules::standard();
        if let Some(escalate) = &self.traits.escalate {
            rules = rules.without_escalations().with_escalated(escalate.iter().cloned());
        }
        rules = rules.with_escalated(self.traits.extra_escalate.iter().cloned());
        for (trait_id, severity) in &self.traits.content_severity {
            rules = rules.with_content_override(trait_id.clone(), *severity);
        }
        rules
    }

    /// Compile the `[[suppressions]]` entries in declaration order
    ///
    /// # Errors
    ///
    /// `InvalidSuppression` for the first entry with a blank field or an
    /// invalid glob pattern.
    pub fn suppressions(&self) -> Result<Vec<Suppression>> {
        self.suppressions
            .iter()
            .map(|s| Suppression::new(&s.event_id, &s.shape_id, &s.reason))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
