//! Device status classification.
//!
//! Devices report free-form status strings (`running`, `idle`, `off`,
//! `unavailable`, …). Anything in a configured set of inactive strings is
//! *inactive*; every other value counts as *active*.

use std::collections::BTreeSet;

/// Status strings classified as inactive when no explicit set is configured.
pub const DEFAULT_INACTIVE_STATES: [&str; 3] = ["off", "unavailable", "unknown"];

/// Whether a device is currently doing work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Active,
    Inactive,
}

/// Classifies raw status strings by membership in a set of inactive values.
///
/// Built once from configuration and handed to the cycle tracker at
/// construction time.
#[derive(Debug, Clone)]
pub struct StatusClassifier {
    inactive: BTreeSet<String>,
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_INACTIVE_STATES)
    }
}

impl StatusClassifier {
    /// Build a classifier from the set of strings to treat as inactive.
    pub fn new<I, S>(inactive: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inactive: inactive.into_iter().map(Into::into).collect(),
        }
    }

    /// Classify a raw status string.
    ///
    /// Leading and trailing whitespace is ignored; membership is otherwise
    /// exact.
    #[must_use]
    pub fn classify(&self, raw: &str) -> Activity {
        if self.inactive.contains(raw.trim()) {
            Activity::Inactive
        } else {
            Activity::Active
        }
    }
}
