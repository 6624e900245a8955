//! The duration ledger — completed cycle segments for the current day.
//!
//! An ordered, append-only-until-reset list of elapsed-second durations.
//! Persisted as a JSON array of numbers (`[]` when empty) and cleared exactly
//! once per day by the daily backfill.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Ordered list of cycle (or cycle segment) durations, in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationLedger(Vec<i64>);

impl DurationLedger {
    /// Parse the persisted JSON array form.
    ///
    /// Accepts integral and fractional numbers; fractional values are rounded
    /// to whole seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::DurationList`] when the text is not a JSON array
    /// of numbers.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let values: Vec<f64> = serde_json::from_str(text.trim())
            .map_err(|_| ParseError::DurationList(text.to_string()))?;
        Ok(Self(values.into_iter().map(|v| v.round() as i64).collect()))
    }

    /// Render the persisted JSON array form.
    #[must_use]
    pub fn render(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }

    /// Append a duration to the end of the ledger.
    pub fn append(&mut self, seconds: i64) {
        self.0.push(seconds);
    }

    /// Sum of all recorded durations.
    #[must_use]
    pub fn total_seconds(&self) -> i64 {
        self.0.iter().sum()
    }

    #[must_use]
    pub fn entries(&self) -> &[i64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_empty_array() {
        let ledger = DurationLedger::parse("[]").unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_seconds(), 0);
    }

    #[test]
    fn should_parse_array_of_integers() {
        let ledger = DurationLedger::parse("[600, 1200]").unwrap();
        assert_eq!(ledger.entries(), &[600, 1200]);
        assert_eq!(ledger.total_seconds(), 1800);
    }

    #[test]
    fn should_round_fractional_durations_to_whole_seconds() {
        let ledger = DurationLedger::parse("[599.6, 0.4]").unwrap();
        assert_eq!(ledger.entries(), &[600, 0]);
    }

    #[test]
    fn should_reject_text_that_is_not_a_number_array() {
        for bad in ["", "not json", "{\"a\": 1}", "[\"x\"]"] {
            let result = DurationLedger::parse(bad);
            assert!(
                matches!(result, Err(ParseError::DurationList(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn should_roundtrip_through_rendered_form() {
        let mut ledger = DurationLedger::default();
        ledger.append(600);
        ledger.append(1200);
        assert_eq!(ledger.render(), "[600,1200]");
        assert_eq!(DurationLedger::parse(&ledger.render()).unwrap(), ledger);
    }

    #[test]
    fn should_render_empty_ledger_as_empty_array() {
        assert_eq!(DurationLedger::default().render(), "[]");
    }

    #[test]
    fn should_keep_total_equal_to_sum_of_entries_after_appends() {
        let mut ledger = DurationLedger::default();
        for seconds in [300, 0, 4500] {
            ledger.append(seconds);
        }
        assert_eq!(ledger.total_seconds(), ledger.entries().iter().sum::<i64>());
        assert_eq!(ledger.len(), 3);
    }
}
