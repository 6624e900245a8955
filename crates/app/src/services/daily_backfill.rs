//! Daily backfill — folds the delayed daily energy report into the lifetime
//! counter, exactly once per calendar day.

use chrono::NaiveDate;

use tally_domain::energy::WattHours;
use tally_domain::error::TallyError;
use tally_domain::time::{Timestamp, day_of, previous_day};

use crate::ports::{BackfillUpdate, StateStore};

/// What a single energy-report event did to the lifetime counter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackfillOutcome {
    /// The report was folded in and the daily accumulators were reset.
    Applied {
        /// The date the report covers (the day before the event).
        date: NaiveDate,
        added_kwh: f64,
        lifetime_kwh: f64,
    },
    /// The date was already processed; nothing changed.
    AlreadyProcessed { date: NaiveDate },
}

/// Handler for daily energy-report events.
///
/// Owns the lifetime counter and the last-processed-date guard, and resets
/// the tracker's daily accumulators when a new day is folded in. The
/// lifetime counter is only ever added to, never overwritten, so an operator
/// adjustment between events survives.
pub struct DailyBackfill<S> {
    store: S,
}

impl<S: StateStore> DailyBackfill<S> {
    /// Create a new backfill handler over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Process one energy report observed at `at`, carrying the watt-hours
    /// consumed during the previous calendar day.
    ///
    /// Re-delivery of the same day's report is a benign no-op: the
    /// last-processed-date guard is the sole defense against duplicate
    /// triggers re-adding the same amount.
    ///
    /// # Errors
    ///
    /// Returns an error without mutating any cell for non-finite or negative
    /// values, or when the store cannot be read or written.
    pub async fn handle_report(
        &self,
        watt_hours: f64,
        at: Timestamp,
    ) -> Result<BackfillOutcome, TallyError> {
        let energy = WattHours::new(watt_hours)?;
        let date = previous_day(day_of(at));

        let snapshot = self.store.load().await?;
        if snapshot.last_processed == Some(date) {
            tracing::debug!(%date, "daily report already folded in, skipping");
            return Ok(BackfillOutcome::AlreadyProcessed { date });
        }

        let added_kwh = energy.to_kilowatt_hours();
        let lifetime_kwh = snapshot.lifetime_kwh + added_kwh;
        self.store
            .apply_backfill(BackfillUpdate {
                lifetime_kwh,
                last_processed: date,
            })
            .await?;
        tracing::info!(%date, added_kwh, lifetime_kwh, "daily energy folded into lifetime counter");
        Ok(BackfillOutcome::Applied {
            date,
            added_kwh,
            lifetime_kwh,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Mutex;

    use chrono::{TimeZone, Utc};

    use tally_domain::cycle::CycleMarker;
    use tally_domain::ledger::DurationLedger;

    use crate::ports::{StateSnapshot, TrackerUpdate};

    struct InMemoryStateStore {
        state: Mutex<StateSnapshot>,
    }

    impl InMemoryStateStore {
        fn with(snapshot: StateSnapshot) -> Self {
            Self {
                state: Mutex::new(snapshot),
            }
        }

        fn snapshot(&self) -> StateSnapshot {
            self.state.lock().unwrap().clone()
        }
    }

    impl StateStore for InMemoryStateStore {
        fn load(&self) -> impl Future<Output = Result<StateSnapshot, TallyError>> + Send {
            let snapshot = self.state.lock().unwrap().clone();
            async move { Ok(snapshot) }
        }

        fn apply_tracker(
            &self,
            update: TrackerUpdate,
        ) -> impl Future<Output = Result<(), TallyError>> + Send {
            let mut state = self.state.lock().unwrap();
            state.marker = update.marker;
            state.daily_active_seconds = update.daily_active_seconds;
            state.ledger = update.ledger;
            async { Ok(()) }
        }

        fn apply_backfill(
            &self,
            update: BackfillUpdate,
        ) -> impl Future<Output = Result<(), TallyError>> + Send {
            let mut state = self.state.lock().unwrap();
            state.lifetime_kwh = update.lifetime_kwh;
            state.last_processed = Some(update.last_processed);
            state.daily_active_seconds = 0;
            state.ledger = DurationLedger::default();
            async { Ok(()) }
        }
    }

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn day(y: i32, mo: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap()
    }

    fn accumulated_snapshot() -> StateSnapshot {
        let mut ledger = DurationLedger::default();
        ledger.append(600);
        ledger.append(1200);
        StateSnapshot {
            lifetime_kwh: 10.0,
            marker: CycleMarker::Closed,
            daily_active_seconds: 1800,
            ledger,
            last_processed: None,
        }
    }

    #[tokio::test]
    async fn should_add_report_and_reset_accumulators() {
        let backfill = DailyBackfill::new(InMemoryStateStore::with(accumulated_snapshot()));

        let outcome = backfill
            .handle_report(850.0, ts(2024, 3, 2, 6, 0, 0))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            BackfillOutcome::Applied {
                date: day(2024, 3, 1),
                added_kwh: 0.85,
                lifetime_kwh: 10.85,
            }
        );
        let state = backfill.store.snapshot();
        assert!((state.lifetime_kwh - 10.85).abs() < 1e-9);
        assert_eq!(state.last_processed, Some(day(2024, 3, 1)));
        assert_eq!(state.daily_active_seconds, 0);
        assert!(state.ledger.is_empty());
    }

    #[tokio::test]
    async fn should_skip_duplicate_report_for_same_day() {
        let backfill = DailyBackfill::new(InMemoryStateStore::with(accumulated_snapshot()));
        let at = ts(2024, 3, 2, 6, 0, 0);

        backfill.handle_report(850.0, at).await.unwrap();
        let before = backfill.store.snapshot();

        // Same value, same day — and a different value the same day too.
        for watt_hours in [850.0, 850.0, 900.0] {
            let outcome = backfill.handle_report(watt_hours, at).await.unwrap();
            assert_eq!(
                outcome,
                BackfillOutcome::AlreadyProcessed {
                    date: day(2024, 3, 1)
                }
            );
        }

        assert_eq!(backfill.store.snapshot(), before);
    }

    #[tokio::test]
    async fn should_process_next_day_report_after_guard_moved_on() {
        let backfill = DailyBackfill::new(InMemoryStateStore::with(StateSnapshot::default()));

        backfill
            .handle_report(850.0, ts(2024, 3, 2, 6, 0, 0))
            .await
            .unwrap();
        let outcome = backfill
            .handle_report(500.0, ts(2024, 3, 3, 6, 0, 0))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            BackfillOutcome::Applied {
                date: day(2024, 3, 2),
                added_kwh: 0.5,
                lifetime_kwh: 1.35,
            }
        );
    }

    #[tokio::test]
    async fn should_reject_negative_report_without_mutating_state() {
        let backfill = DailyBackfill::new(InMemoryStateStore::with(accumulated_snapshot()));

        let result = backfill.handle_report(-5.0, ts(2024, 3, 2, 6, 0, 0)).await;

        assert!(matches!(result, Err(TallyError::Validation(_))));
        assert_eq!(backfill.store.snapshot(), accumulated_snapshot());
    }

    #[tokio::test]
    async fn should_reject_non_finite_report() {
        let backfill = DailyBackfill::new(InMemoryStateStore::with(StateSnapshot::default()));

        for bad in [f64::NAN, f64::INFINITY] {
            let result = backfill.handle_report(bad, ts(2024, 3, 2, 6, 0, 0)).await;
            assert!(matches!(result, Err(TallyError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn should_never_decrease_lifetime_counter() {
        let backfill = DailyBackfill::new(InMemoryStateStore::with(StateSnapshot::default()));
        let mut previous = 0.0;

        let reports = [
            (850.0, ts(2024, 3, 2, 6, 0, 0)),
            (0.0, ts(2024, 3, 3, 6, 0, 0)),
            (1200.0, ts(2024, 3, 4, 6, 0, 0)),
        ];
        for (watt_hours, at) in reports {
            backfill.handle_report(watt_hours, at).await.unwrap();
            let lifetime = backfill.store.snapshot().lifetime_kwh;
            assert!(lifetime >= previous);
            previous = lifetime;
        }
    }

    #[tokio::test]
    async fn should_add_to_operator_adjusted_lifetime_total() {
        // An operator bumped the counter between events; the report is added
        // on top, not written over it.
        let snapshot = StateSnapshot {
            lifetime_kwh: 500.0,
            ..StateSnapshot::default()
        };
        let backfill = DailyBackfill::new(InMemoryStateStore::with(snapshot));

        backfill
            .handle_report(850.0, ts(2024, 3, 2, 6, 0, 0))
            .await
            .unwrap();

        assert!((backfill.store.snapshot().lifetime_kwh - 500.85).abs() < 1e-9);
    }
}
