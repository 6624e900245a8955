//! State store port — snapshot reads and atomic writes of the persisted cells.
//!
//! The two handlers never call each other; the store is their only coupling.
//! Each handler owns a disjoint write set, captured by a dedicated update
//! type, and every write applies its whole set atomically so a failure can
//! never leave the accumulator out of sync with the ledger.

use std::future::Future;

use chrono::NaiveDate;

use tally_domain::cycle::CycleMarker;
use tally_domain::error::TallyError;
use tally_domain::ledger::DurationLedger;

/// Decoded contents of the five persisted cells.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    /// Lifetime energy counter, in kWh. Non-decreasing over its history.
    pub lifetime_kwh: f64,
    /// Whether a cycle is open, and since when.
    pub marker: CycleMarker,
    /// Active seconds accumulated for the current day.
    pub daily_active_seconds: i64,
    /// Completed cycle durations for the current day.
    pub ledger: DurationLedger,
    /// Most recent date whose report was folded into the lifetime counter.
    pub last_processed: Option<NaiveDate>,
}

impl Default for StateSnapshot {
    /// The state of a freshly initialized store: everything zeroed, no open
    /// cycle, no report processed yet.
    fn default() -> Self {
        Self {
            lifetime_kwh: 0.0,
            marker: CycleMarker::Closed,
            daily_active_seconds: 0,
            ledger: DurationLedger::default(),
            last_processed: None,
        }
    }
}

/// Atomic write of the three tracker-owned cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerUpdate {
    pub marker: CycleMarker,
    pub daily_active_seconds: i64,
    pub ledger: DurationLedger,
}

/// Atomic write of the backfill-owned cells.
///
/// Applying this also resets the daily accumulator to zero and the ledger to
/// empty: the backfill starts the new day's accounting in the same write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackfillUpdate {
    /// New lifetime total (previous total plus the day's kWh).
    pub lifetime_kwh: f64,
    /// The date whose report has now been folded in.
    pub last_processed: NaiveDate,
}

/// Read/write capability over the five persisted cells.
pub trait StateStore {
    /// Read a consistent snapshot of all cells.
    fn load(&self) -> impl Future<Output = Result<StateSnapshot, TallyError>> + Send;

    /// Write the tracker's cells. All three or none.
    fn apply_tracker(
        &self,
        update: TrackerUpdate,
    ) -> impl Future<Output = Result<(), TallyError>> + Send;

    /// Write the backfill's cells and reset the daily accumulators.
    fn apply_backfill(
        &self,
        update: BackfillUpdate,
    ) -> impl Future<Output = Result<(), TallyError>> + Send;
}

impl<T: StateStore + Send + Sync> StateStore for std::sync::Arc<T> {
    fn load(&self) -> impl Future<Output = Result<StateSnapshot, TallyError>> + Send {
        (**self).load()
    }

    fn apply_tracker(
        &self,
        update: TrackerUpdate,
    ) -> impl Future<Output = Result<(), TallyError>> + Send {
        (**self).apply_tracker(update)
    }

    fn apply_backfill(
        &self,
        update: BackfillUpdate,
    ) -> impl Future<Output = Result<(), TallyError>> + Send {
        (**self).apply_backfill(update)
    }
}
