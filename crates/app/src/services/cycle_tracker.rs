//! Cycle tracker — turns status transitions into day-attributed active time.

use tally_domain::cycle::{ClosedCycle, CycleMarker, Transition, transition};
use tally_domain::error::TallyError;
use tally_domain::status::StatusClassifier;
use tally_domain::time::Timestamp;

use crate::ports::{StateStore, TrackerUpdate};

/// What a single status event did to the cycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerOutcome {
    /// A cycle was opened at the event time.
    Opened { at: Timestamp },
    /// The open cycle was closed and its segments recorded.
    Closed(ClosedCycle),
    /// The event did not change anything (noisy or spurious transition).
    Ignored,
}

/// Handler for status-change events.
///
/// Owns exactly three cells: the cycle marker, the daily accumulator, and
/// the duration ledger. Every mutation keeps the accumulator equal to the
/// sum of the ledger.
pub struct CycleTracker<S> {
    store: S,
    classifier: StatusClassifier,
}

impl<S: StateStore> CycleTracker<S> {
    /// Create a new tracker over the given store and status classifier.
    pub fn new(store: S, classifier: StatusClassifier) -> Self {
        Self { store, classifier }
    }

    /// Process one status-change event observed at `at`.
    ///
    /// Closing a cycle that crossed midnight appends one segment per day
    /// touched to the current ledger; segments belonging to a day whose
    /// report was already folded in stay there until the next daily reset
    /// and never feed the lifetime counter, which comes solely from the
    /// device's own report.
    ///
    /// # Errors
    ///
    /// Returns an error without mutating any cell when the snapshot cannot
    /// be read or the event is invalid. A failed event never blocks later
    /// ones.
    pub async fn handle_status(
        &self,
        raw_status: &str,
        at: Timestamp,
    ) -> Result<TrackerOutcome, TallyError> {
        let activity = self.classifier.classify(raw_status);
        let snapshot = self.store.load().await?;

        match transition(snapshot.marker, activity, at)? {
            Transition::Ignore => Ok(TrackerOutcome::Ignored),
            Transition::Open { at } => {
                self.store
                    .apply_tracker(TrackerUpdate {
                        marker: CycleMarker::Open(at),
                        daily_active_seconds: snapshot.daily_active_seconds,
                        ledger: snapshot.ledger,
                    })
                    .await?;
                tracing::debug!(%at, "cycle opened");
                Ok(TrackerOutcome::Opened { at })
            }
            Transition::Close(closed) => {
                let mut ledger = snapshot.ledger;
                let mut daily_active_seconds = snapshot.daily_active_seconds;
                for segment in &closed.segments {
                    ledger.append(segment.seconds);
                    daily_active_seconds += segment.seconds;
                }
                self.store
                    .apply_tracker(TrackerUpdate {
                        marker: CycleMarker::Closed,
                        daily_active_seconds,
                        ledger,
                    })
                    .await?;
                tracing::debug!(
                    total_seconds = closed.total_seconds(),
                    segments = closed.segments.len(),
                    "cycle closed"
                );
                Ok(TrackerOutcome::Closed(closed))
            }
        }
    }
}
