//! Event engine — routes device events to their handler, one at a time.

use tally_domain::error::TallyError;
use tally_domain::event::{DeviceEvent, DeviceEventKind};
use tally_domain::status::StatusClassifier;
use tally_domain::time::Timestamp;

use crate::ports::{EventPublisher, StateStore};
use crate::services::cycle_tracker::{CycleTracker, TrackerOutcome};
use crate::services::daily_backfill::{BackfillOutcome, DailyBackfill};

/// What processing a single event did.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutcome {
    Tracker(TrackerOutcome),
    Backfill(BackfillOutcome),
}

/// Routes device events to the cycle tracker or the daily backfill.
///
/// An internal gate serializes processing so at most one event is in flight
/// at a time; both handlers read a snapshot and write back, and interleaving
/// two runs could lose one of the writes. Successfully processed events are
/// republished to observers.
pub struct TallyEngine<S, P> {
    tracker: CycleTracker<S>,
    backfill: DailyBackfill<S>,
    publisher: P,
    gate: tokio::sync::Mutex<()>,
}

impl<S, P> TallyEngine<S, P>
where
    S: StateStore + Clone,
    P: EventPublisher,
{
    /// Build an engine over a shared store, a status classifier, and a
    /// publisher for processed events.
    pub fn new(store: S, classifier: StatusClassifier, publisher: P) -> Self {
        Self {
            tracker: CycleTracker::new(store.clone(), classifier),
            backfill: DailyBackfill::new(store),
            publisher,
            gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Process one event to completion and republish it to observers.
    ///
    /// # Errors
    ///
    /// Returns the handler's error; the event is not republished and the
    /// engine stays usable for the next event.
    pub async fn process_event(&self, event: DeviceEvent) -> Result<EngineOutcome, TallyError> {
        let _guard = self.gate.lock().await;

        let outcome = match &event.kind {
            DeviceEventKind::StatusChanged { status } => self
                .tracker
                .handle_status(status, event.at)
                .await
                .map(EngineOutcome::Tracker)?,
            DeviceEventKind::EnergyReported { watt_hours } => self
                .backfill
                .handle_report(*watt_hours, event.at)
                .await
                .map(EngineOutcome::Backfill)?,
        };

        self.republish(event).await;
        Ok(outcome)
    }

    /// Process one status change and republish it to observers.
    ///
    /// Same semantics as [`Self::process_event`] with a `StatusChanged`
    /// event, but the outcome keeps the tracker's type.
    ///
    /// # Errors
    ///
    /// Returns the tracker's error; nothing is republished.
    pub async fn process_status(
        &self,
        status: &str,
        at: Timestamp,
    ) -> Result<TrackerOutcome, TallyError> {
        let _guard = self.gate.lock().await;

        let outcome = self.tracker.handle_status(status, at).await?;
        self.republish(DeviceEvent::status_changed(status, at)).await;
        Ok(outcome)
    }

    /// Process one daily energy report and republish it to observers.
    ///
    /// Same semantics as [`Self::process_event`] with an `EnergyReported`
    /// event, but the outcome keeps the backfill's type.
    ///
    /// # Errors
    ///
    /// Returns the backfill's error; nothing is republished.
    pub async fn process_report(
        &self,
        watt_hours: f64,
        at: Timestamp,
    ) -> Result<BackfillOutcome, TallyError> {
        let _guard = self.gate.lock().await;

        let outcome = self.backfill.handle_report(watt_hours, at).await?;
        self.republish(DeviceEvent::energy_reported(watt_hours, at))
            .await;
        Ok(outcome)
    }

    // Observation only; a full bus must not fail the already-applied event.
    async fn republish(&self, event: DeviceEvent) {
        if let Err(error) = self.publisher.publish(event).await {
            tracing::warn!(%error, "unable to republish processed event");
        }
    }
}
