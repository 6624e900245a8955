//! Helper-entity implementation of the [`StateStore`] port.
//!
//! The five cells live in Home Assistant helpers, written one service call
//! at a time; there is no transaction. Write order is chosen so a failure
//! mid-update can never double-count energy: the last-processed-date guard
//! lands before the lifetime counter, and a retry after a partial failure
//! skips the day instead of adding it twice.

use tally_app::ports::{BackfillUpdate, StateSnapshot, StateStore, TrackerUpdate};
use tally_domain::cells;
use tally_domain::cycle::CycleMarker;
use tally_domain::error::TallyError;
use tally_domain::ledger::DurationLedger;

use crate::client::HaClient;
use crate::config::EntityBindings;
use crate::error::HaError;

/// Store backed by `input_number`, `input_text`, and `input_datetime`
/// helpers.
#[derive(Clone)]
pub struct HaHelperStore {
    client: HaClient,
    bindings: EntityBindings,
}

impl HaHelperStore {
    /// Create a store over the given client and entity bindings.
    #[must_use]
    pub fn new(client: HaClient, bindings: EntityBindings) -> Self {
        Self { client, bindings }
    }

    async fn read(&self, entity_id: &str) -> Result<String, HaError> {
        self.client.get_state(entity_id).await
    }
}

impl StateStore for HaHelperStore {
    async fn load(&self) -> Result<StateSnapshot, TallyError> {
        let lifetime_kwh =
            cells::parse_decimal(&self.read(&self.bindings.lifetime_helper).await?)?;
        let marker = CycleMarker::from_stored(cells::parse_timestamp(
            &self.read(&self.bindings.cycle_start_helper).await?,
        )?);
        let daily_active_seconds =
            cells::parse_seconds(&self.read(&self.bindings.daily_active_helper).await?)?;
        let ledger = DurationLedger::parse(&self.read(&self.bindings.durations_helper).await?)?;
        let last_processed =
            cells::parse_date(&self.read(&self.bindings.last_processed_helper).await?)?;

        Ok(StateSnapshot {
            lifetime_kwh,
            marker,
            daily_active_seconds,
            ledger,
            last_processed,
        })
    }

    async fn apply_tracker(&self, update: TrackerUpdate) -> Result<(), TallyError> {
        self.client
            .set_input_datetime(&self.bindings.cycle_start_helper, update.marker.to_stored())
            .await?;
        self.client
            .set_input_number(
                &self.bindings.daily_active_helper,
                update.daily_active_seconds as f64,
            )
            .await?;
        self.client
            .set_input_text(&self.bindings.durations_helper, &update.ledger.render())
            .await?;
        Ok(())
    }

    async fn apply_backfill(&self, update: BackfillUpdate) -> Result<(), TallyError> {
        // Guard first: if the lifetime write below fails, the retry is
        // skipped as already-processed rather than applied twice. Losing a
        // day is recoverable by hand; double-counting is silent.
        self.client
            .set_input_text(
                &self.bindings.last_processed_helper,
                &cells::render_date(Some(update.last_processed)),
            )
            .await?;
        self.client
            .set_input_number(&self.bindings.lifetime_helper, update.lifetime_kwh)
            .await?;
        self.client
            .set_input_number(&self.bindings.daily_active_helper, 0.0)
            .await?;
        self.client
            .set_input_text(
                &self.bindings.durations_helper,
                &DurationLedger::default().render(),
            )
            .await?;
        Ok(())
    }
}
