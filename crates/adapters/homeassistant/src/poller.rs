//! Sensor poller — turns observed sensor changes into engine events.

use std::sync::Arc;

use tally_app::engine::TallyEngine;
use tally_app::ports::{EventPublisher, StateStore};
use tally_domain::event::DeviceEvent;
use tally_domain::time::now;

use crate::client::HaClient;
use crate::config::HaConfig;
use crate::error::HaError;

/// Polls the status and daily-energy sensors and feeds every observed
/// change into the engine.
///
/// The first observation of each sensor only records a baseline; events are
/// emitted on changes after that, mirroring a state-change trigger. A failed
/// poll or a rejected event is logged and the next tick proceeds normally.
pub struct HaPoller<S, P> {
    client: HaClient,
    engine: Arc<TallyEngine<S, P>>,
    config: HaConfig,
}

/// Record `current` and report whether it differs from the previous
/// observation. The very first observation is not a change.
fn observe(previous: &mut Option<String>, current: &str) -> bool {
    let changed = previous.as_deref().is_some_and(|prev| prev != current);
    let first = previous.is_none();
    if changed || first {
        *previous = Some(current.to_string());
    }
    changed
}

impl<S, P> HaPoller<S, P>
where
    S: StateStore + Clone + Send + Sync,
    P: EventPublisher + Send + Sync,
{
    /// Create a poller over the given client, engine, and configuration.
    #[must_use]
    pub fn new(client: HaClient, engine: Arc<TallyEngine<S, P>>, config: HaConfig) -> Self {
        Self {
            client,
            engine,
            config,
        }
    }

    /// Poll until the task is dropped.
    pub async fn run(self) {
        let period = std::time::Duration::from_secs(self.config.poll_interval_secs.max(1));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let mut last_status: Option<String> = None;
        let mut last_energy: Option<String> = None;

        loop {
            interval.tick().await;
            if let Err(error) = self.tick(&mut last_status, &mut last_energy).await {
                tracing::warn!(%error, "poll tick failed");
            }
        }
    }

    async fn tick(
        &self,
        last_status: &mut Option<String>,
        last_energy: &mut Option<String>,
    ) -> Result<(), HaError> {
        let status = self
            .client
            .get_state(&self.config.bindings.status_sensor)
            .await?;
        if observe(last_status, &status) {
            self.process(DeviceEvent::status_changed(status, now())).await;
        }

        let energy = self
            .client
            .get_state(&self.config.bindings.energy_sensor)
            .await?;
        if observe(last_energy, &energy) {
            match energy.trim().parse::<f64>() {
                Ok(watt_hours) => {
                    self.process(DeviceEvent::energy_reported(watt_hours, now()))
                        .await;
                }
                Err(_) => {
                    tracing::debug!(state = %energy, "energy sensor state is not numeric, skipping");
                }
            }
        }

        Ok(())
    }

    async fn process(&self, event: DeviceEvent) {
        if let Err(error) = self.engine.process_event(event).await {
            tracing::warn!(%error, "event rejected");
        }
    }
}
