//! Home Assistant adapter configuration.

use serde::Deserialize;

/// Connection settings for the Home Assistant REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct HaConfig {
    /// Base URL, e.g. `http://homeassistant.local:8123`.
    pub base_url: String,
    /// Long-lived access token.
    pub token: String,
    /// Seconds between sensor polls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Entities this adapter reads and writes.
    #[serde(default)]
    pub bindings: EntityBindings,
}

fn default_poll_interval_secs() -> u64 {
    5
}

/// The sensor and helper entities backing the five cells and the two inputs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EntityBindings {
    /// Sensor reporting the device's raw status.
    pub status_sensor: String,
    /// Sensor reporting yesterday's consumption in watt-hours.
    pub energy_sensor: String,
    /// `input_number` holding the lifetime kWh counter.
    pub lifetime_helper: String,
    /// `input_datetime` holding the cycle start marker.
    pub cycle_start_helper: String,
    /// `input_number` holding the daily active seconds.
    pub daily_active_helper: String,
    /// `input_text` holding the JSON duration ledger.
    pub durations_helper: String,
    /// `input_text` holding the last processed date.
    pub last_processed_helper: String,
}

impl Default for EntityBindings {
    fn default() -> Self {
        Self {
            status_sensor: "sensor.dishwasher_status".to_string(),
            energy_sensor: "sensor.dishwasher_energy_yesterday".to_string(),
            lifetime_helper: "input_number.dishwasher_lifetime_energy".to_string(),
            cycle_start_helper: "input_datetime.dishwasher_cycle_start".to_string(),
            daily_active_helper: "input_number.dishwasher_daily_active_seconds".to_string(),
            durations_helper: "input_text.dishwasher_cycle_durations".to_string(),
            last_processed_helper: "input_text.dishwasher_last_processed_date".to_string(),
        }
    }
}
