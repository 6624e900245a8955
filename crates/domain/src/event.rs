//! Events — the two inputs the engine reacts to.
//!
//! Events carry their own timestamp so processing is pure with respect to
//! the wall clock; the host (or a test) decides what "now" is.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// A unique identifier for a [`DeviceEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(uuid::Uuid);

impl Default for EventId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl EventId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(self) -> uuid::Uuid {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

/// Something observed about the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceEventKind {
    /// The status sensor changed to a new raw value.
    StatusChanged { status: String },
    /// The daily energy report arrived: total watt-hours consumed during the
    /// previous calendar day.
    EnergyReported { watt_hours: f64 },
}

/// A single observation, stamped with the instant it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceEvent {
    pub id: EventId,
    #[serde(flatten)]
    pub kind: DeviceEventKind,
    pub at: Timestamp,
}

impl DeviceEvent {
    /// Create a status-change event.
    pub fn status_changed(status: impl Into<String>, at: Timestamp) -> Self {
        Self {
            id: EventId::new(),
            kind: DeviceEventKind::StatusChanged {
                status: status.into(),
            },
            at,
        }
    }

    /// Create a daily energy-report event.
    #[must_use]
    pub fn energy_reported(watt_hours: f64, at: Timestamp) -> Self {
        Self {
            id: EventId::new(),
            kind: DeviceEventKind::EnergyReported { watt_hours },
            at,
        }
    }
}
