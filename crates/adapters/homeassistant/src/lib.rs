//! # tally-adapter-homeassistant
//!
//! Home Assistant adapter over its REST API.
//!
//! ## Responsibilities
//! - Talk to the Home Assistant REST API (states and service calls)
//! - Implement the `StateStore` port on top of helper entities
//!   (`input_number`, `input_text`, `input_datetime`)
//! - Poll the device's status and daily-energy sensors and feed changes
//!   into the engine as events
//!
//! ## Dependency rule
//! Depends on `tally-app` (for ports and the engine) and `tally-domain`.
//! The `app` and `domain` crates must never reference this adapter.

pub mod client;
pub mod config;
pub mod error;
pub mod poller;
pub mod store;

pub use client::HaClient;
pub use config::{EntityBindings, HaConfig};
pub use error::HaError;
pub use poller::HaPoller;
pub use store::HaHelperStore;
