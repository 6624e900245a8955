//! # tally-domain
//!
//! Pure domain model for tally, a reconciler for devices that report their
//! energy consumption once per day, in arrears.
//!
//! ## Responsibilities
//! - Foundational types: timestamps, calendar math, error conventions
//! - Classify raw device status strings into **active** / **inactive**
//! - Model **cycles** (contiguous active spans) and split them at midnight
//!   so every second is attributed to the correct calendar day
//! - Define the **duration ledger** and **energy units** (Wh / kWh)
//! - Define the textual formats of the five persisted cells
//! - Define **events** (status changes, daily energy reports)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod cells;
pub mod cycle;
pub mod energy;
pub mod error;
pub mod event;
pub mod ledger;
pub mod status;
pub mod time;
