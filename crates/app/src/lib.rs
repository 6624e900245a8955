//! # tally-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `StateStore` — snapshot reads and atomic writes of the five persisted cells
//!   - `EventPublisher` — fire-and-forget delivery of processed events to observers
//! - Define **driving/inbound ports** as use-case structs:
//!   - `CycleTracker` — open/close cycles, split at midnight, keep the ledger in sync
//!   - `DailyBackfill` — fold the delayed daily report into the lifetime counter once
//!   - `TallyEngine` — route events to the right handler, one event in flight at a time
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `tally-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod engine;
pub mod event_bus;
pub mod ports;
pub mod services;
