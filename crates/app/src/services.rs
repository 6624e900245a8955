//! Application services — the two event handlers.

pub mod cycle_tracker;
pub mod daily_backfill;
