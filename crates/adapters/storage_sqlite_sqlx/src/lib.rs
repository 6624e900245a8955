//! # tally-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `StateStore` port defined in `tally-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between the persisted text cells and domain types
//!
//! ## Dependency rule
//! Depends on `tally-app` (for the port trait) and `tally-domain` (for cell
//! formats). The `app` and `domain` crates must never reference this adapter.

pub mod cell_store;
pub mod error;
pub mod pool;

pub use cell_store::SqliteCellStore;
pub use pool::{Config, Database};
