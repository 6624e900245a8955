//! # tally-adapter-http-axum
//!
//! HTTP adapter using [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the REST API (`/api`) for injecting events and reading state
//! - Stream processed events over SSE
//! - Map domain errors to HTTP status codes
//!
//! ## Dependency rule
//! Depends on `tally-app` (for the engine and ports) and `tally-domain`.
//! The `app` and `domain` crates must never reference this adapter.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

pub use router::build;
pub use state::AppState;
