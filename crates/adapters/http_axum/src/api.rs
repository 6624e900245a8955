//! REST API route handlers.

use axum::Router;
use axum::routing::{get, post};

use tally_app::ports::StateStore;

use crate::state::AppState;

pub mod events;
pub mod snapshot;
pub mod sse;

/// Build the `/api` sub-router.
pub fn routes<S>() -> Router<AppState<S>>
where
    S: StateStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/state", get(snapshot::get_state))
        .route("/lifetime", get(snapshot::get_lifetime))
        .route("/events/status", post(events::post_status))
        .route("/events/energy", post(events::post_energy))
        .route("/events/stream", get(sse::stream))
}
