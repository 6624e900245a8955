//! Read-only views over the persisted cells.

use axum::Json;
use axum::extract::State;
use chrono::NaiveDate;
use serde::Serialize;

use tally_app::ports::{StateSnapshot, StateStore};
use tally_domain::cycle::CycleMarker;
use tally_domain::time::Timestamp;

use crate::error::ApiError;
use crate::state::AppState;

/// JSON view of the full state.
#[derive(Debug, Serialize)]
pub struct StateView {
    pub lifetime_kwh: f64,
    /// Start of the open cycle, absent when no cycle is open.
    pub cycle_start: Option<Timestamp>,
    pub daily_active_seconds: i64,
    pub cycle_durations: Vec<i64>,
    pub last_processed_date: Option<NaiveDate>,
}

impl From<StateSnapshot> for StateView {
    fn from(snapshot: StateSnapshot) -> Self {
        Self {
            lifetime_kwh: snapshot.lifetime_kwh,
            cycle_start: match snapshot.marker {
                CycleMarker::Closed => None,
                CycleMarker::Open(at) => Some(at),
            },
            daily_active_seconds: snapshot.daily_active_seconds,
            cycle_durations: snapshot.ledger.entries().to_vec(),
            last_processed_date: snapshot.last_processed,
        }
    }
}

/// `GET /api/state` — all five cells, decoded.
pub async fn get_state<S>(State(state): State<AppState<S>>) -> Result<Json<StateView>, ApiError>
where
    S: StateStore + Clone + Send + Sync + 'static,
{
    let snapshot = state.store.load().await?;
    Ok(Json(snapshot.into()))
}

/// JSON view of the lifetime counter alone.
#[derive(Debug, Serialize)]
pub struct LifetimeView {
    pub lifetime_kwh: f64,
}

/// `GET /api/lifetime` — the lifetime energy counter.
pub async fn get_lifetime<S>(
    State(state): State<AppState<S>>,
) -> Result<Json<LifetimeView>, ApiError>
where
    S: StateStore + Clone + Send + Sync + 'static,
{
    let snapshot = state.store.load().await?;
    Ok(Json(LifetimeView {
        lifetime_kwh: snapshot.lifetime_kwh,
    }))
}
