//! Event injection endpoints.

use axum::Json;
use axum::extract::State;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tally_app::ports::StateStore;
use tally_app::services::cycle_tracker::TrackerOutcome;
use tally_app::services::daily_backfill::BackfillOutcome;
use tally_domain::cycle::DaySegment;
use tally_domain::time::{Timestamp, now};

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /api/events/status` request body.
#[derive(Debug, Deserialize)]
pub struct StatusEventBody {
    /// Raw status string as the sensor reports it.
    pub status: String,
    /// Event time; defaults to the server clock.
    pub at: Option<Timestamp>,
}

/// `POST /api/events/status` response body.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StatusEventResponse {
    Opened {
        at: Timestamp,
    },
    Closed {
        started_at: Timestamp,
        ended_at: Timestamp,
        total_seconds: i64,
        segments: Vec<DaySegment>,
    },
    Ignored,
}

/// `POST /api/events/status` — feed one status change through the engine.
pub async fn post_status<S>(
    State(state): State<AppState<S>>,
    Json(body): Json<StatusEventBody>,
) -> Result<Json<StatusEventResponse>, ApiError>
where
    S: StateStore + Clone + Send + Sync + 'static,
{
    let at = body.at.unwrap_or_else(now);
    let outcome = state.engine.process_status(&body.status, at).await?;

    let response = match outcome {
        TrackerOutcome::Opened { at } => StatusEventResponse::Opened { at },
        TrackerOutcome::Closed(closed) => StatusEventResponse::Closed {
            started_at: closed.started_at,
            ended_at: closed.ended_at,
            total_seconds: closed.total_seconds(),
            segments: closed.segments,
        },
        TrackerOutcome::Ignored => StatusEventResponse::Ignored,
    };
    Ok(Json(response))
}

/// `POST /api/events/energy` request body.
#[derive(Debug, Deserialize)]
pub struct EnergyEventBody {
    /// Watt-hours consumed during the previous calendar day.
    pub watt_hours: f64,
    /// Event time; defaults to the server clock.
    pub at: Option<Timestamp>,
}

/// `POST /api/events/energy` response body.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EnergyEventResponse {
    Applied {
        date: NaiveDate,
        added_kwh: f64,
        lifetime_kwh: f64,
    },
    AlreadyProcessed {
        date: NaiveDate,
    },
}

/// `POST /api/events/energy` — feed one daily report through the engine.
pub async fn post_energy<S>(
    State(state): State<AppState<S>>,
    Json(body): Json<EnergyEventBody>,
) -> Result<Json<EnergyEventResponse>, ApiError>
where
    S: StateStore + Clone + Send + Sync + 'static,
{
    let at = body.at.unwrap_or_else(now);
    let outcome = state.engine.process_report(body.watt_hours, at).await?;

    let response = match outcome {
        BackfillOutcome::Applied {
            date,
            added_kwh,
            lifetime_kwh,
        } => EnergyEventResponse::Applied {
            date,
            added_kwh,
            lifetime_kwh,
        },
        BackfillOutcome::AlreadyProcessed { date } => {
            EnergyEventResponse::AlreadyProcessed { date }
        }
    };
    Ok(Json(response))
}
