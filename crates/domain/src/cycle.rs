//! Cycle lifecycle — opening, closing, and splitting at midnight.
//!
//! A cycle is a contiguous span during which a device's status is classified
//! active. Closing a cycle yields one [`DaySegment`] per calendar day the
//! cycle touched, so active time is always attributed to the day it actually
//! happened on.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::error::ValidationError;
use crate::status::Activity;
use crate::time::{Timestamp, day_of, midnight_after};

/// Whether a cycle is currently open, and since when.
///
/// Persisted as a plain timestamp: the Unix epoch is the sentinel for
/// `Closed`, so the stored value is always a well-typed timestamp. The
/// sentinel never leaks past [`CycleMarker::from_stored`] /
/// [`CycleMarker::to_stored`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleMarker {
    /// No cycle is open.
    Closed,
    /// A cycle opened at the given instant.
    Open(Timestamp),
}

impl CycleMarker {
    /// Decode the persisted timestamp, mapping the epoch sentinel to `Closed`.
    #[must_use]
    pub fn from_stored(ts: Timestamp) -> Self {
        if ts == DateTime::<Utc>::UNIX_EPOCH {
            Self::Closed
        } else {
            Self::Open(ts)
        }
    }

    /// Encode for persistence, mapping `Closed` to the epoch sentinel.
    #[must_use]
    pub fn to_stored(self) -> Timestamp {
        match self {
            Self::Closed => DateTime::<Utc>::UNIX_EPOCH,
            Self::Open(ts) => ts,
        }
    }

    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open(_))
    }
}

/// Active seconds attributed to a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaySegment {
    pub day: NaiveDate,
    pub seconds: i64,
}

/// The result of closing an open cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedCycle {
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    /// One segment per calendar day touched, in chronological order.
    pub segments: Vec<DaySegment>,
}

impl ClosedCycle {
    /// Total elapsed seconds; always equals the sum of the segments.
    #[must_use]
    pub fn total_seconds(&self) -> i64 {
        self.segments.iter().map(|segment| segment.seconds).sum()
    }
}

/// What the tracker should do in response to a classified status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Open a cycle at the event time.
    Open { at: Timestamp },
    /// Close the open cycle, recording its day segments.
    Close(ClosedCycle),
    /// Nothing to do: the event does not change the cycle state.
    Ignore,
}

/// Decide the transition for a status event given the current marker.
///
/// Repeated active states while a cycle is open do not open a second cycle,
/// and an inactive state with no open cycle is a benign no-op; spurious
/// sensor transitions are expected.
///
/// # Errors
///
/// Returns [`ValidationError::CycleEndsBeforeStart`] if a close would end
/// before the recorded start.
pub fn transition(
    marker: CycleMarker,
    activity: Activity,
    at: Timestamp,
) -> Result<Transition, ValidationError> {
    match (marker, activity) {
        (CycleMarker::Closed, Activity::Active) => Ok(Transition::Open { at }),
        (CycleMarker::Open(_), Activity::Active) | (CycleMarker::Closed, Activity::Inactive) => {
            Ok(Transition::Ignore)
        }
        (CycleMarker::Open(started_at), Activity::Inactive) => {
            close_cycle(started_at, at).map(Transition::Close)
        }
    }
}

/// Close a cycle, splitting it into one segment per calendar day touched.
///
/// A cycle contained in a single day yields one segment. A cycle crossing
/// midnight yields one segment per day, cut exactly at each day boundary, so
/// the segment seconds always sum to the total elapsed seconds.
///
/// # Errors
///
/// Returns [`ValidationError::CycleEndsBeforeStart`] when `ended_at` precedes
/// `started_at`.
pub fn close_cycle(
    started_at: Timestamp,
    ended_at: Timestamp,
) -> Result<ClosedCycle, ValidationError> {
    if ended_at < started_at {
        return Err(ValidationError::CycleEndsBeforeStart {
            started_at,
            ended_at,
        });
    }

    let mut segments = Vec::new();
    let mut cursor = started_at;
    while day_of(cursor) < day_of(ended_at) {
        let boundary = midnight_after(cursor);
        segments.push(DaySegment {
            day: day_of(cursor),
            seconds: (boundary - cursor).num_seconds(),
        });
        cursor = boundary;
    }
    segments.push(DaySegment {
        day: day_of(cursor),
        seconds: (ended_at - cursor).num_seconds(),
    });

    Ok(ClosedCycle {
        started_at,
        ended_at,
        segments,
    })
}
