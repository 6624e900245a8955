//! `SQLite` implementation of the [`StateStore`] port.
//!
//! Each cell is one row of the `cells` table. Reads pull all five rows in one
//! query; each write set goes through a single transaction so a handler's
//! cells change together or not at all.

use std::collections::HashMap;

use sqlx::SqlitePool;

use tally_app::ports::{BackfillUpdate, StateSnapshot, StateStore, TrackerUpdate};
use tally_domain::cells;
use tally_domain::cycle::CycleMarker;
use tally_domain::error::TallyError;
use tally_domain::ledger::DurationLedger;

use crate::error::StorageError;

const SELECT_ALL: &str = "SELECT name, value FROM cells";
const UPDATE_CELL: &str = "UPDATE cells SET value = ? WHERE name = ?";

/// `SQLite`-backed store for the five persisted cells.
#[derive(Clone)]
pub struct SqliteCellStore {
    pool: SqlitePool,
}

impl SqliteCellStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn cell<'a>(rows: &'a HashMap<String, String>, name: &str) -> Result<&'a str, StorageError> {
    rows.get(name)
        .map(String::as_str)
        .ok_or_else(|| StorageError::MissingCell(name.to_string()))
}

impl StateStore for SqliteCellStore {
    async fn load(&self) -> Result<StateSnapshot, TallyError> {
        let rows: Vec<(String, String)> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let rows: HashMap<String, String> = rows.into_iter().collect();

        let lifetime_kwh = cells::parse_decimal(cell(&rows, cells::LIFETIME_ENERGY_KWH)?)?;
        let marker = CycleMarker::from_stored(cells::parse_timestamp(cell(
            &rows,
            cells::CYCLE_START,
        )?)?);
        let daily_active_seconds =
            cells::parse_seconds(cell(&rows, cells::DAILY_ACTIVE_SECONDS)?)?;
        let ledger = DurationLedger::parse(cell(&rows, cells::CYCLE_DURATIONS)?)?;
        let last_processed = cells::parse_date(cell(&rows, cells::LAST_PROCESSED_DATE)?)?;

        Ok(StateSnapshot {
            lifetime_kwh,
            marker,
            daily_active_seconds,
            ledger,
            last_processed,
        })
    }

    async fn apply_tracker(&self, update: TrackerUpdate) -> Result<(), TallyError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        let writes = [
            (
                cells::CYCLE_START,
                cells::render_timestamp(update.marker.to_stored()),
            ),
            (
                cells::DAILY_ACTIVE_SECONDS,
                cells::render_seconds(update.daily_active_seconds),
            ),
            (cells::CYCLE_DURATIONS, update.ledger.render()),
        ];
        for (name, value) in writes {
            sqlx::query(UPDATE_CELL)
                .bind(value)
                .bind(name)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
        }

        tx.commit().await.map_err(StorageError::from)?;
        Ok(())
    }

    async fn apply_backfill(&self, update: BackfillUpdate) -> Result<(), TallyError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        let writes = [
            (
                cells::LIFETIME_ENERGY_KWH,
                cells::render_decimal(update.lifetime_kwh),
            ),
            (
                cells::LAST_PROCESSED_DATE,
                cells::render_date(Some(update.last_processed)),
            ),
            (cells::DAILY_ACTIVE_SECONDS, cells::render_seconds(0)),
            (cells::CYCLE_DURATIONS, DurationLedger::default().render()),
        ];
        for (name, value) in writes {
            sqlx::query(UPDATE_CELL)
                .bind(value)
                .bind(name)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
        }

        tx.commit().await.map_err(StorageError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::pool::Config;

    async fn make_store() -> SqliteCellStore {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteCellStore::new(db.pool().clone())
    }

    #[tokio::test]
    async fn should_load_freshly_seeded_cells_as_default_snapshot() {
        let store = make_store().await;

        let snapshot = store.load().await.unwrap();

        assert_eq!(snapshot, StateSnapshot::default());
    }

    #[tokio::test]
    async fn should_persist_tracker_update() {
        let store = make_store().await;
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let mut ledger = DurationLedger::default();
        ledger.append(600);

        store
            .apply_tracker(TrackerUpdate {
                marker: CycleMarker::Open(start),
                daily_active_seconds: 600,
                ledger: ledger.clone(),
            })
            .await
            .unwrap();

        let snapshot = store.load().await.unwrap();
        assert_eq!(snapshot.marker, CycleMarker::Open(start));
        assert_eq!(snapshot.daily_active_seconds, 600);
        assert_eq!(snapshot.ledger, ledger);
        // The other handler's cells are untouched.
        assert_eq!(snapshot.lifetime_kwh, 0.0);
        assert_eq!(snapshot.last_processed, None);
    }

    #[tokio::test]
    async fn should_persist_backfill_update_and_reset_daily_cells() {
        let store = make_store().await;
        let mut ledger = DurationLedger::default();
        ledger.append(600);
        ledger.append(1200);
        store
            .apply_tracker(TrackerUpdate {
                marker: CycleMarker::Closed,
                daily_active_seconds: 1800,
                ledger,
            })
            .await
            .unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        store
            .apply_backfill(BackfillUpdate {
                lifetime_kwh: 10.85,
                last_processed: date,
            })
            .await
            .unwrap();

        let snapshot = store.load().await.unwrap();
        assert!((snapshot.lifetime_kwh - 10.85).abs() < 1e-9);
        assert_eq!(snapshot.last_processed, Some(date));
        assert_eq!(snapshot.daily_active_seconds, 0);
        assert!(snapshot.ledger.is_empty());
        assert_eq!(snapshot.marker, CycleMarker::Closed);
    }

    #[tokio::test]
    async fn should_report_parse_error_for_corrupted_cell() {
        let store = make_store().await;
        sqlx::query("UPDATE cells SET value = 'bogus' WHERE name = ?")
            .bind(cells::CYCLE_DURATIONS)
            .execute(&store.pool)
            .await
            .unwrap();

        let result = store.load().await;

        assert!(matches!(result, Err(TallyError::Parse(_))));
    }

    #[tokio::test]
    async fn should_decode_epoch_cycle_start_as_closed_marker() {
        let store = make_store().await;
        let snapshot = store.load().await.unwrap();
        assert_eq!(snapshot.marker, CycleMarker::Closed);
        assert!(!snapshot.marker.is_open());
    }
}
