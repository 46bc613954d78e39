//! [`SqliteStore`]: the SQLite implementation of [`EphemerisStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, Row};

use code_history_core::{
  ephemeris::{Ephemeris, NewEphemeris},
  store::EphemerisStore,
};

use crate::{Result, schema::SCHEMA};

const COLUMNS: &str = "id, day, month, year, event, display_date,
   historical_day, historical_month, historical_year, created_at, updated_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A content store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<Ephemeris> {
  Ok(Ephemeris {
    id:               row.get(0)?,
    day:              row.get(1)?,
    month:            row.get(2)?,
    year:             row.get(3)?,
    event:            row.get(4)?,
    display_date:     row.get(5)?,
    historical_day:   row.get(6)?,
    historical_month: row.get(7)?,
    historical_year:  row.get(8)?,
    created_at:       row.get(9)?,
    updated_at:       row.get(10)?,
  })
}

// ─── EphemerisStore impl ─────────────────────────────────────────────────────

impl EphemerisStore for SqliteStore {
  type Error = crate::Error;

  async fn find_by_display_date(
    &self,
    display_date: &str,
  ) -> Result<Option<Ephemeris>> {
    let key = display_date.to_owned();
    let found = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            &format!(
              "SELECT {COLUMNS} FROM ephemerides
               WHERE display_date = ?1
               ORDER BY id
               LIMIT 1"
            ),
            rusqlite::params![key],
            read_row,
          )
          .optional()?;
        Ok(row)
      })
      .await?;
    Ok(found)
  }

  async fn insert(&self, input: NewEphemeris) -> Result<Ephemeris> {
    let now = Utc::now().to_rfc3339();

    let stored = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO ephemerides (
             day, month, year, event, display_date,
             historical_day, historical_month, historical_year,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
          rusqlite::params![
            input.day,
            input.month,
            input.year,
            input.event,
            input.display_date,
            input.historical_day,
            input.historical_month,
            input.historical_year,
            now,
          ],
        )?;
        let id = conn.last_insert_rowid();
        let row = conn.query_row(
          &format!("SELECT {COLUMNS} FROM ephemerides WHERE id = ?1"),
          rusqlite::params![id],
          read_row,
        )?;
        Ok(row)
      })
      .await?;

    tracing::debug!(id = stored.id, display_date = ?stored.display_date, "inserted ephemeris");
    Ok(stored)
  }
}
