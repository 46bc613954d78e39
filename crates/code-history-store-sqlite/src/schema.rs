//! SQL schema for the code-history SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per daily fact, shaped like the hosted table.
-- display_date is logically unique but not constrained: lookups take the
-- lowest id when duplicates slip in.
CREATE TABLE IF NOT EXISTS ephemerides (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    day              INTEGER NOT NULL,
    month            INTEGER NOT NULL,
    year             INTEGER NOT NULL,
    event            TEXT    NOT NULL,
    display_date     TEXT,              -- YYYY-MM-DD
    historical_day   INTEGER,
    historical_month INTEGER,
    historical_year  INTEGER,
    created_at       TEXT,              -- RFC 3339 UTC
    updated_at       TEXT
);

CREATE INDEX IF NOT EXISTS ephemerides_display_date_idx
    ON ephemerides(display_date);

PRAGMA user_version = 1;
";
