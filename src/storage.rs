use crate::errors::StoreError;
use crate::models::VisitRecord;
use chrono::NaiveDate;
use rusqlite::{params, Connection, ErrorCode};
use std::{env, path::Path, path::PathBuf};
use tracing::{debug, warn};

const DEFAULT_DB_PATH: &str = "office_visits.db";

pub fn resolve_db_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DB_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from(DEFAULT_DB_PATH)
}

/// Visit table on disk. Only the path is held; each operation opens its own
/// connection and closes it before returning.
#[derive(Debug, Clone)]
pub struct VisitStore {
    db_path: PathBuf,
}

impl VisitStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        let conn = self.open()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS office_visits (date TEXT PRIMARY KEY)",
            [],
        )?;
        Ok(())
    }

    /// Every stored visit in whatever order SQLite returns them.
    pub fn list_all(&self) -> Result<Vec<VisitRecord>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare("SELECT date FROM office_visits")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        let records = keys
            .into_iter()
            .map(parse_record)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = records.len(), "loaded visits");
        Ok(records)
    }

    pub fn insert(&self, date: NaiveDate) -> Result<(), StoreError> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO office_visits (date) VALUES (?1)",
            params![date_key(date)],
        )
        .map_err(|err| map_insert_conflict(err, date))?;
        tx.commit()?;
        debug!(%date, "visit inserted");
        Ok(())
    }

    /// Removes the row whose stored text equals `key`. Deleting a key that
    /// was never logged still succeeds.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM office_visits WHERE date = ?1", params![key])?;
        tx.commit()?;
        debug!(key, removed, "visit deleted");
        Ok(())
    }

    fn open(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.db_path)?)
    }
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_record(key: String) -> Result<VisitRecord, StoreError> {
    let date = NaiveDate::parse_from_str(&key, "%Y-%m-%d")
        .map_err(|err| StoreError::StorageFault(format!("invalid stored date {key:?}: {err}")))?;
    Ok(VisitRecord { key, date })
}

fn map_insert_conflict(err: rusqlite::Error, date: NaiveDate) -> StoreError {
    if is_constraint_violation(&err) {
        warn!(%date, "duplicate visit rejected");
        return StoreError::DuplicateKey(date);
    }
    StoreError::from(err)
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                || message.as_deref().is_some_and(|value| {
                    value.contains("UNIQUE constraint failed")
                        || value.contains("PRIMARY KEY constraint failed")
                })
        }
        _ => false,
    }
}
