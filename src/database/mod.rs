//! SQLite persistence for holderscan
//!
//! Two tables:
//! - `wallet`: wallet address -> last known status and transaction count
//! - `state`: single key/value store (e.g. `last_report_date`)
//!
//! `impl Database` is split across `wallets.rs` and `state.rs`.

pub mod state;
pub mod wallets;

pub use state::LAST_REPORT_DATE_KEY;
pub use wallets::{DisabledCache, WalletCache, WalletEntry};

use crate::logger::{self, LogTag};
use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS wallet (
        address TEXT PRIMARY KEY,
        status TEXT NOT NULL,
        transactions_count INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS state (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

/// Shared SQLite connection; every operation is a single statement
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file and apply the schema
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        let db = Self::from_connection(conn)?;

        logger::info(
            LogTag::Cache,
            &format!("Wallet cache opened at {}", path.display()),
        );
        Ok(db)
    }

    /// In-memory database, used by tests
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .context("Failed to initialize database schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| anyhow!("Database mutex poisoned: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.lock().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('wallet', 'state')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }

    #[test]
    fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("holderscan.db");
        let db = Database::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(db.wallet_count().unwrap(), 0);
    }
}
