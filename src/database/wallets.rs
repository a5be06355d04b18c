use super::Database;
use crate::logger::{self, LogTag};
use crate::wallets::{Holder, WalletStatus};
use anyhow::Result;
use rusqlite::{params, OptionalExtension};

/// Persisted classification of one wallet
#[derive(Debug, Clone, PartialEq)]
pub struct WalletEntry {
    pub address: String,
    pub status: WalletStatus,
    pub transactions_count: u64,
}

/// Narrow cache interface consulted before re-classifying a wallet
pub trait WalletCache: Send + Sync {
    fn lookup(&self, address: &str) -> Result<Option<WalletEntry>>;

    /// Returns false (and logs) when the address already exists
    fn insert(&self, holder: &Holder) -> Result<bool>;

    /// Overwrites status and transaction count
    fn update(&self, holder: &Holder) -> Result<()>;

    fn truncate(&self) -> Result<()>;

    fn count(&self) -> Result<u64>;
}

// =============================================================================
// SQLITE IMPLEMENTATION
// =============================================================================

impl Database {
    /// Look up a wallet entry by address
    pub fn get_wallet(&self, address: &str) -> Result<Option<WalletEntry>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT address, status, transactions_count FROM wallet WHERE address = ?1",
                params![address],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.map(|(address, status, count)| WalletEntry {
            address,
            status: status.parse().unwrap_or(WalletStatus::Unknown),
            transactions_count: count.max(0) as u64,
        }))
    }

    /// Insert a new wallet entry; false if the address is already cached
    pub fn insert_wallet(&self, holder: &Holder) -> Result<bool> {
        let conn = self.lock()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO wallet (address, status, transactions_count) VALUES (?1, ?2, ?3)",
            params![
                holder.address,
                holder.status.as_str(),
                holder.transactions_count as i64
            ],
        )?;

        if inserted == 0 {
            logger::warning(
                LogTag::Cache,
                &format!("Wallet {} already cached, insert ignored", holder.address),
            );
        }
        Ok(inserted > 0)
    }

    /// Overwrite an existing wallet entry
    pub fn update_wallet(&self, holder: &Holder) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE wallet SET status = ?1, transactions_count = ?2 WHERE address = ?3",
            params![
                holder.status.as_str(),
                holder.transactions_count as i64,
                holder.address
            ],
        )?;
        Ok(())
    }

    /// Delete every wallet entry
    pub fn truncate_wallets(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM wallet", [])?;
        Ok(())
    }

    /// Get total wallet count
    pub fn wallet_count(&self) -> Result<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM wallet", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

impl WalletCache for Database {
    fn lookup(&self, address: &str) -> Result<Option<WalletEntry>> {
        self.get_wallet(address)
    }

    fn insert(&self, holder: &Holder) -> Result<bool> {
        self.insert_wallet(holder)
    }

    fn update(&self, holder: &Holder) -> Result<()> {
        self.update_wallet(holder)
    }

    fn truncate(&self) -> Result<()> {
        self.truncate_wallets()
    }

    fn count(&self) -> Result<u64> {
        self.wallet_count()
    }
}

// =============================================================================
// DISABLED CACHE
// =============================================================================

/// Cache used when running without a database: never hits, never stores
pub struct DisabledCache;

impl WalletCache for DisabledCache {
    fn lookup(&self, _address: &str) -> Result<Option<WalletEntry>> {
        Ok(None)
    }

    fn insert(&self, _holder: &Holder) -> Result<bool> {
        Ok(false)
    }

    fn update(&self, _holder: &Holder) -> Result<()> {
        Ok(())
    }

    fn truncate(&self) -> Result<()> {
        Ok(())
    }

    fn count(&self) -> Result<u64> {
        Ok(0)
    }
}
