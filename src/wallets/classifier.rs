//! Wallet freshness classifier
//!
//! Pages through a wallet's transaction history (newest first) until it can
//! tell whether the wallet's activity started inside the freshness window.

use crate::address::is_valid_solana_address;
use crate::config::ClassifierConfig;
use crate::database::WalletCache;
use crate::errors::ApiError;
use crate::logger::{self, LogTag};
use crate::wallets::types::{Classification, Holder, TransactionRecord, WalletStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Source of paged wallet history
#[async_trait]
pub trait TransactionHistory: Send + Sync {
    /// Up to `limit` transactions older than `before` (a tx hash), newest first
    async fn transactions_page(
        &self,
        address: &str,
        limit: u32,
        before: Option<&str>,
    ) -> Result<Vec<TransactionRecord>, ApiError>;
}

pub struct WalletClassifier {
    history: Arc<dyn TransactionHistory>,
    config: ClassifierConfig,
}

impl WalletClassifier {
    pub fn new(history: Arc<dyn TransactionHistory>, config: ClassifierConfig) -> Self {
        Self { history, config }
    }

    fn window_secs(&self) -> i64 {
        self.config.fresh_wallet_hours.saturating_mul(3600)
    }

    /// Classify one wallet as of `now`
    ///
    /// API failures never escape: they yield UNKNOWN.
    pub async fn classify(&self, address: &str, now: DateTime<Utc>) -> Classification {
        if !is_valid_solana_address(address) {
            logger::debug(
                LogTag::Classifier,
                &format!("Invalid Solana address: {}", address),
            );
            return Classification::unknown();
        }

        let now_ts = now.timestamp();
        let page_size = self.config.page_size.max(1);
        let mut cursor: Option<String> = None;
        let mut total: u64 = 0;
        let mut oldest_seen: Option<i64> = None;
        let mut first_page = true;

        loop {
            let page = match self.fetch_page(address, page_size, cursor.as_deref()).await {
                Some(page) => page,
                None => return Classification::unknown(),
            };

            let (newest, oldest, last_hash) = match (page.first(), page.last()) {
                (Some(first), Some(last)) => {
                    (first.block_time, last.block_time, last.tx_hash.clone())
                }
                _ => {
                    // history exhausted exactly on a page boundary
                    return match oldest_seen {
                        Some(oldest) => self.complete(address, now_ts, oldest, total),
                        None => {
                            logger::debug(
                                LogTag::Classifier,
                                &format!("No transaction history for {}", address),
                            );
                            Classification::unknown()
                        }
                    };
                }
            };

            total += page.len() as u64;

            if total >= self.config.skip_threshold {
                logger::debug(
                    LogTag::Classifier,
                    &format!(
                        "Reached {} transactions for {}, marking {}",
                        self.config.skip_threshold, address, self.config.skip_status
                    ),
                );
                return Classification::new(self.config.skip_status, total);
            }

            if first_page && self.is_bundled_page(&page) {
                logger::debug(
                    LogTag::Classifier,
                    &format!(
                        "Latest {} transactions of {} share one timestamp",
                        self.config.bundle_window.min(page.len()),
                        address
                    ),
                );
                return Classification::new(self.config.bundle_status, total);
            }
            first_page = false;
            oldest_seen = Some(oldest);

            if page.len() < page_size as usize || now_ts - newest > self.window_secs() {
                return self.complete(address, now_ts, oldest, total);
            }

            cursor = Some(last_hash);
        }
    }

    /// Cache-aware classification of one holder
    ///
    /// Terminal cache entries short-circuit without any API call. A non
    /// UNKNOWN result is written back: insert for new wallets, update for
    /// known ones.
    pub async fn check_holder(
        &self,
        mut holder: Holder,
        cache: &dyn WalletCache,
        now: DateTime<Utc>,
    ) -> Holder {
        let entry = match cache.lookup(&holder.address) {
            Ok(entry) => entry,
            Err(e) => {
                logger::warning(
                    LogTag::Cache,
                    &format!("Cache lookup failed for {}: {}", holder.address, e),
                );
                None
            }
        };

        if let Some(ref cached) = entry {
            if cached.status.is_terminal() {
                holder.status = cached.status;
                holder.transactions_count = cached.transactions_count;
                return holder;
            }
        }

        let result = self.classify(&holder.address, now).await;
        holder.status = result.status;
        holder.transactions_count = result.transactions_count;

        if result.status != WalletStatus::Unknown {
            let written = if entry.is_none() {
                cache.insert(&holder).map(|_| ())
            } else {
                cache.update(&holder)
            };
            if let Err(e) = written {
                logger::warning(
                    LogTag::Cache,
                    &format!("Cache write failed for {}: {}", holder.address, e),
                );
            }
        }

        holder
    }

    fn complete(&self, address: &str, now_ts: i64, oldest: i64, total: u64) -> Classification {
        let age_secs = now_ts - oldest;
        let status = if age_secs <= self.window_secs() {
            WalletStatus::Fresh
        } else {
            WalletStatus::Old
        };

        logger::debug(
            LogTag::Classifier,
            &format!(
                "{} -> {} (oldest seen {:.2}h ago, {} transactions)",
                address,
                status,
                age_secs as f64 / 3600.0,
                total
            ),
        );
        Classification::new(status, total)
    }

    fn is_bundled_page(&self, page: &[TransactionRecord]) -> bool {
        if !self.config.bundle_check_enabled || page.len() < 2 {
            return false;
        }
        let idx = self.config.bundle_window.min(page.len()).saturating_sub(1);
        idx > 0 && page[idx].block_time == page[0].block_time
    }

    /// One page with bounded retry on 429; None means give up as UNKNOWN
    async fn fetch_page(
        &self,
        address: &str,
        page_size: u32,
        before: Option<&str>,
    ) -> Option<Vec<TransactionRecord>> {
        let mut retries = 0u32;

        loop {
            match self
                .history
                .transactions_page(address, page_size, before)
                .await
            {
                Ok(page) => return Some(page),
                Err(e) if e.is_rate_limited() => {
                    if retries >= self.config.max_rate_limit_retries {
                        logger::warning(
                            LogTag::Classifier,
                            &format!(
                                "Rate limited {} times for {}, giving up",
                                retries + 1,
                                address
                            ),
                        );
                        return None;
                    }
                    retries += 1;
                    logger::warning(
                        LogTag::Classifier,
                        &format!(
                            "Rate limited for {}, retry {}/{} in {}s",
                            address,
                            retries,
                            self.config.max_rate_limit_retries,
                            self.config.rate_limit_backoff_secs
                        ),
                    );
                    tokio::time::sleep(Duration::from_secs(self.config.rate_limit_backoff_secs))
                        .await;
                }
                Err(e) => {
                    logger::warning(
                        LogTag::Classifier,
                        &format!("Skipping {}: {}", address, e),
                    );
                    return None;
                }
            }
        }
    }
}
