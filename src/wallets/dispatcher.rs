//! Bounded-concurrency fan-out of holder classification
//!
//! Holders are classified as concurrent futures through an ordered buffered
//! stream, so results come back in submission order. Request admission is
//! the shared token bucket taken by every wallet-history call.

use crate::apis::client::RateLimiter;
use crate::config::DispatcherConfig;
use crate::database::WalletCache;
use crate::logger::{self, LogTag};
use crate::wallets::classifier::WalletClassifier;
use crate::wallets::types::{Holder, WalletStatus};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Summary of one dispatch batch
#[derive(Debug, Clone, Default)]
pub struct DispatchStats {
    pub total: usize,
    pub by_status: HashMap<WalletStatus, usize>,
    pub api_requests: u64,
    pub elapsed: Duration,
}

impl DispatchStats {
    pub fn count(&self, status: WalletStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Worker count: `max_workers` when set, else cores minus reserved (min 1)
pub fn worker_count(config: &DispatcherConfig) -> usize {
    if config.max_workers > 0 {
        return config.max_workers;
    }
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    cores.saturating_sub(config.reserved_cpus).max(1)
}

pub struct HolderDispatcher {
    classifier: Arc<WalletClassifier>,
    cache: Arc<dyn WalletCache>,
    limiter: Option<Arc<RateLimiter>>,
    workers: usize,
}

impl HolderDispatcher {
    pub fn new(
        classifier: Arc<WalletClassifier>,
        cache: Arc<dyn WalletCache>,
        limiter: Option<Arc<RateLimiter>>,
        workers: usize,
    ) -> Self {
        Self {
            classifier,
            cache,
            limiter,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub async fn classify_all(&self, holders: Vec<Holder>) -> (Vec<Holder>, DispatchStats) {
        self.classify_all_at(holders, Utc::now()).await
    }

    /// Classify every holder against a fixed `now`
    pub async fn classify_all_at(
        &self,
        holders: Vec<Holder>,
        now: DateTime<Utc>,
    ) -> (Vec<Holder>, DispatchStats) {
        let started = Instant::now();
        let requests_before = self.requests_so_far();
        let total = holders.len();

        logger::info(
            LogTag::Dispatcher,
            &format!(
                "Assessing {} holder wallets with {} workers",
                total, self.workers
            ),
        );

        let classified: Vec<Holder> = stream::iter(holders.into_iter().map(|holder| {
            let classifier = self.classifier.clone();
            let cache = self.cache.clone();
            async move { classifier.check_holder(holder, cache.as_ref(), now).await }
        }))
        .buffered(self.workers)
        .collect()
        .await;

        let mut stats = DispatchStats {
            total,
            api_requests: self.requests_so_far().saturating_sub(requests_before),
            elapsed: started.elapsed(),
            ..DispatchStats::default()
        };
        for holder in &classified {
            *stats.by_status.entry(holder.status).or_insert(0) += 1;
        }

        let recent = self
            .limiter
            .as_ref()
            .map(|l| format!(", {} in current window", l.recent_count()))
            .unwrap_or_default();
        logger::info(
            LogTag::Dispatcher,
            &format!(
                "Classified {} holders in {:.1}s: fresh={} old={} skipped={} bundler={} unknown={} ({} API calls{})",
                total,
                stats.elapsed.as_secs_f64(),
                stats.count(WalletStatus::Fresh),
                stats.count(WalletStatus::Old),
                stats.count(WalletStatus::Skipped),
                stats.count(WalletStatus::Bundler) + stats.count(WalletStatus::Danger),
                stats.count(WalletStatus::Unknown),
                stats.api_requests,
                recent
            ),
        );

        (classified, stats)
    }

    fn requests_so_far(&self) -> u64 {
        self.limiter
            .as_ref()
            .map(|l| l.total_acquired())
            .unwrap_or(0)
    }
}
