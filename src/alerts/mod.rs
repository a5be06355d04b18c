/// Fresh-holder alerts and the daily performance report
///
/// - `summary`: per-status holder totals
/// - `formatter`: HTML message text
/// - `notifier`: `AlertSink` and the Telegram implementation
/// - `store`: alert record files and dated report files
/// - `report`: re-pricing of old alerts
pub mod formatter;
pub mod notifier;
pub mod report;
pub mod store;
pub mod summary;

pub use formatter::{format_alert, format_report};
pub use notifier::{AlertSink, TelegramNotifier};
pub use report::{PerformanceEntry, PerformanceReporter, ReportOutcome};
pub use store::{append_report, AlertRecord, AlertStore};
pub use summary::FreshnessSummary;

use crate::coins::CoinData;
use crate::logger::{self, LogTag};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub struct AlertManager {
    sink: Arc<dyn AlertSink>,
    store: AlertStore,
    threshold: f64,
}

impl AlertManager {
    pub fn new(sink: Arc<dyn AlertSink>, store: AlertStore, send_percent_threshold: f64) -> Self {
        Self {
            sink,
            store,
            threshold: send_percent_threshold,
        }
    }

    /// Send an alert when enough holders are fresh. Returns true when sent.
    pub async fn evaluate(&self, coin: &CoinData, now: DateTime<Utc>) -> bool {
        if coin.holders.is_empty() {
            logger::debug(
                LogTag::Alerts,
                &format!("{} has no holders, no alert", coin.coin_address),
            );
            return false;
        }

        let summary = FreshnessSummary::from_holders(&coin.holders);
        logger::info(
            LogTag::Alerts,
            &format!(
                "{} fresh {}/{} ({:.2}%), threshold {:.2}%",
                coin.coin_address,
                summary.fresh,
                summary.total,
                summary.percent_fresh,
                self.threshold
            ),
        );
        if summary.percent_fresh < self.threshold {
            return false;
        }

        if let Err(e) = self.sink.send(&format_alert(coin, &summary, now)).await {
            logger::error(
                LogTag::Alerts,
                &format!("Alert for {} not sent: {}", coin.coin_address, e),
            );
            return false;
        }

        let record = AlertRecord {
            name: coin.market_info.token_name.clone(),
            address: coin.coin_address.clone(),
            market_cap: coin.market_info.market_cap,
            price: coin.market_info.price,
            liquidity: coin.market_info.liquidity,
            percent_fresh: summary.percent_fresh,
            time: now,
        };
        if let Err(e) = self.store.save(&record) {
            logger::warning(LogTag::Alerts, &e);
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::report::tests::RecordingSink;
    use crate::coins::MarketInfo;
    use crate::wallets::{Holder, WalletStatus};
    use async_trait::async_trait;
    use chrono::TimeZone;

    struct FailingSink;

    #[async_trait]
    impl AlertSink for FailingSink {
        async fn send(&self, _text: &str) -> Result<(), String> {
            Err("chat not found".to_string())
        }
    }

    fn coin(statuses: &[WalletStatus]) -> CoinData {
        let mut coin = CoinData::new(
            "coin1",
            MarketInfo {
                token_name: "Coin <One>".to_string(),
                market_cap: 50_000.0,
                liquidity: 9_000.0,
                price: 0.00005,
                created_at_utc: None,
            },
        );
        coin.holders = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                let mut holder = Holder::new(format!("holder{}", i));
                holder.status = *status;
                holder
            })
            .collect();
        coin
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_718_000_000, 0).unwrap()
    }

    #[tokio::test]
    async fn test_alert_sent_and_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let manager = AlertManager::new(sink.clone(), AlertStore::new(dir.path()), 50.0);

        let sent = manager
            .evaluate(&coin(&[WalletStatus::Fresh, WalletStatus::Old]), now())
            .await;
        assert!(sent);

        let messages = sink.sent.lock().unwrap().clone();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Coin &lt;One&gt;"));

        let records = AlertStore::new(dir.path()).list();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].1.percent_fresh, 50.0);
        assert_eq!(records[0].1.time, now());
    }

    #[tokio::test]
    async fn test_below_threshold_or_empty_not_sent() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let manager = AlertManager::new(sink.clone(), AlertStore::new(dir.path()), 50.0);

        assert!(
            !manager
                .evaluate(
                    &coin(&[WalletStatus::Fresh, WalletStatus::Old, WalletStatus::Skipped]),
                    now()
                )
                .await
        );
        assert!(!manager.evaluate(&coin(&[]), now()).await);
        assert!(sink.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_send_writes_no_record() {
        let dir = tempfile::tempdir().unwrap();
        let manager = AlertManager::new(Arc::new(FailingSink), AlertStore::new(dir.path()), 10.0);

        assert!(!manager.evaluate(&coin(&[WalletStatus::Fresh]), now()).await);
        assert!(AlertStore::new(dir.path()).list().is_empty());
    }
}
