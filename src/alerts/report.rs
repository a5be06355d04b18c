//! Daily performance report over sent alerts
//!
//! Alerts older than the configured delay are re-priced, written to a dated
//! report file and removed. The report is sent at most once per day; the
//! date is persisted in the `state` table.

use crate::alerts::formatter::format_report;
use crate::alerts::notifier::AlertSink;
use crate::alerts::store::{append_report, AlertStore};
use crate::coins::market::{fetch_market_info, MarketDataSource};
use crate::database::Database;
use crate::logger::{self, LogTag};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Market cap change of one alerted coin since its alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    pub name: String,
    pub address: String,
    pub original_market_cap: f64,
    pub new_market_cap: f64,
    pub market_cap_difference: f64,
    pub percentage_change: f64,
}

impl PerformanceEntry {
    pub fn new(name: &str, address: &str, original: f64, current: f64) -> Self {
        let percentage_change = if original != 0.0 {
            (current - original) / original * 100.0
        } else {
            0.0
        };
        Self {
            name: name.to_string(),
            address: address.to_string(),
            original_market_cap: original,
            new_market_cap: current,
            market_cap_difference: current - original,
            percentage_change,
        }
    }
}

/// What a report run did
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// Already sent for this date
    AlreadySent,
    /// No alert was old enough or could be re-priced
    NothingDue,
    Sent(Vec<PerformanceEntry>),
}

pub struct PerformanceReporter {
    store: AlertStore,
    reports_dir: PathBuf,
    market: Arc<dyn MarketDataSource>,
    sink: Arc<dyn AlertSink>,
    db: Arc<Database>,
    delay: Duration,
}

impl PerformanceReporter {
    pub fn new(
        store: AlertStore,
        reports_dir: PathBuf,
        market: Arc<dyn MarketDataSource>,
        sink: Arc<dyn AlertSink>,
        db: Arc<Database>,
        report_delay_hours: i64,
    ) -> Self {
        Self {
            store,
            reports_dir,
            market,
            sink,
            db,
            delay: Duration::hours(report_delay_hours.max(0)),
        }
    }

    pub async fn run_if_due(
        &self,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ReportOutcome, String> {
        let last = self
            .db
            .last_report_date()
            .map_err(|e| format!("Failed to read last report date: {}", e))?;
        if last == Some(today) {
            logger::debug(LogTag::Report, &format!("Report for {} already sent", today));
            return Ok(ReportOutcome::AlreadySent);
        }

        let due: Vec<_> = self
            .store
            .list()
            .into_iter()
            .filter(|(_, record)| now - record.time >= self.delay)
            .collect();
        if due.is_empty() {
            return Ok(ReportOutcome::NothingDue);
        }

        let addresses: Vec<String> = due.iter().map(|(_, r)| r.address.clone()).collect();
        let infos = fetch_market_info(self.market.as_ref(), &addresses).await;

        let mut reported = Vec::new();
        let mut entries = Vec::new();
        for (path, record) in &due {
            let Some(info) = infos.get(&record.address) else {
                logger::warning(
                    LogTag::Report,
                    &format!(
                        "No market info for {}, keeping alert for next report",
                        record.address
                    ),
                );
                continue;
            };
            entries.push(PerformanceEntry::new(
                &record.name,
                &record.address,
                record.market_cap,
                info.market_cap,
            ));
            reported.push(path);
        }

        if entries.is_empty() {
            return Ok(ReportOutcome::NothingDue);
        }

        // alert records stay on disk until the report file holds their entries
        let path = append_report(&self.reports_dir, today, &entries)?;
        logger::info(
            LogTag::Report,
            &format!("Wrote {} performance entries to {}", entries.len(), path.display()),
        );

        for record_path in reported {
            if let Err(e) = self.store.delete(record_path) {
                logger::warning(LogTag::Report, &e);
            }
        }

        if let Err(e) = self.sink.send(&format_report(today, &entries)).await {
            logger::error(LogTag::Report, &format!("Report not sent: {}", e));
        }

        self.db
            .set_last_report_date(today)
            .map_err(|e| format!("Failed to persist last report date: {}", e))?;

        Ok(ReportOutcome::Sent(entries))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::alerts::store::AlertRecord;
    use crate::coins::market::tests::{pair, StubMarket};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingSink {
        pub sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AlertSink for RecordingSink {
        async fn send(&self, text: &str) -> Result<(), String> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn record(address: &str, market_cap: f64, time: DateTime<Utc>) -> AlertRecord {
        AlertRecord {
            name: address.to_uppercase(),
            address: address.to_string(),
            market_cap,
            price: 0.0,
            liquidity: 0.0,
            percent_fresh: 60.0,
            time,
        }
    }

    #[test]
    fn test_entry_math() {
        let entry = PerformanceEntry::new("A", "a", 40_000.0, 50_000.0);
        assert_eq!(entry.market_cap_difference, 10_000.0);
        assert_eq!(entry.percentage_change, 25.0);
        assert_eq!(PerformanceEntry::new("A", "a", 0.0, 5.0).percentage_change, 0.0);
    }

    #[tokio::test]
    async fn test_report_runs_once_per_day() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.timestamp_opt(1_718_000_000, 0).unwrap();
        let today = now.date_naive();

        let store = AlertStore::new(dir.path().join("alerts"));
        store.save(&record("due", 40_000.0, now - Duration::hours(7))).unwrap();
        store.save(&record("recent", 40_000.0, now - Duration::hours(1))).unwrap();

        let market = StubMarket::default();
        market.pairs.lock().unwrap().extend(vec![
            pair("due", "DUE", 50_000.0, 1.0, 1.0),
            pair("recent", "RECENT", 10_000.0, 1.0, 1.0),
        ]);
        let sink = Arc::new(RecordingSink::default());
        let db = Arc::new(Database::open_in_memory().unwrap());

        let reporter = PerformanceReporter::new(
            AlertStore::new(dir.path().join("alerts")),
            dir.path().join("reports"),
            Arc::new(market),
            sink.clone(),
            db.clone(),
            6,
        );

        let outcome = reporter.run_if_due(today, now).await.unwrap();
        match outcome {
            ReportOutcome::Sent(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].address, "due");
                assert_eq!(entries[0].percentage_change, 25.0);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(sink.sent.lock().unwrap().len(), 1);
        assert_eq!(db.last_report_date().unwrap(), Some(today));

        // due record removed, recent one kept
        let remaining: Vec<String> = store.list().into_iter().map(|(_, r)| r.address).collect();
        assert_eq!(remaining, vec!["recent".to_string()]);
        assert!(dir
            .path()
            .join("reports")
            .join(format!("{}.json", today.format("%Y-%m-%d")))
            .exists());

        // same day: gated
        let again = reporter.run_if_due(today, now + Duration::hours(8)).await.unwrap();
        assert_eq!(again, ReportOutcome::AlreadySent);
        assert_eq!(sink.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_report_write_keeps_alert_records() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.timestamp_opt(1_718_000_000, 0).unwrap();

        let store = AlertStore::new(dir.path().join("alerts"));
        store.save(&record("due", 40_000.0, now - Duration::hours(7))).unwrap();

        // a plain file where the reports directory should go
        let reports_dir = dir.path().join("reports");
        std::fs::write(&reports_dir, "not a directory").unwrap();

        let market = StubMarket::default();
        market
            .pairs
            .lock()
            .unwrap()
            .push(pair("due", "DUE", 50_000.0, 1.0, 1.0));
        let sink = Arc::new(RecordingSink::default());
        let db = Arc::new(Database::open_in_memory().unwrap());

        let reporter = PerformanceReporter::new(
            AlertStore::new(dir.path().join("alerts")),
            reports_dir,
            Arc::new(market),
            sink.clone(),
            db.clone(),
            6,
        );

        assert!(reporter.run_if_due(now.date_naive(), now).await.is_err());
        assert_eq!(store.list().len(), 1);
        assert!(sink.sent.lock().unwrap().is_empty());
        assert!(db.last_report_date().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_nothing_due_does_not_mark_date() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.timestamp_opt(1_718_000_000, 0).unwrap();
        let db = Arc::new(Database::open_in_memory().unwrap());
        let reporter = PerformanceReporter::new(
            AlertStore::new(dir.path().join("alerts")),
            dir.path().join("reports"),
            Arc::new(StubMarket::default()),
            Arc::new(RecordingSink::default()),
            db.clone(),
            6,
        );

        let outcome = reporter.run_if_due(now.date_naive(), now).await.unwrap();
        assert_eq!(outcome, ReportOutcome::NothingDue);
        assert!(db.last_report_date().unwrap().is_none());
    }
}
