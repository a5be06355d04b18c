//! Alert records (one JSON file per alerted coin) and dated report files

use crate::alerts::report::PerformanceEntry;
use crate::logger::{self, LogTag};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Snapshot of a coin at the moment its alert was sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub name: String,
    pub address: String,
    pub market_cap: f64,
    pub price: f64,
    pub liquidity: f64,
    pub percent_fresh: f64,
    pub time: DateTime<Utc>,
}

pub struct AlertStore {
    dir: PathBuf,
}

impl AlertStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, address: &str) -> PathBuf {
        self.dir.join(format!("{}.json", address))
    }

    /// Write (or overwrite) the record for its coin
    pub fn save(&self, record: &AlertRecord) -> Result<PathBuf, String> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| format!("Failed to create {}: {}", self.dir.display(), e))?;
        let path = self.record_path(&record.address);
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| format!("Failed to serialize alert record: {}", e))?;
        std::fs::write(&path, json)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        Ok(path)
    }

    /// Every readable record; unreadable files are logged and skipped
    pub fn list(&self) -> Vec<(PathBuf, AlertRecord)> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                logger::warning(
                    LogTag::Alerts,
                    &format!("Cannot read alerts directory {}: {}", self.dir.display(), e),
                );
                return Vec::new();
            }
        };

        let mut records = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|raw| {
                    serde_json::from_str::<AlertRecord>(&raw).map_err(|e| e.to_string())
                })
            {
                Ok(record) => records.push((path, record)),
                Err(e) => logger::warning(
                    LogTag::Alerts,
                    &format!("Skipping alert file {}: {}", path.display(), e),
                ),
            }
        }

        records.sort_by(|a, b| a.1.time.cmp(&b.1.time));
        records
    }

    pub fn delete(&self, path: &Path) -> Result<(), String> {
        std::fs::remove_file(path)
            .map_err(|e| format!("Failed to delete {}: {}", path.display(), e))
    }
}

/// Append entries to `<dir>/<date>.json`, merging with an existing array
pub fn append_report(
    dir: &Path,
    date: NaiveDate,
    entries: &[PerformanceEntry],
) -> Result<PathBuf, String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
    let path = dir.join(format!("{}.json", date.format("%Y-%m-%d")));

    let mut all: Vec<PerformanceEntry> = match std::fs::read_to_string(&path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(existing) => existing,
            Err(e) => {
                // keep the unreadable file for inspection
                let aside = path.with_extension("json.bad");
                std::fs::rename(&path, &aside).map_err(|re| {
                    format!("Failed to move aside {}: {}", path.display(), re)
                })?;
                logger::warning(
                    LogTag::Report,
                    &format!(
                        "Existing report {} unreadable ({}), moved to {}",
                        path.display(),
                        e,
                        aside.display()
                    ),
                );
                Vec::new()
            }
        },
        Err(_) => Vec::new(),
    };
    all.extend_from_slice(entries);

    let json = serde_json::to_string_pretty(&all)
        .map_err(|e| format!("Failed to serialize report: {}", e))?;
    std::fs::write(&path, json).map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    pub fn record(address: &str, secs: i64) -> AlertRecord {
        AlertRecord {
            name: format!("{} coin", address),
            address: address.to_string(),
            market_cap: 40_000.0,
            price: 0.0001,
            liquidity: 8_000.0,
            percent_fresh: 55.0,
            time: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_save_list_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = AlertStore::new(dir.path());
        store.save(&record("b", 2_000)).unwrap();
        let path_a = store.save(&record("a", 1_000)).unwrap();
        std::fs::write(dir.path().join("junk.json"), "[]").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let listed = store.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].1.address, "a");

        store.delete(&path_a).unwrap();
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_append_report_merges() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let entry = PerformanceEntry {
            name: "A".into(),
            address: "a".into(),
            original_market_cap: 100.0,
            new_market_cap: 120.0,
            market_cap_difference: 20.0,
            percentage_change: 20.0,
        };

        append_report(dir.path(), date, &[entry.clone()]).unwrap();
        let path = append_report(dir.path(), date, &[entry]).unwrap();

        let raw = std::fs::read_to_string(path).unwrap();
        let all: Vec<PerformanceEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_unreadable_report_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        std::fs::write(dir.path().join("2024-06-10.json"), "{ truncated").unwrap();
        let entry = PerformanceEntry {
            name: "A".into(),
            address: "a".into(),
            original_market_cap: 100.0,
            new_market_cap: 80.0,
            market_cap_difference: -20.0,
            percentage_change: -20.0,
        };

        let path = append_report(dir.path(), date, &[entry]).unwrap();

        let aside = dir.path().join("2024-06-10.json.bad");
        assert_eq!(std::fs::read_to_string(aside).unwrap(), "{ truncated");
        let all: Vec<PerformanceEntry> =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(all.len(), 1);
    }
}
