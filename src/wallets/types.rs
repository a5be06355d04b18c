use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Freshness verdict for a single holder wallet
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WalletStatus {
    #[default]
    Unknown,
    Fresh,
    Old,
    Skipped,
    Bundler,
    Danger,
}

impl WalletStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletStatus::Unknown => "UNKNOWN",
            WalletStatus::Fresh => "FRESH",
            WalletStatus::Old => "OLD",
            WalletStatus::Skipped => "SKIPPED",
            WalletStatus::Bundler => "BUNDLER",
            WalletStatus::Danger => "DANGER",
        }
    }

    /// Terminal statuses are cached forever and never re-queried
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WalletStatus::Old | WalletStatus::Skipped | WalletStatus::Bundler | WalletStatus::Danger
        )
    }

    pub fn all() -> [WalletStatus; 6] {
        [
            WalletStatus::Unknown,
            WalletStatus::Fresh,
            WalletStatus::Old,
            WalletStatus::Skipped,
            WalletStatus::Bundler,
            WalletStatus::Danger,
        ]
    }
}

impl fmt::Display for WalletStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WalletStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UNKNOWN" => Ok(WalletStatus::Unknown),
            "FRESH" => Ok(WalletStatus::Fresh),
            "OLD" => Ok(WalletStatus::Old),
            "SKIPPED" => Ok(WalletStatus::Skipped),
            "BUNDLER" => Ok(WalletStatus::Bundler),
            "DANGER" => Ok(WalletStatus::Danger),
            other => Err(format!("unknown wallet status '{}'", other)),
        }
    }
}

/// A token holder wallet and its classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holder {
    pub address: String,
    #[serde(default)]
    pub status: WalletStatus,
    #[serde(default)]
    pub transactions_count: u64,
}

impl Holder {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            status: WalletStatus::Unknown,
            transactions_count: 0,
        }
    }
}

/// Outcome of paging through one wallet's history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: WalletStatus,
    pub transactions_count: u64,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            status: WalletStatus::Unknown,
            transactions_count: 0,
        }
    }

    pub fn new(status: WalletStatus, transactions_count: u64) -> Self {
        Self {
            status,
            transactions_count,
        }
    }
}

/// One entry of a wallet's transaction history, newest first in a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub tx_hash: String,
    /// Unix seconds
    pub block_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip_names() {
        for status in WalletStatus::all() {
            assert_eq!(status.as_str().parse::<WalletStatus>().unwrap(), status);
        }
        assert_eq!("skipped".parse::<WalletStatus>().unwrap(), WalletStatus::Skipped);
        assert!("NEW".parse::<WalletStatus>().is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!WalletStatus::Unknown.is_terminal());
        assert!(!WalletStatus::Fresh.is_terminal());
        assert!(WalletStatus::Old.is_terminal());
        assert!(WalletStatus::Skipped.is_terminal());
        assert!(WalletStatus::Bundler.is_terminal());
        assert!(WalletStatus::Danger.is_terminal());
    }

    #[test]
    fn test_holder_serializes_uppercase_status() {
        let holder = Holder {
            address: "abc".to_string(),
            status: WalletStatus::Fresh,
            transactions_count: 3,
        };
        let json = serde_json::to_string(&holder).unwrap();
        assert!(json.contains("\"FRESH\""));
    }
}
