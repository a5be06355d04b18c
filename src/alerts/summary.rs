use crate::wallets::{Holder, WalletStatus};

/// Per-status holder totals for one coin
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FreshnessSummary {
    pub total: usize,
    pub fresh: usize,
    pub old: usize,
    pub skipped: usize,
    pub bundler: usize,
    pub danger: usize,
    pub unknown: usize,
    /// 0 when there are no holders
    pub percent_fresh: f64,
}

impl FreshnessSummary {
    pub fn from_holders(holders: &[Holder]) -> Self {
        let mut summary = Self {
            total: holders.len(),
            ..Self::default()
        };

        for holder in holders {
            match holder.status {
                WalletStatus::Fresh => summary.fresh += 1,
                WalletStatus::Old => summary.old += 1,
                WalletStatus::Skipped => summary.skipped += 1,
                WalletStatus::Bundler => summary.bundler += 1,
                WalletStatus::Danger => summary.danger += 1,
                WalletStatus::Unknown => summary.unknown += 1,
            }
        }

        if summary.total > 0 {
            summary.percent_fresh = summary.fresh as f64 / summary.total as f64 * 100.0;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder(status: WalletStatus) -> Holder {
        Holder {
            address: "x".to_string(),
            status,
            transactions_count: 0,
        }
    }

    #[test]
    fn test_counts_and_percent() {
        let holders = vec![
            holder(WalletStatus::Fresh),
            holder(WalletStatus::Fresh),
            holder(WalletStatus::Old),
            holder(WalletStatus::Unknown),
            holder(WalletStatus::Bundler),
        ];
        let summary = FreshnessSummary::from_holders(&holders);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.fresh, 2);
        assert_eq!(summary.old, 1);
        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.bundler, 1);
        assert!((summary.percent_fresh - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_is_zero_percent() {
        let summary = FreshnessSummary::from_holders(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.percent_fresh, 0.0);
    }
}
