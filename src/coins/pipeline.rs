//! Coin holder pipeline: fetch holders, classify them, attach the results

use crate::coins::holders::HolderFetcher;
use crate::coins::types::CoinData;
use crate::logger::{self, LogTag};
use crate::wallets::{DispatchStats, Holder, HolderDispatcher};
use chrono::{DateTime, Utc};

pub struct CoinHolderPipeline {
    fetcher: HolderFetcher,
    dispatcher: HolderDispatcher,
}

impl CoinHolderPipeline {
    pub fn new(fetcher: HolderFetcher, dispatcher: HolderDispatcher) -> Self {
        Self {
            fetcher,
            dispatcher,
        }
    }

    /// Fetch and classify the holders of one coin
    ///
    /// A coin without a usable holder list comes back with no holders and
    /// is not alerted on.
    pub async fn process(&self, mut coin: CoinData) -> CoinData {
        let Some(holders) = self.usable_holders(&mut coin).await else {
            return coin;
        };
        let (classified, _) = self.dispatcher.classify_all(holders).await;
        coin.holders = classified;
        coin
    }

    pub async fn process_at(&self, mut coin: CoinData, now: DateTime<Utc>) -> CoinData {
        let Some(holders) = self.usable_holders(&mut coin).await else {
            return coin;
        };
        let (classified, _) = self.classify_holders_at(holders, now).await;
        coin.holders = classified;
        coin
    }

    async fn usable_holders(&self, coin: &mut CoinData) -> Option<Vec<Holder>> {
        logger::info(
            LogTag::Holders,
            &format!("Getting holder addresses for {}", coin.coin_address),
        );

        let holders = self.fetcher.fetch_holders(&coin.coin_address).await;
        if holders.is_empty() {
            logger::info(
                LogTag::Holders,
                &format!("Skipped {}: no usable holder list", coin.coin_address),
            );
            coin.holders = Vec::new();
            return None;
        }
        Some(holders)
    }

    /// Classification stage alone, for an already fetched holder list
    pub async fn classify_holders_at(
        &self,
        holders: Vec<Holder>,
        now: DateTime<Utc>,
    ) -> (Vec<Holder>, DispatchStats) {
        self.dispatcher.classify_all_at(holders, now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coins::holders::tests::StubListing;
    use crate::coins::types::MarketInfo;
    use crate::config::HoldersConfig;
    use crate::database::{Database, WalletCache};
    use crate::wallets::classifier::tests::{
        now, records, test_config, StubHistory, NOW_TS, WALLET_A, WALLET_B,
    };
    use crate::wallets::{WalletClassifier, WalletStatus};
    use std::sync::Arc;

    fn pipeline(
        history: &Arc<StubHistory>,
        listing: StubListing,
        cache: Arc<Database>,
    ) -> CoinHolderPipeline {
        let classifier = Arc::new(WalletClassifier::new(history.clone(), test_config()));
        let fetcher = HolderFetcher::new(
            Arc::new(listing),
            HoldersConfig {
                min_holder_count: 1,
                max_holders: 0,
                holder_page_size: 50,
            },
        );
        CoinHolderPipeline::new(fetcher, HolderDispatcher::new(classifier, cache, None, 4))
    }

    #[tokio::test]
    async fn test_three_holder_scenario() {
        let history = Arc::new(StubHistory::default());
        // B: ten transactions, all older than the freshness window
        history.push(WALLET_B, Ok(records(10, NOW_TS - 40 * 3_600, 60, "b")));

        let cache = Arc::new(Database::open_in_memory().unwrap());
        cache
            .insert(&Holder {
                address: WALLET_A.to_string(),
                status: WalletStatus::Old,
                transactions_count: 12,
            })
            .unwrap();

        let pipeline = pipeline(&history, StubListing::new(&[]), cache.clone());
        let holders = vec![
            Holder::new(WALLET_A),
            Holder::new(WALLET_B),
            Holder::new("C-not-an-address"),
        ];
        let (classified, _) = pipeline.classify_holders_at(holders, now()).await;

        let statuses: Vec<WalletStatus> = classified.iter().map(|h| h.status).collect();
        assert_eq!(
            statuses,
            vec![WalletStatus::Old, WalletStatus::Old, WalletStatus::Unknown]
        );
        assert_eq!(classified[1].transactions_count, 10);

        // only B paged, only B newly written
        assert_eq!(history.calls_for(WALLET_A), 0);
        assert_eq!(history.calls_for(WALLET_B), 1);
        assert_eq!(history.total_calls(), 1);
        assert_eq!(cache.count().unwrap(), 2);
        assert_eq!(
            cache.lookup(WALLET_B).unwrap().unwrap().status,
            WalletStatus::Old
        );
        assert!(cache.lookup("C-not-an-address").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_process_uses_cache_on_live_clock() {
        let history = Arc::new(StubHistory::default());
        let cache = Arc::new(Database::open_in_memory().unwrap());
        cache
            .insert(&Holder {
                address: WALLET_A.to_string(),
                status: WalletStatus::Skipped,
                transactions_count: 200,
            })
            .unwrap();

        let pipeline = pipeline(&history, StubListing::new(&[WALLET_A]), cache);
        let processed = pipeline
            .process(CoinData::new("COIN", MarketInfo::default()))
            .await;

        assert_eq!(processed.holders.len(), 1);
        assert_eq!(processed.holders[0].status, WalletStatus::Skipped);
        assert_eq!(history.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_coin_without_holders_is_skipped() {
        let history = Arc::new(StubHistory::default());
        let cache = Arc::new(Database::open_in_memory().unwrap());
        let pipeline = pipeline(&history, StubListing::new(&[]), cache);

        let coin = CoinData::new("TOKEN", MarketInfo::default());
        let processed = pipeline.process_at(coin, now()).await;
        assert!(processed.holders.is_empty());
        assert_eq!(history.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_process_attaches_holders_in_fetch_order() {
        let history = Arc::new(StubHistory::default());
        history.push(WALLET_A, Ok(records(2, NOW_TS - 60, 60, "a")));
        history.push(WALLET_B, Ok(records(2, NOW_TS - 90 * 3_600, 60, "b")));
        let cache = Arc::new(Database::open_in_memory().unwrap());
        let pipeline = pipeline(&history, StubListing::new(&[WALLET_B, WALLET_A]), cache);

        let coin = CoinData::new("TOKEN", MarketInfo::default());
        let processed = pipeline.process_at(coin, now()).await;

        assert_eq!(processed.holders.len(), 2);
        assert_eq!(processed.holders[0].address, WALLET_B);
        assert_eq!(processed.holders[0].status, WalletStatus::Old);
        assert_eq!(processed.holders[1].status, WalletStatus::Fresh);
    }
}
