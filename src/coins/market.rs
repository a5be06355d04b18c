//! Market info aggregation over DexScreener pairs

use crate::apis::dexscreener::DexPair;
use crate::coins::types::{DexMetric, MarketInfo};
use crate::errors::ApiError;
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;

/// Source of trading pairs for batches of token addresses
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Largest batch accepted by `token_pairs`
    fn max_batch_size(&self) -> usize {
        30
    }

    async fn token_pairs(&self, addresses: &[String]) -> Result<Vec<DexPair>, ApiError>;
}

/// Aggregate pairs per base token
///
/// Market cap is the average fdv over every pair of the token; liquidity,
/// price and creation time come from the first pair encountered.
pub fn aggregate_market_info(pairs: &[DexPair]) -> HashMap<String, MarketInfo> {
    let mut metrics: HashMap<String, DexMetric> = HashMap::new();

    for pair in pairs {
        if pair.base_token_address.is_empty() {
            continue;
        }

        let metric = metrics
            .entry(pair.base_token_address.clone())
            .or_insert_with(|| DexMetric {
                liquidity: pair.liquidity_usd.unwrap_or(0.0),
                price: pair.price_usd.unwrap_or(0.0),
                token_name: pair.base_token_name.clone(),
                created_at: pair
                    .pair_created_at_ms
                    .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
                ..DexMetric::default()
            });

        if let Some(fdv) = pair.fdv {
            metric.total_fdv += fdv;
            metric.fdv_count += 1;
        }
    }

    metrics
        .into_iter()
        .map(|(address, metric)| (address, metric.to_market_info()))
        .collect()
}

/// Fetch and aggregate market info, chunking by the source batch size
///
/// A failed chunk is logged and skipped; its tokens are simply absent.
pub async fn fetch_market_info(
    source: &dyn MarketDataSource,
    addresses: &[String],
) -> HashMap<String, MarketInfo> {
    let mut pairs = Vec::new();

    for chunk in addresses.chunks(source.max_batch_size().max(1)) {
        match source.token_pairs(chunk).await {
            Ok(chunk_pairs) if chunk_pairs.is_empty() => {
                logger::warning(
                    LogTag::Market,
                    &format!("DexScreener returned no market info for {}", chunk.join(",")),
                );
            }
            Ok(chunk_pairs) => pairs.extend(chunk_pairs),
            Err(e) => {
                logger::error(
                    LogTag::Market,
                    &format!("Market info fetch failed for {} tokens: {}", chunk.len(), e),
                );
            }
        }
    }

    let infos = aggregate_market_info(&pairs);
    for (address, info) in &infos {
        logger::debug(
            LogTag::Market,
            &format!(
                "Calculated market info for {} ({}): mcap ${:.2}",
                info.token_name, address, info.market_cap
            ),
        );
    }
    infos
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    pub fn pair(address: &str, name: &str, fdv: f64, liquidity: f64, price: f64) -> DexPair {
        DexPair {
            base_token_address: address.to_string(),
            base_token_name: name.to_string(),
            pair_address: format!("{}-pair", address),
            fdv: Some(fdv),
            liquidity_usd: Some(liquidity),
            price_usd: Some(price),
            pair_created_at_ms: Some(1_718_000_000_000),
        }
    }

    /// Serves pairs from a fixed list, recording every batch it was asked for
    #[derive(Default)]
    pub struct StubMarket {
        pub pairs: Mutex<Vec<DexPair>>,
        pub batches: Mutex<Vec<Vec<String>>>,
        pub batch_size: usize,
    }

    #[async_trait]
    impl MarketDataSource for StubMarket {
        fn max_batch_size(&self) -> usize {
            if self.batch_size == 0 {
                30
            } else {
                self.batch_size
            }
        }

        async fn token_pairs(&self, addresses: &[String]) -> Result<Vec<DexPair>, ApiError> {
            self.batches.lock().unwrap().push(addresses.to_vec());
            Ok(self
                .pairs
                .lock()
                .unwrap()
                .iter()
                .filter(|p| addresses.contains(&p.base_token_address))
                .cloned()
                .collect())
        }
    }

    #[test]
    fn test_average_fdv_first_pair_liquidity() {
        let pairs = vec![
            pair("TOKEN1", "Frog", 30_000.0, 5_000.0, 0.01),
            pair("TOKEN2", "Cat", 90_000.0, 9_000.0, 0.5),
            pair("TOKEN1", "Frog", 50_000.0, 1_000.0, 0.02),
        ];
        let infos = aggregate_market_info(&pairs);

        let frog = &infos["TOKEN1"];
        assert_eq!(frog.market_cap, 40_000.0);
        assert_eq!(frog.liquidity, 5_000.0);
        assert_eq!(frog.price, 0.01);
        assert_eq!(frog.token_name, "Frog");
        assert!(frog.created_at_utc.is_some());
        assert_eq!(infos["TOKEN2"].market_cap, 90_000.0);
    }

    #[test]
    fn test_pairs_without_fdv_do_not_skew_average() {
        let mut no_fdv = pair("TOKEN1", "Frog", 0.0, 1.0, 1.0);
        no_fdv.fdv = None;
        let pairs = vec![no_fdv, pair("TOKEN1", "Frog", 10_000.0, 2.0, 2.0)];

        let info = &aggregate_market_info(&pairs)["TOKEN1"];
        assert_eq!(info.market_cap, 10_000.0);
        // first pair still supplies liquidity
        assert_eq!(info.liquidity, 1.0);
    }

    #[tokio::test]
    async fn test_fetch_chunks_by_batch_size() {
        let stub = StubMarket {
            batch_size: 2,
            ..StubMarket::default()
        };
        stub.pairs
            .lock()
            .unwrap()
            .push(pair("c", "C", 100.0, 1.0, 1.0));
        let addresses: Vec<String> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let infos = fetch_market_info(&stub, &addresses).await;
        assert_eq!(infos.len(), 1);
        assert_eq!(stub.batches.lock().unwrap().len(), 3);
    }
}
