//! Coin discovery from a listings channel
//!
//! messages -> listings -> drop seen -> market info -> market cap filter ->
//! bundled launch flag, retried while nothing qualifies.

pub mod parser;
pub mod seen;
pub mod telegram;

pub use parser::{extract_listings, ChannelListing};
pub use seen::SeenAddresses;
pub use telegram::{MessageSource, TelegramChannelSource};

use crate::coins::market::{fetch_market_info, MarketDataSource};
use crate::coins::types::CoinData;
use crate::config::DiscoveryConfig;
use crate::errors::ApiError;
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Latest transfer block times of a token, newest first
#[async_trait]
pub trait TransferHistory: Send + Sync {
    async fn transfer_block_times(
        &self,
        token_address: &str,
        limit: u32,
    ) -> Result<Vec<i64>, ApiError>;
}

/// A launch looks bundled when the newest and the `sample`-th transfer
/// share a timestamp. Errors mean "not bundled".
pub async fn check_if_bundled(
    transfers: &dyn TransferHistory,
    token_address: &str,
    sample: u32,
) -> bool {
    match transfers.transfer_block_times(token_address, sample).await {
        Ok(times) if times.len() >= 2 => times.first() == times.last(),
        Ok(_) => false,
        Err(e) => {
            logger::warning(
                LogTag::Discovery,
                &format!("Bundle check failed for {}: {}", token_address, e),
            );
            false
        }
    }
}

pub struct CoinDiscovery {
    source: Arc<dyn MessageSource>,
    market: Arc<dyn MarketDataSource>,
    transfers: Arc<dyn TransferHistory>,
    seen: SeenAddresses,
    config: DiscoveryConfig,
}

impl CoinDiscovery {
    pub fn new(
        source: Arc<dyn MessageSource>,
        market: Arc<dyn MarketDataSource>,
        transfers: Arc<dyn TransferHistory>,
        seen: SeenAddresses,
        config: DiscoveryConfig,
    ) -> Self {
        Self {
            source,
            market,
            transfers,
            seen,
            config,
        }
    }

    pub fn seen(&self) -> &SeenAddresses {
        &self.seen
    }

    /// New coins whose market cap is within the configured range
    pub async fn fetch_new_coins(&mut self) -> Vec<CoinData> {
        let messages = match self.source.recent_messages(self.config.fetch_limit).await {
            Ok(messages) => messages,
            Err(e) => {
                logger::error(LogTag::Discovery, &format!("Message fetch failed: {}", e));
                return Vec::new();
            }
        };

        let mut channel_caps: HashMap<String, Option<f64>> = HashMap::new();
        let mut new_addresses: Vec<String> = Vec::new();
        let mut queued: HashSet<String> = HashSet::new();
        for listing in messages.iter().flat_map(|m| extract_listings(m)) {
            if self.seen.contains(&listing.address) || !queued.insert(listing.address.clone()) {
                continue;
            }
            channel_caps.insert(listing.address.clone(), listing.market_cap);
            new_addresses.push(listing.address);
        }

        logger::info(
            LogTag::Discovery,
            &format!(
                "{} messages, {} new addresses",
                messages.len(),
                new_addresses.len()
            ),
        );

        let mut coins = Vec::new();
        if !new_addresses.is_empty() {
            let attempts = self.config.dex_retry_attempts.max(1);
            for attempt in 1..=attempts {
                coins = self.qualify(&new_addresses, &channel_caps).await;
                if !coins.is_empty() {
                    break;
                }
                if attempt < attempts {
                    logger::warning(
                        LogTag::Discovery,
                        &format!(
                            "Attempt {} found no coin within market cap range, retrying in {}s",
                            attempt, self.config.dex_delay_secs
                        ),
                    );
                    tokio::time::sleep(Duration::from_secs(self.config.dex_delay_secs)).await;
                }
            }
        }

        self.seen.extend(new_addresses);
        if let Err(e) = self.seen.save() {
            logger::warning(LogTag::Discovery, &format!("Seen addresses not saved: {}", e));
        }

        coins
    }

    async fn qualify(
        &self,
        addresses: &[String],
        channel_caps: &HashMap<String, Option<f64>>,
    ) -> Vec<CoinData> {
        let infos = fetch_market_info(self.market.as_ref(), addresses).await;
        let mut coins = Vec::new();

        for address in addresses {
            let Some(info) = infos.get(address) else {
                continue;
            };

            if let Some(Some(stated)) = channel_caps.get(address) {
                logger::debug(
                    LogTag::Discovery,
                    &format!(
                        "{}: channel market cap ${:.0}, DexScreener ${:.0}",
                        address, stated, info.market_cap
                    ),
                );
            }

            if info.market_cap < self.config.min_market_cap
                || info.market_cap > self.config.max_market_cap
            {
                logger::debug(
                    LogTag::Discovery,
                    &format!(
                        "Market cap ${:.0} for {} is out of range",
                        info.market_cap, address
                    ),
                );
                continue;
            }

            let mut coin = CoinData::new(address.clone(), info.clone());
            coin.suspect_bundled = check_if_bundled(
                self.transfers.as_ref(),
                address,
                self.config.bundle_transfer_sample,
            )
            .await;
            coins.push(coin);
        }

        coins
    }
}
