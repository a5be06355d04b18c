//! Paged holder list fetching for a token

use crate::address::is_valid_solana_address;
use crate::config::HoldersConfig;
use crate::errors::ApiError;
use crate::logger::{self, LogTag};
use crate::wallets::Holder;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

/// Source of a token's holder owner addresses
#[async_trait]
pub trait HolderListing: Send + Sync {
    async fn holders_page(
        &self,
        token_address: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<String>, ApiError>;
}

pub struct HolderFetcher {
    listing: Arc<dyn HolderListing>,
    config: HoldersConfig,
}

impl HolderFetcher {
    pub fn new(listing: Arc<dyn HolderListing>, config: HoldersConfig) -> Self {
        Self { listing, config }
    }

    /// Valid, de-duplicated holders in fetch order
    ///
    /// Returns an empty list on any fetch failure or when fewer than
    /// `min_holder_count` holders were found.
    pub async fn fetch_holders(&self, token_address: &str) -> Vec<Holder> {
        let limit = self.config.holder_page_size.max(1);
        let max_holders = self.config.max_holders;
        let mut seen: HashSet<String> = HashSet::new();
        let mut holders: Vec<Holder> = Vec::new();
        let mut offset: u32 = 0;

        loop {
            let page = match self.listing.holders_page(token_address, offset, limit).await {
                Ok(page) => page,
                Err(e) => {
                    logger::error(
                        LogTag::Holders,
                        &format!("Holder fetch failed for {}: {}", token_address, e),
                    );
                    return Vec::new();
                }
            };

            if page.is_empty() {
                break;
            }

            let mut new_on_page = 0usize;
            for owner in page.iter() {
                if !seen.insert(owner.clone()) {
                    continue;
                }
                new_on_page += 1;
                if is_valid_solana_address(owner) {
                    holders.push(Holder::new(owner.clone()));
                }
            }

            if max_holders > 0 && holders.len() >= max_holders {
                holders.truncate(max_holders);
                break;
            }

            // an API that ignores the offset would otherwise loop forever
            if new_on_page == 0 {
                logger::warning(
                    LogTag::Holders,
                    &format!(
                        "Holder page at offset {} for {} repeated earlier owners, stopping",
                        offset, token_address
                    ),
                );
                break;
            }

            offset = offset.saturating_add(limit);
        }

        if holders.len() < self.config.min_holder_count {
            logger::info(
                LogTag::Holders,
                &format!(
                    "Token {} has {} holders, fewer than {}",
                    token_address,
                    holders.len(),
                    self.config.min_holder_count
                ),
            );
            return Vec::new();
        }

        logger::debug(
            LogTag::Holders,
            &format!("Fetched {} holders for {}", holders.len(), token_address),
        );
        holders
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serves `owners` in offset/limit slices
    pub struct StubListing {
        pub owners: Vec<String>,
        pub fail: bool,
        pub calls: Mutex<u32>,
    }

    impl StubListing {
        pub fn new(owners: &[&str]) -> Self {
            Self {
                owners: owners.iter().map(|s| s.to_string()).collect(),
                fail: false,
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl HolderListing for StubListing {
        async fn holders_page(
            &self,
            _token_address: &str,
            offset: u32,
            limit: u32,
        ) -> Result<Vec<String>, ApiError> {
            *self.calls.lock().unwrap() += 1;
            if self.fail {
                return Err(ApiError::from_status("token/holders", 500, None));
            }
            Ok(self
                .owners
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect())
        }
    }

    fn valid(i: usize) -> String {
        // 42 chars of base58
        format!("{}{:0>11}", "So11111111111111111111111111111", i)
            .replace('0', "2")
    }

    fn config(min: usize, max: usize, page: u32) -> HoldersConfig {
        HoldersConfig {
            min_holder_count: min,
            max_holders: max,
            holder_page_size: page,
        }
    }

    #[tokio::test]
    async fn test_filters_invalid_and_duplicates_across_pages() {
        let a = valid(1);
        let b = valid(2);
        let c = valid(3);
        let stub = StubListing::new(&[&a, "bad", &b, &a, &c]);
        let fetcher = HolderFetcher::new(Arc::new(stub), config(1, 0, 2));

        let holders = fetcher.fetch_holders("TOKEN").await;
        let addresses: Vec<&str> = holders.iter().map(|h| h.address.as_str()).collect();
        assert_eq!(addresses, vec![a.as_str(), b.as_str(), c.as_str()]);
    }

    #[tokio::test]
    async fn test_below_minimum_is_empty() {
        let a = valid(1);
        let stub = StubListing::new(&[&a]);
        let fetcher = HolderFetcher::new(Arc::new(stub), config(2, 0, 50));
        assert!(fetcher.fetch_holders("TOKEN").await.is_empty());
    }

    #[tokio::test]
    async fn test_max_holders_caps_paging() {
        let owners: Vec<String> = (1..=9).map(valid).collect();
        let refs: Vec<&str> = owners.iter().map(String::as_str).collect();
        let stub = Arc::new(StubListing::new(&refs));
        let fetcher = HolderFetcher::new(stub.clone(), config(1, 4, 3));

        let holders = fetcher.fetch_holders("TOKEN").await;
        assert_eq!(holders.len(), 4);
        assert_eq!(*stub.calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_empty() {
        let mut stub = StubListing::new(&[]);
        stub.fail = true;
        let fetcher = HolderFetcher::new(Arc::new(stub), config(0, 0, 50));
        assert!(fetcher.fetch_holders("TOKEN").await.is_empty());
    }
}
