/// DexScreener API client
///
/// API Documentation: https://docs.dexscreener.com/api/reference
///
/// Only `latest/dex/tokens/{tokenAddresses}` is used: every pair for up to
/// 30 comma separated token addresses in one call.
pub mod types;

pub use self::types::{DexPair, DexScreenerPairRaw, TokensResponse};

use crate::apis::client::{HttpClient, RateLimiter};
use crate::coins::market::MarketDataSource;
use crate::config::DexScreenerConfig;
use crate::errors::ApiError;
use crate::logger::{self, LogTag};
use async_trait::async_trait;

/// Requests per minute allowed by DexScreener for the tokens endpoint
pub const RATE_LIMIT_TOKENS_PER_MINUTE: u32 = 300;

pub struct DexScreenerClient {
    http: HttpClient,
    base_url: String,
    max_tokens_per_request: usize,
    limiter: RateLimiter,
}

impl DexScreenerClient {
    pub fn new(config: &DexScreenerConfig) -> Result<Self, String> {
        if config.request_timeout_secs == 0 {
            return Err("Timeout must be greater than zero".to_string());
        }

        let base_url = url::Url::parse(&config.base_url)
            .map_err(|e| format!("Invalid DexScreener base URL '{}': {}", config.base_url, e))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(format!("DexScreener base URL must be http(s): {}", config.base_url));
        }

        Ok(Self {
            http: HttpClient::new(config.request_timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_tokens_per_request: config.max_tokens_per_request.max(1),
            limiter: RateLimiter::new(RATE_LIMIT_TOKENS_PER_MINUTE, 60),
        })
    }

    /// Fetch every pair for a batch of token addresses
    ///
    /// A `null` pairs field yields an empty list.
    pub async fn fetch_token_pairs(&self, addresses: &[String]) -> Result<Vec<DexPair>, ApiError> {
        if addresses.is_empty() {
            return Ok(Vec::new());
        }

        if addresses.len() > self.max_tokens_per_request {
            return Err(ApiError::HttpStatus {
                endpoint: "latest/dex/tokens".to_string(),
                status: 400,
                body: Some(format!(
                    "Too many addresses: {} (max {})",
                    addresses.len(),
                    self.max_tokens_per_request
                )),
            });
        }

        let url = format!("{}/{}", self.base_url, addresses.join(","));

        logger::debug(
            LogTag::Market,
            &format!("[DEXSCREENER] Fetching {} token addresses", addresses.len()),
        );

        let response: TokensResponse = self
            .http
            .get_json(
                "latest/dex/tokens",
                self.http
                    .client()
                    .get(&url)
                    .header("accept", "application/json"),
                Some(&self.limiter),
            )
            .await?;

        Ok(response
            .pairs
            .unwrap_or_default()
            .iter()
            .map(|p| p.to_pair())
            .collect())
    }
}

#[async_trait]
impl MarketDataSource for DexScreenerClient {
    fn max_batch_size(&self) -> usize {
        self.max_tokens_per_request
    }

    async fn token_pairs(&self, addresses: &[String]) -> Result<Vec<DexPair>, ApiError> {
        self.fetch_token_pairs(addresses).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_oversized_batch_rejected_without_request() {
        let config = DexScreenerConfig {
            max_tokens_per_request: 2,
            ..DexScreenerConfig::default()
        };
        let client = DexScreenerClient::new(&config).unwrap();
        let addresses: Vec<String> = (0..3).map(|i| format!("addr{}", i)).collect();
        assert!(client.fetch_token_pairs(&addresses).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_batch_is_empty() {
        let client = DexScreenerClient::new(&DexScreenerConfig::default()).unwrap();
        assert!(client.fetch_token_pairs(&[]).await.unwrap().is_empty());
    }
}
