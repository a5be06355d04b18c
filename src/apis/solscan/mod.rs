/// Solscan Pro API v1.0 client
///
/// Endpoints used:
/// 1. `account/transactions` - paged wallet history (newest first)
/// 2. `token/holders` - paged holder list for a token
/// 3. `token/transfer` - latest transfers of a token
///
/// Authentication is the `token` header. Every call takes one unit from the
/// shared rate limiter.
pub mod types;

pub use self::types::{AccountTransaction, TokenHoldersResponse, TokenTransfersResponse};

use crate::apis::client::{HttpClient, RateLimiter};
use crate::coins::holders::HolderListing;
use crate::config::SolscanConfig;
use crate::discovery::TransferHistory;
use crate::errors::ApiError;
use crate::wallets::classifier::TransactionHistory;
use crate::wallets::TransactionRecord;
use async_trait::async_trait;
use std::sync::Arc;

const ENDPOINT_ACCOUNT_TRANSACTIONS: &str = "account/transactions";
const ENDPOINT_TOKEN_HOLDERS: &str = "token/holders";
const ENDPOINT_TOKEN_TRANSFER: &str = "token/transfer";

pub struct SolscanClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
    limiter: Arc<RateLimiter>,
}

impl SolscanClient {
    pub fn new(config: &SolscanConfig, limiter: Arc<RateLimiter>) -> Result<Self, String> {
        if config.api_key.trim().is_empty() {
            return Err("Solscan API key is empty".to_string());
        }

        let base_url = url::Url::parse(&config.base_url)
            .map_err(|e| format!("Invalid Solscan base URL '{}': {}", config.base_url, e))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(format!("Solscan base URL must be http(s): {}", config.base_url));
        }

        Ok(Self {
            http: HttpClient::new(config.request_timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            limiter,
        })
    }

    fn request(&self, endpoint: &str, query: &[(&str, String)]) -> reqwest::RequestBuilder {
        self.http
            .client()
            .get(format!("{}/{}", self.base_url, endpoint))
            .header("accept", "application/json")
            .header("token", &self.api_key)
            .query(query)
    }

    /// One page of an account's transactions, newest first
    pub async fn get_account_transactions(
        &self,
        account: &str,
        limit: u32,
        before_hash: Option<&str>,
    ) -> Result<Vec<AccountTransaction>, ApiError> {
        let mut query = vec![
            ("account", account.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(hash) = before_hash {
            query.push(("beforeHash", hash.to_string()));
        }

        let builder = self.request(ENDPOINT_ACCOUNT_TRANSACTIONS, &query);
        self.http
            .get_json(ENDPOINT_ACCOUNT_TRANSACTIONS, builder, Some(&self.limiter))
            .await
    }

    /// One page of token holders
    pub async fn get_token_holders(
        &self,
        token_address: &str,
        offset: u32,
        limit: u32,
    ) -> Result<TokenHoldersResponse, ApiError> {
        let query = [
            ("tokenAddress", token_address.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        let builder = self.request(ENDPOINT_TOKEN_HOLDERS, &query);
        self.http
            .get_json(ENDPOINT_TOKEN_HOLDERS, builder, Some(&self.limiter))
            .await
    }

    /// Latest transfers of a token, newest first
    pub async fn get_token_transfers(
        &self,
        token_address: &str,
        limit: u32,
    ) -> Result<TokenTransfersResponse, ApiError> {
        let query = [
            ("tokenAddress", token_address.to_string()),
            ("limit", limit.to_string()),
        ];
        let builder = self.request(ENDPOINT_TOKEN_TRANSFER, &query);
        self.http
            .get_json(ENDPOINT_TOKEN_TRANSFER, builder, Some(&self.limiter))
            .await
    }
}

#[async_trait]
impl TransactionHistory for SolscanClient {
    async fn transactions_page(
        &self,
        address: &str,
        limit: u32,
        before: Option<&str>,
    ) -> Result<Vec<TransactionRecord>, ApiError> {
        let page = self.get_account_transactions(address, limit, before).await?;
        Ok(page
            .into_iter()
            .map(|tx| TransactionRecord {
                tx_hash: tx.tx_hash,
                block_time: tx.block_time,
            })
            .collect())
    }
}

#[async_trait]
impl HolderListing for SolscanClient {
    async fn holders_page(
        &self,
        token_address: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<String>, ApiError> {
        let response = self.get_token_holders(token_address, offset, limit).await?;
        Ok(response.data.into_iter().map(|h| h.owner).collect())
    }
}

#[async_trait]
impl TransferHistory for SolscanClient {
    async fn transfer_block_times(
        &self,
        token_address: &str,
        limit: u32,
    ) -> Result<Vec<i64>, ApiError> {
        let response = self.get_token_transfers(token_address, limit).await?;
        Ok(response.items.into_iter().map(|t| t.block_time).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_api_key() {
        let config = SolscanConfig::default();
        let limiter = Arc::new(RateLimiter::new(10, 60));
        assert!(SolscanClient::new(&config, limiter).is_err());
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let limiter = Arc::new(RateLimiter::new(10, 60));
        for base_url in ["not a url", "ftp://pro-api.solscan.io/v1.0"] {
            let config = SolscanConfig {
                api_key: "key".to_string(),
                base_url: base_url.to_string(),
                ..SolscanConfig::default()
            };
            assert!(SolscanClient::new(&config, limiter.clone()).is_err());
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = SolscanConfig {
            api_key: "key".to_string(),
            base_url: "https://pro-api.solscan.io/v1.0/".to_string(),
            ..SolscanConfig::default()
        };
        let client = SolscanClient::new(&config, Arc::new(RateLimiter::new(10, 60))).unwrap();
        let request = client
            .request(ENDPOINT_TOKEN_HOLDERS, &[("limit", "50".to_string())])
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://pro-api.solscan.io/v1.0/token/holders?limit=50"
        );
        assert_eq!(request.headers().get("token").unwrap(), "key");
    }
}
