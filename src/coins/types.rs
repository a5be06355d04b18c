use crate::wallets::Holder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Market snapshot of a token, aggregated across its trading pairs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketInfo {
    pub token_name: String,
    /// Average fully diluted valuation across pairs
    pub market_cap: f64,
    /// From the first pair seen
    pub liquidity: f64,
    /// From the first pair seen
    pub price: f64,
    #[serde(default)]
    pub created_at_utc: Option<DateTime<Utc>>,
}

/// A discovered token with its market data and classified holders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinData {
    pub coin_address: String,
    pub market_info: MarketInfo,
    #[serde(default)]
    pub suspect_bundled: bool,
    /// Fetch order is preserved through classification
    #[serde(default)]
    pub holders: Vec<Holder>,
}

impl CoinData {
    pub fn new(coin_address: impl Into<String>, market_info: MarketInfo) -> Self {
        Self {
            coin_address: coin_address.into(),
            market_info,
            suspect_bundled: false,
            holders: Vec::new(),
        }
    }
}

/// Running per-token accumulator used while aggregating pairs
#[derive(Debug, Clone, Default)]
pub struct DexMetric {
    pub total_fdv: f64,
    pub fdv_count: u32,
    pub liquidity: f64,
    pub price: f64,
    pub token_name: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl DexMetric {
    pub fn to_market_info(&self) -> MarketInfo {
        let market_cap = if self.fdv_count > 0 {
            self.total_fdv / self.fdv_count as f64
        } else {
            0.0
        };
        MarketInfo {
            token_name: self.token_name.clone(),
            market_cap,
            liquidity: self.liquidity,
            price: self.price,
            created_at_utc: self.created_at,
        }
    }
}
