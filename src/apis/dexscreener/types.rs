/// DexScreener response types
use serde::Deserialize;

/// `latest/dex/tokens/{addresses}` response; `pairs` is null for unknown tokens
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensResponse {
    #[serde(default)]
    pub schema_version: Option<String>,
    #[serde(default)]
    pub pairs: Option<Vec<DexScreenerPairRaw>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexScreenerPairRaw {
    pub chain_id: Option<String>,
    pub dex_id: Option<String>,
    pub pair_address: Option<String>,
    pub base_token: Option<TokenInfo>,
    pub price_usd: Option<String>,
    pub liquidity: Option<LiquidityData>,
    pub fdv: Option<f64>,
    pub market_cap: Option<f64>,
    /// Milliseconds since epoch
    pub pair_created_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    pub address: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiquidityData {
    pub usd: Option<f64>,
    pub base: Option<f64>,
    pub quote: Option<f64>,
}

/// Flattened pair used by market aggregation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DexPair {
    pub base_token_address: String,
    pub base_token_name: String,
    pub pair_address: String,
    pub fdv: Option<f64>,
    pub liquidity_usd: Option<f64>,
    pub price_usd: Option<f64>,
    pub pair_created_at_ms: Option<i64>,
}

impl DexScreenerPairRaw {
    pub fn to_pair(&self) -> DexPair {
        let mut pair = DexPair::default();

        if let Some(ref base) = self.base_token {
            pair.base_token_address = base.address.clone().unwrap_or_default();
            pair.base_token_name = base.name.clone().unwrap_or_default();
        }

        pair.pair_address = self.pair_address.clone().unwrap_or_default();
        pair.fdv = self.fdv.or(self.market_cap);
        pair.liquidity_usd = self.liquidity.as_ref().and_then(|l| l.usd);
        pair.price_usd = self
            .price_usd
            .as_deref()
            .and_then(|p| p.trim().parse::<f64>().ok());
        pair.pair_created_at_ms = self.pair_created_at;
        pair
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_pairs() {
        let parsed: TokensResponse =
            serde_json::from_str(r#"{"schemaVersion":"1.0.0","pairs":null}"#).unwrap();
        assert!(parsed.pairs.is_none());
    }

    #[test]
    fn test_pair_flattening() {
        let raw = r#"{
            "chainId": "solana",
            "dexId": "raydium",
            "pairAddress": "PAIR1",
            "baseToken": {"address": "TOKEN1", "name": "Frog", "symbol": "FRG"},
            "priceUsd": "0.0001234",
            "liquidity": {"usd": 15000.5, "base": 1, "quote": 2},
            "fdv": 45000,
            "pairCreatedAt": 1718000000000
        }"#;
        let pair = serde_json::from_str::<DexScreenerPairRaw>(raw)
            .unwrap()
            .to_pair();
        assert_eq!(pair.base_token_address, "TOKEN1");
        assert_eq!(pair.base_token_name, "Frog");
        assert_eq!(pair.fdv, Some(45000.0));
        assert_eq!(pair.liquidity_usd, Some(15000.5));
        assert_eq!(pair.price_usd, Some(0.0001234));
        assert_eq!(pair.pair_created_at_ms, Some(1718000000000));
    }
}
