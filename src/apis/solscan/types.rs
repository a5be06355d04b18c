/// Solscan Pro API v1.0 response types (only the fields holderscan reads)
use serde::Deserialize;

/// One entry of `account/transactions` (a bare JSON array)
#[derive(Debug, Clone, Deserialize)]
pub struct AccountTransaction {
    #[serde(rename = "blockTime")]
    pub block_time: i64,
    #[serde(rename = "txHash")]
    pub tx_hash: String,
}

/// `token/holders` response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenHoldersResponse {
    #[serde(default)]
    pub data: Vec<TokenHolder>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenHolder {
    pub owner: String,
}

/// `token/transfer` response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenTransfersResponse {
    #[serde(default)]
    pub items: Vec<TokenTransfer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenTransfer {
    #[serde(rename = "blockTime")]
    pub block_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_account_transactions() {
        let raw = r#"[
            {"blockTime": 1718000000, "slot": 1, "txHash": "abc", "status": "Success"},
            {"blockTime": 1717990000, "slot": 2, "txHash": "def", "status": "Success"}
        ]"#;
        let parsed: Vec<AccountTransaction> = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].tx_hash, "def");
        assert_eq!(parsed[0].block_time, 1718000000);
    }

    #[test]
    fn test_parse_holders_without_data() {
        let parsed: TokenHoldersResponse = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(parsed.data.is_empty());
    }
}
