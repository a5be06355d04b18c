use once_cell::sync::Lazy;
use regex::Regex;

/// Base58 alphabet (no 0, O, I, l), 32 to 44 characters
static SOLANA_ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").unwrap_or_else(|_| unreachable!())
});

/// Check a string against the Solana address format
pub fn is_valid_solana_address(address: &str) -> bool {
    SOLANA_ADDRESS_PATTERN.is_match(address)
}
