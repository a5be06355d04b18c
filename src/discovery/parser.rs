//! Listing extraction from channel message text
//!
//! Format drift yields no listings, never an error.

use crate::address::is_valid_solana_address;
use once_cell::sync::Lazy;
use regex::Regex;

/// Token address announced in a channel message
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelListing {
    pub address: String,
    /// Market cap stated in the same message, if any
    pub market_cap: Option<f64>,
}

static MINT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bmint\b[^:=]*[:=]\s*`?\s*([1-9A-HJ-NP-Za-km-z]{32,44})\s*`?")
        .unwrap_or_else(|_| unreachable!())
});

static MARKET_CAP_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)market\s*cap[^0-9$]*\$?\s*([0-9][0-9,]*(?:\.[0-9]+)?)\s*([kmb])?\b")
        .unwrap_or_else(|_| unreachable!())
});

/// Extract every announced address from one message
pub fn extract_listings(text: &str) -> Vec<ChannelListing> {
    let mut addresses: Vec<String> = Vec::new();
    let mut market_cap: Option<f64> = None;

    for line in text.lines() {
        if let Some(address) = address_from_line(line) {
            if !addresses.contains(&address) {
                addresses.push(address);
            }
            continue;
        }

        if market_cap.is_none() {
            market_cap = market_cap_from_line(line);
        }
    }

    addresses
        .into_iter()
        .map(|address| ChannelListing {
            address,
            market_cap,
        })
        .collect()
}

fn address_from_line(line: &str) -> Option<String> {
    if let Some(caps) = MINT_LINE.captures(line) {
        let candidate = caps.get(1)?.as_str();
        if is_valid_solana_address(candidate) {
            return Some(candidate.to_string());
        }
    }

    let stripped = line.trim().trim_matches('`').trim();
    if stripped.ends_with("pump") && is_valid_solana_address(stripped) {
        return Some(stripped.to_string());
    }

    None
}

fn market_cap_from_line(line: &str) -> Option<f64> {
    let caps = MARKET_CAP_LINE.captures(line)?;
    let number: f64 = caps.get(1)?.as_str().replace(',', "").parse().ok()?;
    let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(ref s) if s == "k" => 1_000.0,
        Some(ref s) if s == "m" => 1_000_000.0,
        Some(ref s) if s == "b" => 1_000_000_000.0,
        _ => 1.0,
    };
    Some(number * multiplier)
}
