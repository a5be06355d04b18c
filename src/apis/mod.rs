/// Third-party API clients
///
/// - `client`: shared HTTP wrapper and token-bucket rate limiter
/// - `solscan`: wallet history, holder lists and token transfers
/// - `dexscreener`: market data per token
pub mod client;
pub mod dexscreener;
pub mod solscan;

pub use client::{HttpClient, RateLimiter, SlidingWindowTracker};
pub use dexscreener::DexScreenerClient;
pub use solscan::SolscanClient;
