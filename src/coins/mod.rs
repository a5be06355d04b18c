/// Coin records and the holder-freshness pipeline
///
/// - `types`: `CoinData`, `MarketInfo`
/// - `market`: DexScreener pair aggregation
/// - `holders`: paged holder list fetching
/// - `pipeline`: fetch holders, classify, attach
pub mod holders;
pub mod market;
pub mod pipeline;
pub mod types;

pub use holders::{HolderFetcher, HolderListing};
pub use market::{aggregate_market_info, fetch_market_info, MarketDataSource};
pub use pipeline::CoinHolderPipeline;
pub use types::{CoinData, MarketInfo};
