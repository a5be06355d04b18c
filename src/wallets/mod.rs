/// Holder wallet classification
///
/// - `types`: `WalletStatus`, `Holder`, `TransactionRecord`
/// - `classifier`: per-wallet history paging and the cache-aware `check_holder`
/// - `dispatcher`: ordered, bounded-concurrency fan-out over many holders
pub mod classifier;
pub mod dispatcher;
pub mod types;

pub use classifier::{TransactionHistory, WalletClassifier};
pub use dispatcher::{worker_count, DispatchStats, HolderDispatcher};
pub use types::{Classification, Holder, TransactionRecord, WalletStatus};
