/// Configuration schemas for holderscan
///
/// Every section is declared through `config_struct!`, so a TOML file may
/// omit any field and still deserialize.
use crate::config_struct;
use crate::wallets::WalletStatus;

// ============================================================================
// SOLSCAN
// ============================================================================

config_struct! {
    /// Solscan Pro API access
    pub struct SolscanConfig {
        /// Required, sent as the `token` header
        api_key: String = String::new(),
        base_url: String = "https://pro-api.solscan.io/v1.0".to_string(),
        request_timeout_secs: u64 = 30,
    }
}

// ============================================================================
// DEXSCREENER
// ============================================================================

config_struct! {
    /// DexScreener market data
    pub struct DexScreenerConfig {
        base_url: String = "https://api.dexscreener.com/latest/dex/tokens".to_string(),
        request_timeout_secs: u64 = 15,
        /// Maximum comma separated addresses per request
        max_tokens_per_request: usize = 30,
    }
}

// ============================================================================
// TELEGRAM
// ============================================================================

config_struct! {
    /// Telegram bot used for alerts and as the listing source
    pub struct TelegramConfig {
        bot_token: String = String::new(),
        /// Numeric id or @username of the alert chat
        chat_id: String = String::new(),
        /// Channel the listings are read from (without @)
        channel_username: String = String::new(),
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

config_struct! {
    /// Wallet freshness classification policy
    pub struct ClassifierConfig {
        skip_threshold: u64 = 200,
        fresh_wallet_hours: i64 = 24,
        page_size: u32 = 50,
        rate_limit_backoff_secs: u64 = 10,
        max_rate_limit_retries: u32 = 5,
        /// Status assigned once `skip_threshold` transactions were seen
        skip_status: WalletStatus = WalletStatus::Skipped,
        /// Status assigned by the same-timestamp heuristic on the first page
        bundle_status: WalletStatus = WalletStatus::Bundler,
        bundle_window: usize = 10,
        bundle_check_enabled: bool = true,
    }
}

// ============================================================================
// DISPATCHER
// ============================================================================

config_struct! {
    /// Concurrency and request budget for holder classification
    pub struct DispatcherConfig {
        reserved_cpus: usize = 1,
        /// 0 derives the worker count from available cores
        max_workers: usize = 0,
        max_requests: u32 = 1000,
        per_seconds: u64 = 60,
    }
}

// ============================================================================
// HOLDERS
// ============================================================================

config_struct! {
    /// Holder list fetching
    pub struct HoldersConfig {
        min_holder_count: usize = 10,
        /// 0 means no cap
        max_holders: usize = 0,
        holder_page_size: u32 = 50,
    }
}

// ============================================================================
// DISCOVERY
// ============================================================================

config_struct! {
    /// Channel scanning and market cap filtering
    pub struct DiscoveryConfig {
        min_market_cap: f64 = 20_000.0,
        max_market_cap: f64 = 300_000.0,
        dex_retry_attempts: u32 = 3,
        dex_delay_secs: u64 = 30,
        fetch_limit: usize = 100,
        /// Transfers inspected by the bundled launch check
        bundle_transfer_sample: u32 = 10,
    }
}

// ============================================================================
// ALERTS
// ============================================================================

config_struct! {
    /// Alert sending and performance reporting
    pub struct AlertsConfig {
        send_percent_threshold: f64 = 50.0,
        report_delay_hours: i64 = 6,
    }
}

// ============================================================================
// DATABASE
// ============================================================================

config_struct! {
    /// Wallet status cache
    pub struct DatabaseConfig {
        run_with_db: bool = true,
        /// Empty uses the default path under the data directory
        path: String = String::new(),
    }
}

// ============================================================================
// RUNNER
// ============================================================================

config_struct! {
    /// Main loop timing
    pub struct RunnerConfig {
        loop_delay_secs: u64 = 60,
    }
}

// ============================================================================
// ROOT
// ============================================================================

config_struct! {
    /// Complete holderscan configuration
    pub struct Config {
        solscan: SolscanConfig = SolscanConfig::default(),
        dexscreener: DexScreenerConfig = DexScreenerConfig::default(),
        telegram: TelegramConfig = TelegramConfig::default(),
        classifier: ClassifierConfig = ClassifierConfig::default(),
        dispatcher: DispatcherConfig = DispatcherConfig::default(),
        holders: HoldersConfig = HoldersConfig::default(),
        discovery: DiscoveryConfig = DiscoveryConfig::default(),
        alerts: AlertsConfig = AlertsConfig::default(),
        database: DatabaseConfig = DatabaseConfig::default(),
        runner: RunnerConfig = RunnerConfig::default(),
    }
}

impl DatabaseConfig {
    pub fn resolved_path(&self) -> std::path::PathBuf {
        if self.path.trim().is_empty() {
            crate::paths::get_database_path()
        } else {
            std::path::PathBuf::from(&self.path)
        }
    }
}
