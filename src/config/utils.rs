use super::schemas::Config;
/// Configuration utilities - loading and environment overrides
///
/// Loading order:
/// 1. Schema defaults
/// 2. Optional TOML file named by `HOLDERSCAN_CONFIG`
/// 3. Environment variables (after `.env` is applied by dotenv)
use crate::errors::ConfigurationError;
use std::fmt::Display;
use std::str::FromStr;

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "HOLDERSCAN_CONFIG";

/// Keys that must be non-empty after all layers are applied
pub const REQUIRED_KEYS: [&str; 3] = ["SOLSCAN_API_KEY", "BOT_TOKEN", "CHAT_ID"];

/// Load configuration from the process environment
///
/// Reads `.env` first, then the optional TOML file, then applies overrides.
pub fn load_config() -> Result<Config, ConfigurationError> {
    dotenv::dotenv().ok();

    let file_contents = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => {
            let contents =
                std::fs::read_to_string(&path).map_err(|e| ConfigurationError::FileRead {
                    path: path.clone(),
                    error: e.to_string(),
                })?;
            Some(contents)
        }
        _ => None,
    };

    load_from_lookup(file_contents.as_deref(), |key| std::env::var(key).ok())
}

/// Build a configuration from optional TOML text and a variable lookup
///
/// The lookup stands in for the process environment so loading is testable.
pub fn load_from_lookup<F>(toml_text: Option<&str>, lookup: F) -> Result<Config, ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match toml_text {
        Some(text) => toml::from_str::<Config>(text).map_err(|e| {
            ConfigurationError::InvalidConfig {
                field: CONFIG_PATH_ENV.to_string(),
                reason: e.to_string(),
            }
        })?,
        None => Config::default(),
    };

    apply_env_overrides(&mut config, &lookup)?;
    validate_required(&config)?;
    Ok(config)
}

/// Apply every known environment override onto `config`
pub fn apply_env_overrides<F>(config: &mut Config, lookup: &F) -> Result<(), ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    // Solscan
    override_string(lookup, "SOLSCAN_API_KEY", &mut config.solscan.api_key);

    // Classifier
    override_parsed(lookup, "SKIP_THRESHOLD", &mut config.classifier.skip_threshold)?;
    override_parsed(lookup, "FRESH_WALLET_HOURS", &mut config.classifier.fresh_wallet_hours)?;
    override_parsed(lookup, "PAGE_SIZE", &mut config.classifier.page_size)?;
    override_parsed(
        lookup,
        "RATE_LIMIT_BACKOFF_SECS",
        &mut config.classifier.rate_limit_backoff_secs,
    )?;
    override_parsed(
        lookup,
        "MAX_RATE_LIMIT_RETRIES",
        &mut config.classifier.max_rate_limit_retries,
    )?;
    override_parsed(lookup, "SKIP_STATUS", &mut config.classifier.skip_status)?;
    override_parsed(lookup, "BUNDLE_STATUS", &mut config.classifier.bundle_status)?;
    override_parsed(lookup, "BUNDLE_WINDOW", &mut config.classifier.bundle_window)?;
    override_bool(
        lookup,
        "BUNDLE_CHECK_ENABLED",
        &mut config.classifier.bundle_check_enabled,
    )?;

    // Dispatcher
    override_parsed(lookup, "RESERVED_CPUS", &mut config.dispatcher.reserved_cpus)?;
    override_parsed(lookup, "MAX_WORKERS", &mut config.dispatcher.max_workers)?;
    override_parsed(lookup, "MAX_REQUESTS", &mut config.dispatcher.max_requests)?;
    override_parsed(lookup, "PER_SECONDS", &mut config.dispatcher.per_seconds)?;

    // Holders
    override_parsed(lookup, "MIN_HOLDER_COUNT", &mut config.holders.min_holder_count)?;
    override_parsed(lookup, "MAX_HOLDERS", &mut config.holders.max_holders)?;
    override_parsed(lookup, "HOLDER_PAGE_SIZE", &mut config.holders.holder_page_size)?;

    // Discovery
    override_parsed(lookup, "MIN_MARKET_CAP", &mut config.discovery.min_market_cap)?;
    override_parsed(lookup, "MAX_MARKET_CAP", &mut config.discovery.max_market_cap)?;
    override_parsed(lookup, "DEX_RETRY_ATTEMPTS", &mut config.discovery.dex_retry_attempts)?;
    override_parsed(lookup, "DEX_DELAY_SEC", &mut config.discovery.dex_delay_secs)?;
    override_parsed(lookup, "FETCH_LIMIT", &mut config.discovery.fetch_limit)?;

    // Telegram
    override_string(lookup, "BOT_TOKEN", &mut config.telegram.bot_token);
    override_string(lookup, "CHAT_ID", &mut config.telegram.chat_id);
    override_string(
        lookup,
        "CHANNEL_USERNAME",
        &mut config.telegram.channel_username,
    );

    // Alerts
    override_parsed(
        lookup,
        "SEND_PERCENT_THRESHOLD",
        &mut config.alerts.send_percent_threshold,
    )?;
    override_parsed(lookup, "REPORT_DELAY_HOURS", &mut config.alerts.report_delay_hours)?;

    // Database
    override_bool(lookup, "RUN_WITH_DB", &mut config.database.run_with_db)?;
    override_string(lookup, "DB_PATH", &mut config.database.path);

    // Runner
    override_parsed(lookup, "LOOP_DELAY", &mut config.runner.loop_delay_secs)?;

    Ok(())
}

/// Fail on the first missing required key
pub fn validate_required(config: &Config) -> Result<(), ConfigurationError> {
    let values = [
        (REQUIRED_KEYS[0], &config.solscan.api_key),
        (REQUIRED_KEYS[1], &config.telegram.bot_token),
        (REQUIRED_KEYS[2], &config.telegram.chat_id),
    ];

    for (key, value) in values {
        if value.trim().is_empty() {
            return Err(ConfigurationError::MissingConfig {
                field: key.to_string(),
            });
        }
    }

    if config.discovery.min_market_cap > config.discovery.max_market_cap {
        return Err(ConfigurationError::InvalidConfig {
            field: "MIN_MARKET_CAP".to_string(),
            reason: "must not exceed MAX_MARKET_CAP".to_string(),
        });
    }

    Ok(())
}

// ============================================================================
// OVERRIDE HELPERS
// ============================================================================

fn override_string<F>(lookup: &F, key: &str, target: &mut String)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(key) {
        *target = value.trim().to_string();
    }
}

fn override_parsed<F, T>(lookup: &F, key: &str, target: &mut T) -> Result<(), ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    if let Some(raw) = lookup(key) {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(());
        }
        *target = raw
            .parse::<T>()
            .map_err(|e| ConfigurationError::InvalidConfig {
                field: key.to_string(),
                reason: format!("'{}': {}", raw, e),
            })?;
    }
    Ok(())
}

fn override_bool<F>(lookup: &F, key: &str, target: &mut bool) -> Result<(), ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(key) {
        *target = match raw.trim().to_ascii_lowercase().as_str() {
            "" => return Ok(()),
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            other => {
                return Err(ConfigurationError::InvalidConfig {
                    field: key.to_string(),
                    reason: format!("'{}' is not a boolean", other),
                })
            }
        };
    }
    Ok(())
}
