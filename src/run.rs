//! Service wiring and the main discovery loop

use crate::{
    alerts::{
        AlertManager, AlertSink, AlertStore, PerformanceReporter, ReportOutcome, TelegramNotifier,
    },
    apis::{DexScreenerClient, RateLimiter, SolscanClient},
    coins::{CoinHolderPipeline, HolderFetcher, MarketDataSource},
    config::Config,
    database::{Database, DisabledCache, WalletCache},
    discovery::{CoinDiscovery, SeenAddresses, TelegramChannelSource},
    errors::HolderScanError,
    logger::{self, LogTag},
    paths,
    utils::check_shutdown_or_delay,
    wallets::{worker_count, HolderDispatcher, WalletClassifier},
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Everything one loop iteration needs
pub struct Services {
    pub discovery: CoinDiscovery,
    pub pipeline: CoinHolderPipeline,
    pub alerts: AlertManager,
    pub reporter: PerformanceReporter,
    pub limiter: Arc<RateLimiter>,
}

fn open_database(config: &Config) -> Result<Arc<Database>, HolderScanError> {
    let path = config.database.resolved_path();
    let db = Database::open(&path)
        .map_err(|e| HolderScanError::database(format!("open {}", path.display()), e))?;
    logger::info(
        LogTag::Cache,
        &format!("Database ready at {}", path.display()),
    );
    Ok(Arc::new(db))
}

/// Build the report service alone (used by `tool_alert_report`)
pub fn build_reporter(config: &Config) -> Result<PerformanceReporter, HolderScanError> {
    let db = open_database(config)?;
    let market: Arc<dyn MarketDataSource> = Arc::new(
        DexScreenerClient::new(&config.dexscreener)
            .map_err(|e| HolderScanError::invalid_config("dexscreener", e))?,
    );
    let sink: Arc<dyn AlertSink> = Arc::new(
        TelegramNotifier::new(&config.telegram.bot_token, &config.telegram.chat_id)
            .map_err(|e| HolderScanError::invalid_config("telegram", e))?,
    );

    Ok(PerformanceReporter::new(
        AlertStore::new(paths::get_alerts_directory()),
        paths::get_reports_directory(),
        market,
        sink,
        db,
        config.alerts.report_delay_hours,
    ))
}

pub fn build_services(config: &Config) -> Result<Services, HolderScanError> {
    // Solscan calls from every component share one budget
    let limiter = Arc::new(RateLimiter::new(
        config.dispatcher.max_requests,
        config.dispatcher.per_seconds,
    ));
    let solscan = Arc::new(
        SolscanClient::new(&config.solscan, limiter.clone())
            .map_err(|e| HolderScanError::invalid_config("solscan", e))?,
    );
    let dexscreener: Arc<dyn MarketDataSource> = Arc::new(
        DexScreenerClient::new(&config.dexscreener)
            .map_err(|e| HolderScanError::invalid_config("dexscreener", e))?,
    );
    let sink: Arc<dyn AlertSink> = Arc::new(
        TelegramNotifier::new(&config.telegram.bot_token, &config.telegram.chat_id)
            .map_err(|e| HolderScanError::invalid_config("telegram", e))?,
    );

    // The state table is always needed for the report date
    let db = open_database(config)?;
    let cache: Arc<dyn WalletCache> = if config.database.run_with_db {
        db.clone() as Arc<dyn WalletCache>
    } else {
        logger::warning(LogTag::Cache, "Running without wallet cache");
        Arc::new(DisabledCache)
    };

    let classifier = Arc::new(WalletClassifier::new(solscan.clone(), config.classifier.clone()));
    let workers = worker_count(&config.dispatcher);
    let dispatcher = HolderDispatcher::new(classifier, cache, Some(limiter.clone()), workers);
    let workers = dispatcher.workers();
    let fetcher = HolderFetcher::new(solscan.clone(), config.holders.clone());
    let pipeline = CoinHolderPipeline::new(fetcher, dispatcher);

    let source = Arc::new(
        TelegramChannelSource::new(&config.telegram.bot_token, &config.telegram.channel_username)
            .map_err(|e| HolderScanError::invalid_config("telegram.channel_username", e))?,
    );
    let seen = SeenAddresses::load(&paths::get_seen_addresses_path());
    let discovery = CoinDiscovery::new(
        source,
        dexscreener.clone(),
        solscan,
        seen,
        config.discovery.clone(),
    );

    let alerts = AlertManager::new(
        sink.clone(),
        AlertStore::new(paths::get_alerts_directory()),
        config.alerts.send_percent_threshold,
    );
    let reporter = PerformanceReporter::new(
        AlertStore::new(paths::get_alerts_directory()),
        paths::get_reports_directory(),
        dexscreener,
        sink,
        db,
        config.alerts.report_delay_hours,
    );

    logger::info(
        LogTag::System,
        &format!(
            "Services ready: {} workers, {} requests per {}s",
            workers, config.dispatcher.max_requests, config.dispatcher.per_seconds
        ),
    );

    Ok(Services {
        discovery,
        pipeline,
        alerts,
        reporter,
        limiter,
    })
}

/// One discovery, classification, alert and report pass
pub async fn run_cycle(services: &mut Services) {
    let coins = services.discovery.fetch_new_coins().await;
    logger::info(
        LogTag::System,
        &format!("Cycle started with {} new coins", coins.len()),
    );

    for coin in coins {
        let coin = services.pipeline.process(coin).await;
        services.alerts.evaluate(&coin, Utc::now()).await;
    }

    let now = Utc::now();
    match services.reporter.run_if_due(now.date_naive(), now).await {
        Ok(ReportOutcome::Sent(entries)) => logger::info(
            LogTag::Report,
            &format!("Performance report sent with {} entries", entries.len()),
        ),
        Ok(_) => {}
        Err(e) => logger::error(LogTag::Report, &format!("Report failed: {}", e)),
    }

    logger::debug(
        LogTag::Api,
        &format!(
            "Solscan requests so far: {}",
            services.limiter.total_acquired()
        ),
    );
}

/// Main loop; returns when Ctrl+C is received
pub async fn run(config: Config) -> Result<(), HolderScanError> {
    let mut services = build_services(&config)?;
    let shutdown = Arc::new(Notify::new());

    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            logger::warning(
                LogTag::System,
                "Shutdown signal received, stopping after the current cycle",
            );
            // notify_one keeps a permit if nobody is waiting yet
            signal.notify_one();
        }
    });

    let delay = Duration::from_secs(config.runner.loop_delay_secs);
    loop {
        run_cycle(&mut services).await;

        if check_shutdown_or_delay(&shutdown, delay).await {
            break;
        }
    }

    logger::info(LogTag::System, "holderscan stopped");
    Ok(())
}
