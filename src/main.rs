use holderscan::{
    arguments::{is_help_requested, print_help},
    config,
    logger::{self, LogTag},
    paths, run,
};

/// Main entry point for holderscan
///
/// Reads channel listings, classifies the holders of every new coin and
/// alerts when enough of them are fresh wallets. Runs until Ctrl+C.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if is_help_requested() {
        print_help();
        return Ok(());
    }

    // Logger needs the logs directory to create its file
    if let Err(e) = paths::ensure_all_directories() {
        eprintln!("❌ Failed to create required directories: {}", e);
        std::process::exit(1);
    }
    logger::init();

    logger::info(LogTag::System, "🚀 holderscan starting up...");

    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            logger::error(LogTag::Config, &format!("Configuration error: {}", e));
            logger::flush();
            std::process::exit(1);
        }
    };

    if let Err(e) = run::run(config).await {
        logger::error(LogTag::System, &format!("Fatal: {}", e));
        logger::flush();
        std::process::exit(1);
    }

    logger::flush();
    Ok(())
}
