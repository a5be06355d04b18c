//! Run the alert performance report once and exit
//!
//! Usage: tool_alert_report [--force] [--debug-report]
//!
//! `--force` ignores the stored last report date.

use anyhow::{anyhow, Result};
use chrono::Utc;
use holderscan::{
    alerts::ReportOutcome,
    arguments::has_arg,
    config,
    database::{Database, LAST_REPORT_DATE_KEY},
    logger::{self, LogTag},
    paths, run,
};

#[tokio::main]
async fn main() -> Result<()> {
    paths::ensure_all_directories().map_err(|e| anyhow!(e))?;
    logger::init();

    let config = config::load_config()?;

    if has_arg("--force") {
        let db = Database::open(&config.database.resolved_path())?;
        db.set_state(LAST_REPORT_DATE_KEY, "")?;
        logger::info(LogTag::Report, "Cleared last report date");
    }

    let reporter = run::build_reporter(&config)?;
    let now = Utc::now();
    let outcome = reporter
        .run_if_due(now.date_naive(), now)
        .await
        .map_err(|e| anyhow!(e))?;

    match outcome {
        ReportOutcome::AlreadySent => println!("Report for {} was already sent", now.date_naive()),
        ReportOutcome::NothingDue => println!("No alerts due for reporting"),
        ReportOutcome::Sent(entries) => {
            println!("Reported {} alerts:", entries.len());
            for entry in entries {
                println!(
                    "  {:<20} {:>14.2} -> {:>14.2} ({:+.2}%)",
                    entry.name,
                    entry.original_market_cap,
                    entry.new_market_cap,
                    entry.percentage_change
                );
            }
        }
    }

    logger::flush();
    Ok(())
}
