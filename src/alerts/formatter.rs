//! HTML message text for alerts and reports

use crate::alerts::report::PerformanceEntry;
use crate::alerts::summary::FreshnessSummary;
use crate::coins::CoinData;
use crate::utils::{format_duration_compact, format_price, format_usd};
use chrono::{DateTime, NaiveDate, Utc};
use teloxide::utils::html::escape;

/// Alert text for a coin whose holders look fresh
pub fn format_alert(coin: &CoinData, summary: &FreshnessSummary, now: DateTime<Utc>) -> String {
    let info = &coin.market_info;
    let name = if info.token_name.trim().is_empty() {
        "N/A".to_string()
    } else {
        escape(&info.token_name)
    };
    let age = info
        .created_at_utc
        .map(|created| format_duration_compact(created, now))
        .unwrap_or_else(|| "N/A".to_string());

    let lines = [
        format!("<strong>{}</strong>", name),
        String::new(),
        format!("<code>{}</code>", escape(&coin.coin_address)),
        String::new(),
        format!("🚀Market Cap: <strong>{}</strong>", format_usd(info.market_cap)),
        format!("💲Price: <strong>{}</strong>", format_price(info.price)),
        format!("💦Liquidity: <strong>{}</strong>", format_usd(info.liquidity)),
        format!("🕗Token Age: <strong>{}</strong>", age),
        format!("👥Holders: <strong>{}</strong>", summary.total),
        format!(
            "👀Fresh: <strong>{} ({:.2}%)</strong>",
            summary.fresh, summary.percent_fresh
        ),
        format!(
            "⛳Bundled: <strong>{}</strong>",
            if coin.suspect_bundled { "Yes" } else { "No" }
        ),
    ];

    lines.join("\n")
}

/// Daily performance summary over re-priced alerts
pub fn format_report(date: NaiveDate, entries: &[PerformanceEntry]) -> String {
    let mut lines = vec![format!(
        "<strong>📊 Alert performance {}</strong>",
        date.format("%Y-%m-%d")
    )];
    lines.push(String::new());

    for entry in entries {
        let arrow = if entry.percentage_change >= 0.0 {
            "🟢"
        } else {
            "🔴"
        };
        lines.push(format!(
            "{} <strong>{}</strong>: {} → {} ({:+.2}%)",
            arrow,
            escape(&entry.name),
            format_usd(entry.original_market_cap),
            format_usd(entry.new_market_cap),
            entry.percentage_change
        ));
    }

    if !entries.is_empty() {
        let average =
            entries.iter().map(|e| e.percentage_change).sum::<f64>() / entries.len() as f64;
        lines.push(String::new());
        lines.push(format!(
            "Average change over {} alerts: <strong>{:+.2}%</strong>",
            entries.len(),
            average
        ));
    }

    lines.join("\n")
}
