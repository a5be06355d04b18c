use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::Notify;

/// Format a USD amount with thousands separators and two decimals ("$12,345.67")
pub fn format_usd(amount: f64) -> String {
    if !amount.is_finite() {
        return "N/A".to_string();
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", sign, grouped, frac_part)
}

/// Format a token price without losing small magnitudes ("$0.00001234")
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "N/A".to_string();
    }
    if price.abs() >= 1.0 {
        return format!("${:.4}", price);
    }
    let formatted = format!("{:.10}", price);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("${}", trimmed)
}

/// Helper function to format duration in a compact way
pub fn format_duration_compact(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let duration = end.signed_duration_since(start);
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        format!("{}s", total_seconds)
    } else if total_seconds < 3600 {
        format!("{}m", total_seconds / 60)
    } else if total_seconds < 86400 {
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        if minutes > 0 {
            format!("{}h{}m", hours, minutes)
        } else {
            format!("{}h", hours)
        }
    } else {
        let days = total_seconds / 86400;
        let hours = (total_seconds % 86400) / 3600;
        if hours > 0 {
            format!("{}d{}h", days, hours)
        } else {
            format!("{}d", days)
        }
    }
}

/// Waits for either shutdown signal or delay. Returns true if shutdown was triggered.
pub async fn check_shutdown_or_delay(shutdown: &Notify, duration: Duration) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => false,
        _ = shutdown.notified() => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(999.5), "$999.50");
        assert_eq!(format_usd(1234.567), "$1,234.57");
        assert_eq!(format_usd(45_000.0), "$45,000.00");
        assert_eq!(format_usd(1_234_567.0), "$1,234,567.00");
        assert_eq!(format_usd(-2500.0), "-$2,500.00");
        assert_eq!(format_usd(f64::NAN), "N/A");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.00001234), "$0.00001234");
        assert_eq!(format_price(2.5), "$2.5000");
    }

    #[test]
    fn test_format_duration_compact() {
        let start = Utc.timestamp_opt(1_718_000_000, 0).unwrap();
        let at = |secs: i64| Utc.timestamp_opt(1_718_000_000 + secs, 0).unwrap();
        assert_eq!(format_duration_compact(start, at(42)), "42s");
        assert_eq!(format_duration_compact(start, at(5 * 60)), "5m");
        assert_eq!(format_duration_compact(start, at(2 * 3600 + 600)), "2h10m");
        assert_eq!(format_duration_compact(start, at(3 * 86400)), "3d");
        assert_eq!(format_duration_compact(start, at(-10)), "0s");
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_delay() {
        let shutdown = std::sync::Arc::new(Notify::new());
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.notify_waiters();
        });
        assert!(check_shutdown_or_delay(&shutdown, Duration::from_secs(60)).await);
        assert!(!check_shutdown_or_delay(&shutdown, Duration::from_secs(1)).await);
    }
}
