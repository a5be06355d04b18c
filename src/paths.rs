//! Centralized path resolution for holderscan
//!
//! All file and directory paths are resolved through this module.
//!
//! ## Path Strategy
//!
//! The base directory is `$HOLDERSCAN_DATA_DIR` when set, otherwise the
//! platform data directory:
//! - **macOS**: `~/Library/Application Support/holderscan/`
//! - **Windows**: `%LOCALAPPDATA%\holderscan\`
//! - **Linux**: `$XDG_DATA_HOME/holderscan/` (fallback `~/.local/share/holderscan/`)
//!
//! ## Directory Structure
//!
//! ```text
//! holderscan/
//! ├── data/
//! │ ├── holderscan.db
//! │ └── seen_addresses.json
//! ├── alerts/
//! │ ├── <coin address>.json
//! │ └── reports/<date>.json
//! └── logs/
//!   └── holderscan_*.log
//! ```

use once_cell::sync::Lazy;
use std::path::PathBuf;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "HOLDERSCAN_DATA_DIR";

static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(resolve_base_directory);

fn resolve_base_directory() -> PathBuf {
  const APP_DIR: &str = "holderscan";

  if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
    if !dir.trim().is_empty() {
      return PathBuf::from(dir);
    }
  }

  if let Some(dir) = dirs::data_local_dir() {
    return dir.join(APP_DIR);
  }

  if let Some(home) = dirs::home_dir() {
    return home.join(APP_DIR);
  }

  PathBuf::from(APP_DIR)
}

// =============================================================================
// DIRECTORY ACCESSORS
// =============================================================================

/// Returns the base directory for all holderscan data
pub fn get_base_directory() -> PathBuf {
  BASE_DIRECTORY.clone()
}

/// Returns the data directory path (database, seen addresses)
pub fn get_data_directory() -> PathBuf {
  BASE_DIRECTORY.join("data")
}

/// Returns the logs directory path
pub fn get_logs_directory() -> PathBuf {
  BASE_DIRECTORY.join("logs")
}

/// Returns the directory holding one JSON record per sent alert
pub fn get_alerts_directory() -> PathBuf {
  BASE_DIRECTORY.join("alerts")
}

/// Returns the directory holding dated performance reports
pub fn get_reports_directory() -> PathBuf {
  get_alerts_directory().join("reports")
}

// =============================================================================
// FILE PATHS
// =============================================================================

/// Returns the SQLite database path (wallet cache + state)
pub fn get_database_path() -> PathBuf {
  get_data_directory().join("holderscan.db")
}

/// Returns the seen addresses file path
pub fn get_seen_addresses_path() -> PathBuf {
  get_data_directory().join("seen_addresses.json")
}

// =============================================================================
// DIRECTORY CREATION
// =============================================================================

/// Ensures all required directories exist
///
/// Must run before logger initialization since the logger opens its file in
/// the logs directory.
pub fn ensure_all_directories() -> Result<(), String> {
  let dirs_to_create = vec![
    ("base", get_base_directory()),
    ("data", get_data_directory()),
    ("logs", get_logs_directory()),
    ("alerts", get_alerts_directory()),
    ("reports", get_reports_directory()),
  ];

  for (name, dir) in dirs_to_create {
    if !dir.exists() {
      std::fs::create_dir_all(&dir).map_err(|e| {
        format!(
          "Failed to create {} directory at {}: {}",
          name,
          dir.display(),
          e
        )
      })?;
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_data_directory_is_subdir() {
    let base = get_base_directory();
    assert!(get_data_directory().starts_with(&base));
    assert!(get_logs_directory().starts_with(&base));
    assert!(get_alerts_directory().starts_with(&base));
  }

  #[test]
  fn test_files_in_data_dir() {
    let data = get_data_directory();
    assert!(get_database_path().starts_with(&data));
    assert_eq!(get_seen_addresses_path().file_name().unwrap(), "seen_addresses.json");
  }

  #[test]
  fn test_reports_inside_alerts() {
    assert!(get_reports_directory().starts_with(get_alerts_directory()));
  }
}
