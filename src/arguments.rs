/// Centralized argument handling for holderscan
///
/// The bot takes no required arguments; configuration comes from the
/// environment. The stored arguments only drive the logger's debug flags and
/// the `--help` switch.
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
/// Used by binaries and tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

/// Print usage information
pub fn print_help() {
    println!("holderscan - fresh holder wallet alerts for newly listed tokens");
    println!();
    println!("USAGE:");
    println!("    holderscan [--debug-<module>] [--verbose] [--quiet] [--log-level=<level>]");
    println!();
    println!("All settings are read from the environment (a .env file is loaded first)");
    println!("and optionally from the TOML file named by HOLDERSCAN_CONFIG.");
    println!();
    println!("Required: SOLSCAN_API_KEY, BOT_TOKEN, CHAT_ID");
    println!();
    println!("DEBUG MODULES:");
    println!("    system config discovery market holders classifier cache");
    println!("    dispatcher alerts report api telegram");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_check_args() {
        set_cmd_args(vec!["holderscan".to_string(), "--help".to_string()]);
        assert!(is_help_requested());
        assert!(!has_arg("--verbose"));
        set_cmd_args(env::args().collect());
    }
}
