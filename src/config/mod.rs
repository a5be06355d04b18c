/// Configuration for holderscan
///
/// - `macros`: the `config_struct!` declaration macro
/// - `schemas`: every config section with its defaults
/// - `utils`: loading from TOML and environment variables
///
/// The loaded `Config` is built once at startup and passed by reference.
pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::*;
pub use utils::{load_config, load_from_lookup, CONFIG_PATH_ENV, REQUIRED_KEYS};
