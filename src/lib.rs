pub mod address;
pub mod alerts;
pub mod apis;
pub mod arguments;
pub mod coins;
pub mod config;
pub mod database;
pub mod discovery;
pub mod errors;
pub mod logger;
pub mod paths;
pub mod run;
pub mod utils;
pub mod wallets;
