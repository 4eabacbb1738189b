//! Command-line front end

pub mod commands;
pub mod config;
pub mod error;

pub use config::CliConfig;
pub use error::CliError;
