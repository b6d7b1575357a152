#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{AddOrderArgs, CliConfig, Command, ReportArgs};
pub use toml_config::ReportConfig;
