pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{AddOrderArgs, CliConfig, Command, ReportArgs};

pub use adapters::{csv_source::CsvDataSource, export::ReportWriter, storage::LocalStorage};
pub use config::ReportConfig;
pub use core::address::{extract_city, extract_city_default, CityExtractor};
pub use core::aggregate::{daily_revenue, top_clients};
pub use core::engine::{ReportEngine, ReportOptions};
pub use core::geography::group_by_city;
pub use core::sorter::{sort_orders, SortKey};
pub use utils::error::{ReportError, Result};
