pub mod address;
pub mod aggregate;
pub mod engine;
pub mod geography;
pub mod sorter;

pub use crate::domain::model::{
    CityGraph, CityGroup, ClientRecord, ClientTotal, DailyRevenue, OrderView, ProductRecord, Report,
};
pub use crate::domain::ports::{ConfigProvider, ReportSink, ReportSource, Storage};
pub use crate::utils::error::Result;
