// Adapters layer: concrete implementations of the domain ports (storage, CSV tables, report output).

pub mod csv_source;
pub mod export;
pub mod import;
pub mod storage;
