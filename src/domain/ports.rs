use crate::domain::model::{ClientRecord, OrderView, ProductRecord, Report};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn output_path(&self) -> &str;
    fn top_n(&self) -> usize;
    fn sort_by(&self) -> &str;
    fn descending(&self) -> bool;
    fn max_address_depth(&self) -> usize;
}

/// Hands the reporting core plain, already-joined records.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn list_all_orders(&self) -> Result<Vec<OrderView>>;
    async fn list_all_clients(&self) -> Result<Vec<ClientRecord>>;
    async fn list_all_products(&self) -> Result<Vec<ProductRecord>>;
}

/// Consumes a finished report. Returns where it ended up.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn write_report(&self, report: &Report) -> Result<String>;
}
