use crate::core::aggregate::order_table;
use crate::domain::model::{ClientRecord, ClientTotal, ProductRecord, Report};
use crate::domain::ports::{ReportSink, ReportSource, Storage};
use crate::utils::error::{ReportError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const TOP_CLIENTS_FILE: &str = "top_clients.csv";
pub const DAILY_REVENUE_FILE: &str = "daily_revenue.csv";
pub const ORDERS_FILE: &str = "orders.csv";
pub const REPORT_JSON_FILE: &str = "report.json";

#[derive(Debug, Serialize)]
struct Catalog {
    clients: Vec<ClientRecord>,
    products: Vec<ProductRecord>,
}

/// Writes all clients and products as one pretty-printed JSON document.
pub async fn export_data_to_json<R, S>(source: &R, storage: &S, path: &str) -> Result<usize>
where
    R: ReportSource + ?Sized,
    S: Storage,
{
    let catalog = Catalog {
        clients: source.list_all_clients().await?,
        products: source.list_all_products().await?,
    };
    let count = catalog.clients.len() + catalog.products.len();

    let json = serde_json::to_string_pretty(&catalog)?;
    storage.write_file(path, json.as_bytes()).await?;
    tracing::debug!("Exported {} records to {}", count, path);

    Ok(count)
}

/// One `name: total` line per client, totals with two decimals.
pub fn format_top_clients(top: &[ClientTotal]) -> String {
    top.iter()
        .map(|t| format!("{}: {:.2}", t.client_name, t.total))
        .collect::<Vec<_>>()
        .join("\n")
}

fn to_csv<T: Serialize>(rows: &[T], header: &[&str]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    // serialize() only emits a header once it sees a row
    if rows.is_empty() {
        writer.write_record(header)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.into_inner().map_err(|e| ReportError::ProcessingError {
        message: format!("Failed to flush CSV output: {}", e),
    })
}

/// Writes a report as CSV tables and/or JSON, optionally bundled into a zip.
pub struct ReportWriter<S: Storage> {
    storage: S,
    output_path: String,
    csv: bool,
    json: bool,
    archive: Option<String>,
}

impl<S: Storage> ReportWriter<S> {
    pub fn new(storage: S, output_path: String) -> Self {
        Self {
            storage,
            output_path,
            csv: true,
            json: true,
            archive: None,
        }
    }

    /// Enables the formats named in `formats` (`csv`, `json`) and disables the rest.
    pub fn with_formats(mut self, formats: &[String]) -> Self {
        self.csv = formats.iter().any(|f| f == "csv");
        self.json = formats.iter().any(|f| f == "json");
        self
    }

    pub fn with_archive(mut self, filename: Option<String>) -> Self {
        self.archive = filename;
        self
    }

    fn render(&self, report: &Report) -> Result<Vec<(&'static str, Vec<u8>)>> {
        let mut files = Vec::new();

        if self.csv {
            files.push((
                TOP_CLIENTS_FILE,
                to_csv(&report.top_clients, &["client_name", "total"])?,
            ));
            files.push((
                DAILY_REVENUE_FILE,
                to_csv(&report.daily_revenue, &["date", "total"])?,
            ));
            files.push((
                ORDERS_FILE,
                to_csv(
                    &order_table(&report.sorted_orders),
                    &["id", "client_name", "order_date", "total_cost", "items"],
                )?,
            ));
        }
        if self.json {
            files.push((REPORT_JSON_FILE, serde_json::to_vec_pretty(report)?));
        }

        Ok(files)
    }
}

#[async_trait]
impl<S: Storage> ReportSink for ReportWriter<S> {
    async fn write_report(&self, report: &Report) -> Result<String> {
        let files = self.render(report)?;
        tracing::debug!("Rendered {} report files", files.len());

        let Some(archive) = &self.archive else {
            for (name, data) in &files {
                self.storage.write_file(name, data).await?;
            }
            return Ok(self.output_path.clone());
        };

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, data) in &files {
                zip.start_file::<_, ()>(*name, FileOptions::default())?;
                zip.write_all(data)?;
            }
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(archive, &zip_data).await?;

        Ok(format!("{}/{}", self.output_path, archive))
    }
}
