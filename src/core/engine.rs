use crate::core::address::CityExtractor;
use crate::core::aggregate::{daily_revenue, top_clients, DEFAULT_TOP_N};
use crate::core::geography::city_groups_and_graph;
use crate::core::sorter::{sort_orders_by, SortKey};
use crate::domain::model::{ClientRecord, OrderView, Report};
use crate::domain::ports::{ConfigProvider, ReportSink, ReportSource};
use crate::utils::error::Result;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub top_n: usize,
    pub sort_key: SortKey,
    pub descending: bool,
    pub extractor: CityExtractor,
}

impl ReportOptions {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Ok(Self {
            top_n: config.top_n(),
            sort_key: config.sort_by().parse()?,
            descending: config.descending(),
            extractor: CityExtractor::new(config.max_address_depth()),
        })
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            sort_key: SortKey::TotalCost,
            descending: true,
            extractor: CityExtractor::default(),
        }
    }
}

/// Runs every report view over one snapshot of orders and clients.
pub fn compute_report(orders: &[OrderView], clients: &[ClientRecord], options: &ReportOptions) -> Report {
    let (city_groups, graph) = city_groups_and_graph(clients, &options.extractor);

    Report {
        top_clients: top_clients(orders, options.top_n),
        daily_revenue: daily_revenue(orders),
        city_groups,
        graph,
        sorted_orders: sort_orders_by(orders, options.sort_key, options.descending),
    }
}

pub struct ReportEngine<S: ReportSource> {
    source: S,
    options: ReportOptions,
}

impl<S: ReportSource> ReportEngine<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, ReportOptions::default())
    }

    pub fn with_options(source: S, options: ReportOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    pub async fn build_report(&self) -> Result<Report> {
        let started = Instant::now();

        tracing::info!("Loading orders and clients...");
        let orders = self.source.list_all_orders().await?;
        let clients = self.source.list_all_clients().await?;
        tracing::info!("Loaded {} orders, {} clients", orders.len(), clients.len());

        let report = compute_report(&orders, &clients, &self.options);
        tracing::info!(
            "Report computed: {} top clients, {} days, {} cities, {} graph edges in {:?}",
            report.top_clients.len(),
            report.daily_revenue.len(),
            report.city_groups.len(),
            report.graph.edge_count(),
            started.elapsed()
        );

        Ok(report)
    }

    pub async fn run(&self, sink: &dyn ReportSink) -> Result<String> {
        let report = self.build_report().await?;

        tracing::info!("Writing report...");
        let location = sink.write_report(&report).await?;
        tracing::info!("Report saved to: {}", location);

        Ok(location)
    }
}
