use clap::Parser;
use order_report::adapters::export::{export_data_to_json, format_top_clients};
use order_report::adapters::import::import_clients;
use order_report::core::engine::compute_report;
use order_report::domain::ports::{ConfigProvider, ReportSink, ReportSource};
use order_report::utils::error::ErrorSeverity;
use order_report::utils::{logger, validation::Validate};
use order_report::{
    AddOrderArgs, CliConfig, Command, CsvDataSource, LocalStorage, ReportArgs, ReportConfig,
    ReportEngine, ReportError, ReportOptions, ReportWriter,
};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting order-report");
    tracing::debug!("CLI config: {:?}", cli);

    let result = match &cli.command {
        Command::Report(args) => run_report(&cli, args).await,
        Command::ImportClients { file, data_dir } => {
            run_import(&cli, file, data_dir.as_deref()).await
        }
        Command::ExportJson { file, data_dir } => run_export(&cli, file, data_dir.as_deref()).await,
        Command::AddClient {
            name,
            email,
            phone,
            address,
            data_dir,
        } => {
            run_add_client(&cli, data_dir.as_deref(), name, email, phone, address.as_deref()).await
        }
        Command::AddProduct {
            name,
            price,
            data_dir,
        } => run_add_product(&cli, data_dir.as_deref(), name, *price).await,
        Command::AddOrder(args) => run_add_order(&cli, args).await,
    };

    if let Err(e) = result {
        tracing::error!(
            "order-report failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("{}", e.user_friendly_message());
        eprintln!("Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

fn load_config(cli: &CliConfig, data_dir: Option<&str>) -> Result<ReportConfig, ReportError> {
    let config = cli.base_config(data_dir)?;
    config.validate()?;
    tracing::info!("Configuration loaded and validated");
    Ok(config)
}

fn csv_source(config: &ReportConfig) -> CsvDataSource<LocalStorage> {
    CsvDataSource::with_tables(
        LocalStorage::new(config.data_dir().to_string()),
        config.tables(),
    )
}

async fn run_report(cli: &CliConfig, args: &ReportArgs) -> Result<(), ReportError> {
    let mut config = cli.base_config(args.data_dir.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    tracing::info!("Data directory: {}", config.data_dir());
    tracing::info!(
        "Top {} clients, orders sorted by {} ({})",
        config.top_n(),
        config.sort_by(),
        if config.descending() { "descending" } else { "ascending" }
    );

    let options = ReportOptions::from_config(&config)?;
    let source = csv_source(&config);

    if args.dry_run {
        tracing::info!("DRY RUN MODE - no files will be written");
        let orders = source.list_all_orders().await?;
        let clients = source.list_all_clients().await?;
        let report = compute_report(&orders, &clients, &options);
        println!("{}", format_top_clients(&report.top_clients));
        return Ok(());
    }

    let writer = ReportWriter::new(
        LocalStorage::new(config.output_path().to_string()),
        config.output_path().to_string(),
    )
    .with_formats(config.output_formats())
    .with_archive(config.archive_name());

    let engine = ReportEngine::with_options(source, options);
    let report = engine.build_report().await?;
    let location = writer.write_report(&report).await?;

    println!("Top clients:");
    println!("{}", format_top_clients(&report.top_clients));
    println!("Report saved to: {}", location);
    Ok(())
}

async fn run_import(cli: &CliConfig, file: &str, data_dir: Option<&str>) -> Result<(), ReportError> {
    let config = load_config(cli, data_dir)?;
    let data = std::fs::read(file)?;

    let summary = import_clients(&csv_source(&config), &data).await?;
    println!(
        "Imported {} clients, skipped {} rows",
        summary.imported, summary.skipped
    );
    Ok(())
}

async fn run_export(cli: &CliConfig, file: &str, data_dir: Option<&str>) -> Result<(), ReportError> {
    let config = load_config(cli, data_dir)?;
    let target = Path::new(file);
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ReportError::InvalidConfigValueError {
            field: "file".to_string(),
            value: file.to_string(),
            reason: "Export target must be a file path".to_string(),
        })?;

    let storage = LocalStorage::new(dir.to_string_lossy().into_owned());
    let count = export_data_to_json(&csv_source(&config), &storage, name).await?;
    println!("Exported {} records to {}", count, file);
    Ok(())
}

async fn run_add_client(
    cli: &CliConfig,
    data_dir: Option<&str>,
    name: &str,
    email: &str,
    phone: &str,
    address: Option<&str>,
) -> Result<(), ReportError> {
    let config = load_config(cli, data_dir)?;
    let id = csv_source(&config)
        .add_client(name, email, phone, address)
        .await?;
    println!("Added client {}", id);
    Ok(())
}

async fn run_add_product(
    cli: &CliConfig,
    data_dir: Option<&str>,
    name: &str,
    price: f64,
) -> Result<(), ReportError> {
    let config = load_config(cli, data_dir)?;
    let id = csv_source(&config).add_product(name, price).await?;
    println!("Added product {}", id);
    Ok(())
}

async fn run_add_order(cli: &CliConfig, args: &AddOrderArgs) -> Result<(), ReportError> {
    let config = load_config(cli, args.data_dir.as_deref())?;
    let lines = args.lines()?;
    let order_date = args.order_date()?;

    let id = csv_source(&config)
        .add_order(args.client, order_date, &lines)
        .await?;
    println!("Added order {} with {} products", id, lines.len());
    Ok(())
}
