use crate::adapters::csv_source::parse_order_date;
use crate::config::toml_config::{CompressionConfig, ReportConfig};
use crate::utils::error::{ReportError, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "order-report")]
#[command(about = "Reports over client, product and order tables")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compute top clients, daily revenue, client geography and the sorted order table
    Report(ReportArgs),
    /// Validate clients from a CSV file and append them to the clients table
    ImportClients {
        /// CSV file with name,email,phone,address columns
        file: String,
        #[arg(long)]
        data_dir: Option<String>,
    },
    /// Export clients and products to a JSON file
    ExportJson {
        /// Destination JSON file
        file: String,
        #[arg(long)]
        data_dir: Option<String>,
    },
    /// Add one client to the clients table
    AddClient {
        name: String,
        email: String,
        phone: String,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        data_dir: Option<String>,
    },
    /// Add one product to the products table
    AddProduct {
        name: String,
        price: f64,
        #[arg(long)]
        data_dir: Option<String>,
    },
    /// Add an order with its product lines
    AddOrder(AddOrderArgs),
}

#[derive(Debug, Clone, Args)]
pub struct AddOrderArgs {
    /// Id of the ordering client
    #[arg(long)]
    pub client: i64,

    /// Product line as `ID` or `ID:QTY`, repeatable
    #[arg(long = "product", required = true)]
    pub products: Vec<String>,

    /// Order date, defaults to now
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub data_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ReportArgs {
    /// Directory holding clients.csv, products.csv, orders.csv and order_products.csv
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Directory the report files are written to
    #[arg(short, long)]
    pub output: Option<String>,

    /// Number of top clients to report
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Order field to sort the order table by
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort the order table ascending instead of descending
    #[arg(long)]
    pub ascending: bool,

    /// Bundle the report files into this zip archive
    #[arg(long)]
    pub zip: Option<String>,

    /// Print the report without writing any files
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// Loads the config file when given, otherwise starts from defaults for `data_dir`.
    pub fn base_config(&self, data_dir: Option<&str>) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::from_file(path)?,
            None => {
                let dir = data_dir.ok_or_else(|| ReportError::MissingConfigError {
                    field: "source.data_dir".to_string(),
                })?;
                ReportConfig::for_data_dir(dir)
            }
        };

        if let Some(dir) = data_dir {
            config.source.data_dir = dir.to_string();
        }
        Ok(config)
    }
}

impl ReportArgs {
    pub fn apply(&self, config: &mut ReportConfig) {
        if let Some(output) = &self.output {
            config.load.output_path = output.clone();
        }
        if let Some(top_n) = self.top_n {
            config.report.top_n = top_n;
        }
        if let Some(sort_by) = &self.sort_by {
            config.report.sort_by = sort_by.clone();
        }
        if self.ascending {
            config.report.descending = false;
        }
        if let Some(zip) = &self.zip {
            config.load.compression = Some(CompressionConfig {
                enabled: true,
                filename: Some(zip.clone()),
            });
        }
    }
}

impl AddOrderArgs {
    pub fn lines(&self) -> Result<Vec<(i64, u32)>> {
        self.products.iter().map(|p| parse_order_line(p)).collect()
    }

    pub fn order_date(&self) -> Result<NaiveDateTime> {
        match &self.date {
            Some(date) => parse_order_date(date),
            None => Ok(Local::now().naive_local()),
        }
    }
}

/// Parses `ID` or `ID:QTY`; a bare id orders one unit.
pub fn parse_order_line(line: &str) -> Result<(i64, u32)> {
    let invalid = |reason: &str| ReportError::InvalidConfigValueError {
        field: "product".to_string(),
        value: line.to_string(),
        reason: reason.to_string(),
    };

    let (id, quantity) = match line.split_once(':') {
        Some((id, quantity)) => (id, Some(quantity)),
        None => (line, None),
    };
    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|_| invalid("product id must be an integer"))?;
    let quantity = match quantity {
        Some(q) => q
            .trim()
            .parse::<u32>()
            .map_err(|_| invalid("quantity must be a positive integer"))?,
        None => 1,
    };
    if quantity == 0 {
        return Err(invalid("quantity must be a positive integer"));
    }

    Ok((id, quantity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;

    #[test]
    fn test_report_args_override_defaults() {
        let cli = CliConfig::parse_from([
            "order-report",
            "report",
            "--data-dir",
            "./data",
            "--top-n",
            "3",
            "--sort-by",
            "date",
            "--ascending",
            "--zip",
            "out.zip",
        ]);

        let Command::Report(args) = &cli.command else {
            panic!("expected report command");
        };
        let mut config = cli.base_config(args.data_dir.as_deref()).unwrap();
        args.apply(&mut config);

        assert_eq!(config.data_dir(), "./data");
        assert_eq!(config.top_n(), 3);
        assert_eq!(config.sort_by(), "date");
        assert!(!config.descending());
        assert_eq!(config.archive_name().as_deref(), Some("out.zip"));
    }

    #[test]
    fn test_data_dir_required_without_config_file() {
        let cli = CliConfig::parse_from(["order-report", "report"]);
        let err = cli.base_config(None).unwrap_err();
        assert!(matches!(err, ReportError::MissingConfigError { .. }));
    }

    #[test]
    fn test_import_command() {
        let cli = CliConfig::parse_from([
            "order-report",
            "--verbose",
            "import-clients",
            "new.csv",
            "--data-dir",
            "./data",
        ]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::ImportClients { ref file, .. } if file == "new.csv"
        ));
    }

    #[test]
    fn test_add_order_command() {
        let cli = CliConfig::parse_from([
            "order-report",
            "add-order",
            "--client",
            "2",
            "--product",
            "1",
            "--product",
            "3:2",
            "--date",
            "2023-05-01 10:00:00",
            "--data-dir",
            "./data",
        ]);

        let Command::AddOrder(args) = &cli.command else {
            panic!("expected add-order command");
        };
        assert_eq!(args.client, 2);
        assert_eq!(args.lines().unwrap(), vec![(1, 1), (3, 2)]);
        assert_eq!(
            args.order_date().unwrap().to_string(),
            "2023-05-01 10:00:00"
        );
    }

    #[test]
    fn test_parse_order_line() {
        assert_eq!(parse_order_line("7").unwrap(), (7, 1));
        assert_eq!(parse_order_line("7:4").unwrap(), (7, 4));
        assert!(parse_order_line("7:0").is_err());
        assert!(parse_order_line("mouse").is_err());
        assert!(parse_order_line("7:-1").is_err());
    }

    #[test]
    fn test_add_client_command() {
        let cli = CliConfig::parse_from([
            "order-report",
            "add-client",
            "Ольга Орлова",
            "olga@example.com",
            "+79990001122",
            "--address",
            "Омск",
        ]);
        assert!(matches!(
            cli.command,
            Command::AddClient { ref email, ref address, .. }
                if email == "olga@example.com" && address.as_deref() == Some("Омск")
        ));
    }
}
