use crate::adapters::csv_source::SourceTables;
use crate::core::address::DEFAULT_MAX_DEPTH;
use crate::core::aggregate::DEFAULT_TOP_N;
use crate::core::sorter::{SortKey, DEFAULT_SORT_FIELD};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern compiles"));

pub const OUTPUT_FORMATS: [&str; 2] = ["csv", "json"];
pub const MAX_ADDRESS_DEPTH_LIMIT: usize = 16;
const DEFAULT_ARCHIVE_NAME: &str = "report.zip";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub report: ReportSection,
    #[serde(default)]
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub data_dir: String,
    pub clients_file: Option<String>,
    pub orders_file: Option<String>,
    pub products_file: Option<String>,
    pub order_lines_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_true")]
    pub descending: bool,
    #[serde(default = "default_max_address_depth")]
    pub max_address_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_sort_by() -> String {
    DEFAULT_SORT_FIELD.to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_address_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_output_path() -> String {
    "./report".to_string()
}

fn default_output_formats() -> Vec<String> {
    OUTPUT_FORMATS.iter().map(|f| f.to_string()).collect()
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            sort_by: default_sort_by(),
            descending: true,
            max_address_depth: default_max_address_depth(),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_formats: default_output_formats(),
            compression: None,
        }
    }
}

impl ReportConfig {
    /// Defaults for everything except the data directory.
    pub fn for_data_dir(data_dir: &str) -> Self {
        Self {
            source: SourceConfig {
                data_dir: data_dir.to_string(),
                clients_file: None,
                orders_file: None,
                products_file: None,
                order_lines_file: None,
            },
            report: ReportSection::default(),
            load: LoadConfig::default(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("source.data_dir", &self.source.data_dir)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_positive_number("report.top_n", self.report.top_n, 1)?;
        validation::validate_range(
            "report.max_address_depth",
            self.report.max_address_depth,
            1,
            MAX_ADDRESS_DEPTH_LIMIT,
        )?;

        if self.report.sort_by.parse::<SortKey>().is_err() {
            return Err(ReportError::InvalidConfigValueError {
                field: "report.sort_by".to_string(),
                value: self.report.sort_by.clone(),
                reason: "Unknown order field".to_string(),
            });
        }

        validation::validate_allowed_values(
            "load.output_formats",
            &self.load.output_formats,
            &OUTPUT_FORMATS,
        )?;
        if self.load.output_formats.is_empty() {
            return Err(ReportError::MissingConfigError {
                field: "load.output_formats".to_string(),
            });
        }

        Ok(())
    }

    pub fn tables(&self) -> SourceTables {
        let defaults = SourceTables::default();
        SourceTables {
            clients: self.source.clients_file.clone().unwrap_or(defaults.clients),
            products: self.source.products_file.clone().unwrap_or(defaults.products),
            orders: self.source.orders_file.clone().unwrap_or(defaults.orders),
            order_lines: self
                .source
                .order_lines_file
                .clone()
                .unwrap_or(defaults.order_lines),
        }
    }

    /// Zip file name when compression is on.
    pub fn archive_name(&self) -> Option<String> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.clone().unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string()))
    }

    pub fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }
}

impl ConfigProvider for ReportConfig {
    fn data_dir(&self) -> &str {
        &self.source.data_dir
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn top_n(&self) -> usize {
        self.report.top_n
    }

    fn sort_by(&self) -> &str {
        &self.report.sort_by
    }

    fn descending(&self) -> bool {
        self.report.descending
    }

    fn max_address_depth(&self) -> usize {
        self.report.max_address_depth
    }
}

impl Validate for ReportConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
