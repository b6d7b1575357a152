use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Field not found: {field}")]
    FieldNotFound { field: String },

    #[error("Invalid order date: {value}")]
    InvalidDate { value: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Data,
    Io,
    Query,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::ConfigError { .. }
            | ReportError::ConfigValidationError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ReportError::CsvError(_)
            | ReportError::SerializationError(_)
            | ReportError::InvalidDate { .. }
            | ReportError::ProcessingError { .. }
            | ReportError::ValidationError { .. } => ErrorCategory::Data,
            ReportError::IoError(_) | ReportError::ZipError(_) => ErrorCategory::Io,
            ReportError::FieldNotFound { .. } => ErrorCategory::Query,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ReportError::FieldNotFound { .. } | ReportError::InvalidDate { .. } => {
                ErrorSeverity::Medium
            }
            ReportError::CsvError(_)
            | ReportError::SerializationError(_)
            | ReportError::ProcessingError { .. }
            | ReportError::ValidationError { .. }
            | ReportError::ConfigError { .. }
            | ReportError::ConfigValidationError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::MissingConfigError { .. } => ErrorSeverity::High,
            ReportError::IoError(_) | ReportError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ReportError::FieldNotFound { .. } => {
                "Sort by one of: id, client_name, order_date, total_cost".to_string()
            }
            ReportError::InvalidDate { .. } => {
                "Use YYYY-MM-DD or YYYY-MM-DD HH:MM:SS for order dates".to_string()
            }
            ReportError::CsvError(_) => {
                "Check that the CSV headers match the expected table columns".to_string()
            }
            ReportError::IoError(_) => {
                "Check that the data directory exists and is readable".to_string()
            }
            ReportError::ZipError(_) => "Check that the output directory is writable".to_string(),
            ReportError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration file or pass it on the command line", field)
            }
            ReportError::ConfigError { .. }
            | ReportError::ConfigValidationError { .. }
            | ReportError::InvalidConfigValueError { .. } => {
                "Review the configuration file against the documented defaults".to_string()
            }
            ReportError::SerializationError(_) => "Check the JSON structure".to_string(),
            ReportError::ProcessingError { .. } | ReportError::ValidationError { .. } => {
                "Fix the offending record and run again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Data problem: {}", self),
            ErrorCategory::Io => format!("File system problem: {}", self),
            ErrorCategory::Query => format!("Invalid report request: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
