use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Workbook write error: {0}")]
    XlsxWriteError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Template read error: {0}")]
    TemplateError(#[from] calamine::XlsxError),

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

    #[error("Invalid order record at line {line}: {message}")]
    InvalidRecord { line: u64, message: String },

    #[error("Template sheet '{sheet}' is missing or has no header row")]
    TemplateLayoutError { sheet: String },

    #[error("Unexpected item combination for order {order_id}: {items:?}")]
    UnexpectedItemCombination { order_id: String, items: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Output,
    Classification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::CsvError(_)
            | EtlError::InvalidRecord { .. }
            | EtlError::TemplateError(_)
            | EtlError::TemplateLayoutError { .. } => ErrorCategory::Input,
            EtlError::ZipError(_)
            | EtlError::IoError(_)
            | EtlError::SerializationError(_)
            | EtlError::XlsxWriteError(_) => ErrorCategory::Output,
            EtlError::UnexpectedItemCombination { .. } => ErrorCategory::Classification,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Classification => ErrorSeverity::Medium,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::UnexpectedItemCombination { order_id, .. } => format!(
                "Split or fix order {} in the export, then rerun; its shipping tier cannot be picked automatically",
                order_id
            ),
            EtlError::InvalidRecord { line, .. } => {
                format!("Fix line {} of the order export and rerun", line)
            }
            EtlError::CsvError(_) => {
                "Make sure the order export is an unmodified Shopify CSV".to_string()
            }
            EtlError::TemplateError(_) | EtlError::TemplateLayoutError { .. } => {
                "Check the template workbook, or run without --template to use the built-in layout"
                    .to_string()
            }
            EtlError::MissingConfigError { field } => format!("Provide a value for '{}'", field),
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Check the configuration file and command line arguments".to_string()
            }
            EtlError::IoError(_) | EtlError::ZipError(_) | EtlError::XlsxWriteError(_) => {
                "Check that the input exists and the output directory is writable".to_string()
            }
            EtlError::SerializationError(_) => "Rerun with --verbose and report the failure".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Could not read the input: {}", self),
            ErrorCategory::Output => format!("Could not write the output: {}", self),
            ErrorCategory::Classification => {
                format!("Conversion stopped, no output was written. {}", self)
            }
        }
    }

    /// Process exit code matching the error severity.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
