use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Could not start extraction in the page: {message}")]
    DeliveryError { message: String },

    #[error("Document access failed: {message}")]
    DocumentError { message: String },

    #[error("Invalid selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration field '{field}' is invalid: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Delivery,
    Document,
    Storage,
    Serialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ExportError {
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::DeliveryError {
            message: message.into(),
        }
    }

    pub fn document(message: impl Into<String>) -> Self {
        Self::DocumentError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) => ErrorCategory::Storage,
            Self::SerializationError(_) => ErrorCategory::Serialization,
            Self::DeliveryError { .. } => ErrorCategory::Delivery,
            Self::DocumentError { .. } | Self::SelectorError { .. } => ErrorCategory::Document,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    /// 嚴重程度，CLI 依此決定退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 頁面尚未就緒或瀏覽器啟動失敗，使用者可以重試
            ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Document => ErrorSeverity::High,
            ErrorCategory::Storage | ErrorCategory::Serialization => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::DeliveryError { .. } => {
                format!("Failed to start extraction on the page. {}", self)
            }
            Self::DocumentError { .. } => {
                format!("The page stopped responding during extraction. {}", self)
            }
            Self::SelectorError { .. } => format!("Internal selector problem. {}", self),
            Self::IoError(e) => format!("Could not write the export file: {}", e),
            Self::SerializationError(e) => format!("Could not serialize comments: {}", e),
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => format!("Error: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::DeliveryError { .. } => {
                "Check that the browser can be launched and the video page loads, then retry"
            }
            Self::DocumentError { .. } => "Reload the video page and run the export again",
            Self::SelectorError { .. } => "Report this problem; the comment layout selectors are invalid",
            Self::IoError(_) => "Make sure the output directory exists and is writable",
            Self::SerializationError(_) => "Run again with --verbose to see the offending record",
            Self::InvalidConfigValueError { .. } | Self::ConfigValidationError { .. } => {
                "Fix the highlighted value in the command line or config file"
            }
            Self::MissingConfigError { .. } => {
                "Provide the missing option on the command line or in the config file"
            }
            Self::ConfigError { .. } => "Make sure the config file exists and is valid TOML",
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
