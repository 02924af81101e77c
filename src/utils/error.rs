use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Model service unavailable at {endpoint}: {reason}")]
    ModelUnavailable { endpoint: String, reason: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Model response error: {message}")]
    ModelResponseError { message: String },

    #[error("Input table is missing required column '{column}'")]
    MissingColumnError { column: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Model,
    Data,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 單筆記錄可恢復
    Medium,
    High,
    /// 啟動失敗，無法處理任何記錄
    Critical,
}

impl EtlError {
    pub fn model_response(message: impl Into<String>) -> Self {
        EtlError::ModelResponseError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        EtlError::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ModelUnavailable { .. }
            | EtlError::ApiError(_)
            | EtlError::ModelResponseError { .. } => ErrorCategory::Model,
            EtlError::MissingColumnError { .. }
            | EtlError::CsvError(_)
            | EtlError::SerializationError(_) => ErrorCategory::Data,
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::ModelUnavailable { .. } => ErrorSeverity::Critical,
            EtlError::ApiError(_)
            | EtlError::ModelResponseError { .. }
            | EtlError::SerializationError(_) => ErrorSeverity::Medium,
            EtlError::MissingColumnError { .. } | EtlError::CsvError(_) | EtlError::IoError(_) => {
                ErrorSeverity::High
            }
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorSeverity::High
            }
        }
    }

    /// 出錯時給操作人員的下一步建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ModelUnavailable { .. } => {
                "Start LM Studio, load a model and enable the local server (default http://localhost:1234/v1)"
            }
            EtlError::ApiError(_) => "Check that the LM Studio server is still running and reachable",
            EtlError::ModelResponseError { .. } | EtlError::SerializationError(_) => {
                "Try a model with structured output support or adjust the prompt template"
            }
            EtlError::MissingColumnError { .. } | EtlError::CsvError(_) => {
                "Make sure the input table has the 工单内容 and 来电号码 header columns and is UTF-8 encoded"
            }
            EtlError::IoError(_) => "Check that the input file exists and the output directory is writable",
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags and try again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Model => format!("Language model failure: {}", self),
            ErrorCategory::Data => format!("Could not process table data: {}", self),
            ErrorCategory::Io => format!("File access failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
