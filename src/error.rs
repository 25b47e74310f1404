use crate::classification::import::ImportError;
use crate::classification::{BatchError, RuleLoadError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Rules(RuleLoadError),
    Import(ImportError),
    Batch(BatchError),
    Output(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Rules(err) => write!(f, "rule error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Batch(err) => write!(f, "batch error: {}", err),
            AppError::Output(err) => write!(f, "output error: {}", err),
        }
    }
}

impl AppError {
    /// Process exit status: 2 for bad input or configuration, 1 for runtime failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) | AppError::Rules(_) | AppError::Import(_) => 2,
            AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Batch(_)
            | AppError::Output(_) => 1,
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Rules(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Batch(err) => Some(err),
            AppError::Output(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RuleLoadError> for AppError {
    fn from(value: RuleLoadError) -> Self {
        Self::Rules(value)
    }
}

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<BatchError> for AppError {
    fn from(value: BatchError) -> Self {
        Self::Batch(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}
