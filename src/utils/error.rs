//! Error types and handling
//!
//! Crate-wide error type and the shape errors take when handed to the UI.

use crate::export::ExportError;
use crate::persistence::{CodecError, SettingsError, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unreadable settings: {0}")]
    Codec(#[from] CodecError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Config error: {0}")]
    Config(String),
}

/// Error response for frontend
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        let code = match &error {
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Codec(_) => "UNREADABLE_SETTINGS",
            AppError::Store(_) => "STORE_ERROR",
            AppError::Settings(_) => "SETTINGS_ERROR",
            AppError::Export(_) => "EXPORT_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
        };

        ErrorResponse {
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let response = ErrorResponse::from(AppError::from(CodecError::UnknownVersion {
            version: 5,
            known: vec![1, 2],
        }));
        assert_eq!(response.code, "UNREADABLE_SETTINGS");
        assert!(response.message.contains('5'));

        let response = ErrorResponse::from(AppError::from(ExportError::ShutDown));
        assert_eq!(response.code, "EXPORT_ERROR");
    }
}
