//! Error types and handling for the `DisasterWatch` service

use serde::Serialize;
use thiserror::Error;

use crate::models::DisasterType;

/// Main error type for the `DisasterWatch` service
#[derive(Error, Debug)]
pub enum DisasterWatchError {
    /// Request names a disaster type outside the supported set
    #[error("Unsupported disaster type: {tag}")]
    UnsupportedDisasterType { tag: String },

    /// A predictive model could not be loaded
    #[error("Model unavailable for {disaster}: {message}")]
    ModelUnavailable {
        disaster: DisasterType,
        message: String,
    },

    /// Every known shelter lies inside the exclusion radius
    #[error("No safe shelter found outside {radius_km} km")]
    NoSafeShelterFound { radius_km: f64 },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A loaded model rejected its input at prediction time
    #[error("Inference failed for {disaster}: {message}")]
    Inference {
        disaster: DisasterType,
        message: String,
    },

    /// Reference geodata could not be loaded
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Stable, externally visible error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    UnsupportedDisasterType,
    ModelUnavailable,
    NoSafeShelterFound,
    InvalidRequest,
    InferenceFailed,
    DatasetError,
    ConfigError,
    IoError,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UnsupportedDisasterType => "unsupported_disaster_type",
            ErrorCode::ModelUnavailable => "model_unavailable",
            ErrorCode::NoSafeShelterFound => "no_safe_shelter_found",
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::InferenceFailed => "inference_failed",
            ErrorCode::DatasetError => "dataset_error",
            ErrorCode::ConfigError => "config_error",
            ErrorCode::IoError => "io_error",
        }
    }
}

impl DisasterWatchError {
    /// Create a new unsupported disaster type error
    pub fn unsupported<S: Into<String>>(tag: S) -> Self {
        Self::UnsupportedDisasterType { tag: tag.into() }
    }

    /// Create a new model unavailable error
    pub fn model_unavailable<S: Into<String>>(disaster: DisasterType, message: S) -> Self {
        Self::ModelUnavailable {
            disaster,
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new inference error
    pub fn inference<S: Into<String>>(disaster: DisasterType, message: S) -> Self {
        Self::Inference {
            disaster,
            message: message.into(),
        }
    }

    /// Create a new dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// External code for this error
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            DisasterWatchError::UnsupportedDisasterType { .. } => ErrorCode::UnsupportedDisasterType,
            DisasterWatchError::ModelUnavailable { .. } => ErrorCode::ModelUnavailable,
            DisasterWatchError::NoSafeShelterFound { .. } => ErrorCode::NoSafeShelterFound,
            DisasterWatchError::Validation { .. } => ErrorCode::InvalidRequest,
            DisasterWatchError::Inference { .. } => ErrorCode::InferenceFailed,
            DisasterWatchError::Dataset { .. } => ErrorCode::DatasetError,
            DisasterWatchError::Config { .. } => ErrorCode::ConfigError,
            DisasterWatchError::Io { .. } => ErrorCode::IoError,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DisasterWatchError::UnsupportedDisasterType { tag } => format!(
                "Disaster type '{tag}' is not supported. Use one of: {}",
                DisasterType::ALL.map(DisasterType::as_str).join(", ")
            ),
            DisasterWatchError::ModelUnavailable { disaster, .. } => {
                format!("The {disaster} risk model is not available.")
            }
            DisasterWatchError::NoSafeShelterFound { radius_km } => {
                format!("No safe shelters found outside the {radius_km} km disaster radius.")
            }
            DisasterWatchError::Validation { message } => format!("Invalid input: {message}"),
            DisasterWatchError::Inference { disaster, .. } => {
                format!("Risk prediction for {disaster} failed.")
            }
            DisasterWatchError::Dataset { .. } => {
                "Reference data could not be loaded. Please check the data files.".to_string()
            }
            DisasterWatchError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            DisasterWatchError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
