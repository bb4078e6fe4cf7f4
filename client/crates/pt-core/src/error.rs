use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {message} {location}")]
    Validation {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid transaction filter: {value} {location}")]
    InvalidFilter {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid date '{value}': {message} {location}")]
    InvalidDate {
        value: String,
        message: String,
        location: ErrorLocation,
    },
}

impl CoreError {
    /// Create a validation error at the caller's location
    #[track_caller]
    pub fn validation<S: Into<String>>(message: S) -> Self {
        CoreError::Validation {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create an invalid date error at the caller's location
    #[track_caller]
    pub fn invalid_date<V: Into<String>, M: Into<String>>(value: V, message: M) -> Self {
        CoreError::InvalidDate {
            value: value.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// The message shown to a user, without source location.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::InvalidFilter { value, .. } => {
                format!("Unknown filter '{value}', expected ALL, CREDIT or DEBIT")
            }
            Self::InvalidDate { message, .. } => message.clone(),
        }
    }
}

pub type Result<T> = StdResult<T, CoreError>;
