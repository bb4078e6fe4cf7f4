use pt_cli::ClientError;
use pt_config::ConfigError;
use pt_core::CoreError;
use pt_session::SessionError;

use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

const NOT_LOGGED_IN_MESSAGE: &str = "You are not logged in. Run `pay auth login` first.";

#[derive(Error, Debug)]
pub(crate) enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Not logged in {location}")]
    NotLoggedIn { location: ErrorLocation },

    #[error("Logger error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to write output: {message} {location}")]
    Output {
        message: String,
        location: ErrorLocation,
    },
}

impl AppError {
    #[track_caller]
    pub(crate) fn not_logged_in() -> Self {
        AppError::NotLoggedIn {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn logger<S: Into<String>>(message: S) -> Self {
        AppError::Logger {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn output<S: Into<String>>(message: S) -> Self {
        AppError::Output {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Text for stderr. Configuration problems keep their detail since the
    /// user has to fix them; everything else goes through the client's
    /// classification.
    pub(crate) fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Config(e) => e.to_string(),
            Self::Client(e) => e.user_message(fallback),
            Self::Core(e) => e.user_message(),
            Self::Session(SessionError::Expired { .. }) | Self::NotLoggedIn { .. } => {
                NOT_LOGGED_IN_MESSAGE.to_string()
            }
            Self::Session(_) | Self::Logger { .. } | Self::Output { .. } => self.to_string(),
        }
    }
}

pub(crate) type Result<T> = StdResult<T, AppError>;
