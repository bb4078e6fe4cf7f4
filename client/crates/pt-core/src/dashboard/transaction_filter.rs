use crate::{CoreError, CoreResult};

use std::fmt;
use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionFilter {
    #[default]
    All,
    Credit,
    Debit,
}

impl TransactionFilter {
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "ALL",
            Self::Credit => "CREDIT",
            Self::Debit => "DEBIT",
        }
    }

    /// Text shown when the filtered list is empty.
    pub fn empty_message(&self) -> String {
        match self {
            Self::All => String::from("Start by adding your first payment transaction"),
            Self::Credit | Self::Debit => {
                format!("No {} transactions found", self.as_str().to_lowercase())
            }
        }
    }
}

impl fmt::Display for TransactionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionFilter {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "CREDIT" => Ok(Self::Credit),
            "DEBIT" => Ok(Self::Debit),
            _ => Err(CoreError::InvalidFilter {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
