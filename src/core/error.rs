//! Domain error taxonomy
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Global feature switches stored in the `features` collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Reminder commands and scheduled delivery
    Notifications,
    /// Ledger commands and inline transactions
    Transactions,
}

impl Feature {
    pub const ALL: [Feature; 2] = [Feature::Notifications, Feature::Transactions];

    /// Key used in the durable document
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Notifications => "notifications",
            Feature::Transactions => "transactions",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "notifications" => Ok(Feature::Notifications),
            "transactions" => Ok(Feature::Transactions),
            other => Err(BotError::InvalidFormat(format!("unknown feature '{other}'"))),
        }
    }
}

#[derive(Debug, Error)]
pub enum BotError {
    /// Malformed timezone or date input; the user can correct it
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Per-user active reminder cap reached
    #[error("reminder limit reached ({limit})")]
    LimitExceeded { limit: usize },

    #[error("not found")]
    NotFound,

    #[error("feature '{0}' is disabled")]
    FeatureDisabled(Feature),

    #[error("storage I/O failed: {0}")]
    Storage(#[from] std::io::Error),

    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
