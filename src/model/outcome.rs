//! Outcome of a single verification check for a single item

use serde::{Deserialize, Serialize};
use std::fmt;

/// Recorded result of one check
///
/// A failing check is still an outcome: the error is described here instead
/// of being propagated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidityOutcome {
    /// The check passed
    Reachable,

    /// The target answered, but not successfully (or not at all)
    Unreachable {
        /// HTTP status code, if a response was received
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        reason: String,
    },

    /// The check itself failed before it could decide
    Error { message: String },
}

impl ValidityOutcome {
    pub fn unreachable(status: Option<u16>, reason: impl Into<String>) -> Self {
        Self::Unreachable {
            status,
            reason: reason.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Returns true if the check passed
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Reachable)
    }

    /// Returns true if the check could not run to completion
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Short machine-readable label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reachable => "reachable",
            Self::Unreachable { .. } => "unreachable",
            Self::Error { .. } => "error",
        }
    }

    /// Human-readable detail, if any
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Reachable => None,
            Self::Unreachable {
                status: Some(code),
                reason,
            } => Some(format!("HTTP {}: {}", code, reason)),
            Self::Unreachable { status: None, reason } => Some(reason.clone()),
            Self::Error { message } => Some(message.clone()),
        }
    }
}

impl fmt::Display for ValidityOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detail() {
            Some(detail) => write!(f, "{} ({})", self.as_str(), detail),
            None => f.write_str(self.as_str()),
        }
    }
}
