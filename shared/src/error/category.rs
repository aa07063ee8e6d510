//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Identity errors
/// - 2xxx: Permission errors
/// - 3xxx: Order errors
/// - 4xxx: Payment errors
/// - 5xxx: Gateway errors
/// - 6xxx: Webhook errors
/// - 7xxx: Gateway configuration errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Identity errors (1xxx)
    Identity,
    /// Permission errors (2xxx)
    Permission,
    /// Order errors (3xxx)
    Order,
    /// Payment errors (4xxx)
    Payment,
    /// Gateway errors (5xxx)
    Gateway,
    /// Webhook errors (6xxx)
    Webhook,
    /// Gateway configuration errors (7xxx)
    Config,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Identity,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Order,
            4000..5000 => Self::Payment,
            5000..6000 => Self::Gateway,
            6000..7000 => Self::Webhook,
            7000..8000 => Self::Config,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Identity => "identity",
            Self::Permission => "permission",
            Self::Order => "order",
            Self::Payment => "payment",
            Self::Gateway => "gateway",
            Self::Webhook => "webhook",
            Self::Config => "config",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
