//! Unified error codes for the dealer portal payments service
//!
//! This module defines all error codes used across the server and frontend.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Identity errors
//! - 2xxx: Permission errors
//! - 3xxx: Order errors
//! - 4xxx: Payment errors
//! - 5xxx: Gateway errors
//! - 6xxx: Webhook errors
//! - 7xxx: Gateway configuration errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Identity ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Identity headers are malformed
    IdentityInvalid = 1002,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,

    // ==================== 3xxx: Order ====================
    /// Order not found
    OrderNotFound = 3001,
    /// Order total cannot be determined
    OrderAmountUnresolved = 3002,

    // ==================== 4xxx: Payment ====================
    /// Payment not found
    PaymentNotFound = 4001,
    /// Order already has an active payment
    PaymentAlreadyActive = 4002,
    /// Payment is managed by the card gateway
    PaymentGatewayManaged = 4003,
    /// Payment status does not permit deletion
    PaymentNotDeletable = 4004,
    /// Invalid payment status value
    PaymentInvalidStatus = 4005,

    // ==================== 5xxx: Gateway ====================
    /// Card payments are not enabled
    GatewayDisabled = 5001,
    /// Card gateway configuration is incomplete
    GatewayNotConfigured = 5002,
    /// Card gateway request failed
    GatewayUnavailable = 5003,
    /// Card gateway rejected the request
    GatewayRejected = 5004,

    // ==================== 6xxx: Webhook ====================
    /// Webhooks not supported for the active gateway
    WebhookNotSupported = 6001,
    /// Webhook signing secret missing
    WebhookSecretMissing = 6002,
    /// Webhook signature verification failed
    WebhookSignatureInvalid = 6003,
    /// Webhook payload could not be parsed
    WebhookPayloadInvalid = 6004,

    // ==================== 7xxx: Gateway Configuration ====================
    /// Payment configuration not found
    PaymentConfigNotFound = 7001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Identity
            ErrorCode::NotAuthenticated => "Caller is not authenticated",
            ErrorCode::IdentityInvalid => "Identity headers are malformed",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAmountUnresolved => "Order total cannot be determined",

            // Payment
            ErrorCode::PaymentNotFound => "Payment not found",
            ErrorCode::PaymentAlreadyActive => "Order already has an active payment",
            ErrorCode::PaymentGatewayManaged => "Payment is managed by the card gateway",
            ErrorCode::PaymentNotDeletable => {
                "Only pending, failed, or cancelled payments can be deleted"
            }
            ErrorCode::PaymentInvalidStatus => "Invalid payment status",

            // Gateway
            ErrorCode::GatewayDisabled => "Card payments are not enabled",
            ErrorCode::GatewayNotConfigured => "Card gateway configuration is incomplete",
            ErrorCode::GatewayUnavailable => "Card gateway request failed",
            ErrorCode::GatewayRejected => "Card gateway rejected the request",

            // Webhook
            ErrorCode::WebhookNotSupported => "Webhooks are not supported for the active gateway",
            ErrorCode::WebhookSecretMissing => "Webhook signing secret is not configured",
            ErrorCode::WebhookSignatureInvalid => "Webhook signature verification failed",
            ErrorCode::WebhookPayloadInvalid => "Webhook payload could not be parsed",

            // Gateway Configuration
            ErrorCode::PaymentConfigNotFound => "Payment configuration not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Identity
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::IdentityInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),

            // Order
            3001 => Ok(ErrorCode::OrderNotFound),
            3002 => Ok(ErrorCode::OrderAmountUnresolved),

            // Payment
            4001 => Ok(ErrorCode::PaymentNotFound),
            4002 => Ok(ErrorCode::PaymentAlreadyActive),
            4003 => Ok(ErrorCode::PaymentGatewayManaged),
            4004 => Ok(ErrorCode::PaymentNotDeletable),
            4005 => Ok(ErrorCode::PaymentInvalidStatus),

            // Gateway
            5001 => Ok(ErrorCode::GatewayDisabled),
            5002 => Ok(ErrorCode::GatewayNotConfigured),
            5003 => Ok(ErrorCode::GatewayUnavailable),
            5004 => Ok(ErrorCode::GatewayRejected),

            // Webhook
            6001 => Ok(ErrorCode::WebhookNotSupported),
            6002 => Ok(ErrorCode::WebhookSecretMissing),
            6003 => Ok(ErrorCode::WebhookSignatureInvalid),
            6004 => Ok(ErrorCode::WebhookPayloadInvalid),

            // Gateway Configuration
            7001 => Ok(ErrorCode::PaymentConfigNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
