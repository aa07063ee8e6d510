//! Error types for the portal server
//!
//! The whole error system lives in `shared::error`; this module re-exports it
//! so server code has one import path.

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
