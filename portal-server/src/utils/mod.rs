//! Utilities
//!
//! # Contents
//!
//! - [`AppError`] / [`ApiResponse`] - unified error system (from `shared::error`)
//! - [`logger`] - tracing setup
//! - [`validation`] - input limits and helpers for the API handlers

pub mod error;
pub mod logger;
pub mod validation;

// Re-export error types from the error module (which re-exports from shared)
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
