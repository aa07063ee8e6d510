//! Portal Payments Server - dealer portal payment capture core
//!
//! # Overview
//!
//! This crate is the payments backend of the cabinet dealer portal. It
//! records manual payments against accepted orders, drives the card
//! gateway intent flow, and reconciles gateway webhooks into the local
//! payment ledger:
//!
//! - **Payments** (`payments`): lifecycle rules, intent reconciliation, webhook processing
//! - **Database** (`db`): embedded SQLite storage via sqlx
//! - **Identity** (`auth`): gateway-forwarded identity headers, admin guard
//! - **Gateway** (`stripe`): PaymentIntents client and signature verification
//! - **HTTP API** (`api`): RESTful API surface
//!
//! # Module structure
//!
//! ```text
//! portal-server/src/
//! ├── core/          # config, shared state, server lifecycle
//! ├── auth/          # identity extraction, admin guard
//! ├── api/           # HTTP routes and handlers
//! ├── payments/      # lifecycle, intents, webhook processing
//! ├── order_total/   # order amount resolution
//! ├── stripe/        # gateway client, webhook signatures
//! ├── db/            # pool, migrations, repositories
//! ├── routes/        # router assembly, middleware stack
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod order_total;
pub mod payments;
pub mod routes;
pub mod stripe;
pub mod utils;

// Re-export public types
pub use auth::CurrentUser;
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - forwards to the "security" tracing target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ____             __        __
   / __ \____  _____/ /_____ _/ /
  / /_/ / __ \/ ___/ __/ __ `/ /
 / ____/ /_/ / /  / /_/ /_/ / /
/_/    \____/_/   \__/\__,_/_/
    "#
    );
}

/// Prepare the process environment before anything logs.
///
/// Loads `.env` when present, creates the working directory layout and
/// installs the tracing subscriber (with daily file output in production).
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    if config.is_production() {
        init_logger_with_file(Some(&config.log_level), log_dir.to_str());
    } else {
        init_logger_with_file(Some(&config.log_level), None);
    }

    Ok(())
}
