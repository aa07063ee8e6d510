//! Server state
//!
//! [`ServerState`] holds the shared handles every request needs: the
//! configuration, the SQLite pool and the gateway client factory. It is
//! cheap to clone (`Arc` internally where it matters) and is the axum
//! router state.

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::stripe::GatewayFactory;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Card gateway client factory (memoized per credential)
    pub gateways: GatewayFactory,
}

impl ServerState {
    /// Create server state from existing parts
    ///
    /// Usually [`initialize()`](Self::initialize) is used instead.
    pub fn new(config: Config, pool: SqlitePool, gateways: GatewayFactory) -> Self {
        Self {
            config,
            pool,
            gateways,
        }
    }

    /// Initialize server state
    ///
    /// Creates the working directory layout, opens the database (running
    /// migrations) and builds the gateway factory.
    ///
    /// # Panics
    ///
    /// Panics when the working directory or the database cannot be
    /// initialized; the process cannot run without either.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_service = DbService::new(&config.database_path)
            .await
            .expect("Failed to initialize database");

        let gateways = GatewayFactory::new(config.gateway_timeout_ms);

        Self::new(config.clone(), db_service.pool, gateways)
    }

    /// Get the connection pool
    pub fn get_pool(&self) -> SqlitePool {
        self.pool.clone()
    }
}
