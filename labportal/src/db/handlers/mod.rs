//! PostgreSQL repositories and the [`PgStore`] that exposes them through the storage seam.
//!
//! Each repository wraps a borrowed `PgConnection` (a pooled connection or an open transaction)
//! and owns the queries for one table. `PgStore` acquires a connection per call and delegates,
//! so the multi-statement operations (last-admin guard) can run inside one transaction.
//!
//! Queries are built at runtime with `sqlx::query_as` so the crate compiles without a live
//! database.

pub mod developers;
pub mod experiment_files;
pub mod experiments;
pub mod lab_files;
pub mod labs;

pub use developers::Developers;
pub use experiment_files::ExperimentFiles;
pub use experiments::Experiments;
pub use lab_files::LabFiles;
pub use labs::Labs;

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

use crate::config::PoolSettings;
use crate::db::errors::Result;
use crate::db::store::Store;

/// Get the labportal database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// [`Store`] backed by a PostgreSQL pool.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool (used by `#[sqlx::test]`)
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a pool from settings. Connections are opened lazily on first use.
    pub fn connect_lazy(url: &str, settings: &PoolSettings) -> Result<Self> {
        let mut options = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs));

        if settings.idle_timeout_secs > 0 {
            options = options.idle_timeout(Duration::from_secs(settings.idle_timeout_secs));
        }
        if settings.max_lifetime_secs > 0 {
            options = options.max_lifetime(Duration::from_secs(settings.max_lifetime_secs));
        }

        let pool = options.connect_lazy(url)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn init(&self) -> Result<()> {
        info!("Running database migrations");
        migrator().run(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        info!("Closing database connections...");
        self.pool.close().await;
    }

    fn kind(&self) -> &'static str {
        "postgres"
    }
}
