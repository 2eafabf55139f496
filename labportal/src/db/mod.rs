//! Storage layer.
//!
//! Handlers reach storage only through the [`Store`] trait object held in
//! [`AppState`](crate::AppState). Two implementations exist:
//!
//! - [`PgStore`]: PostgreSQL via a sqlx pool, with the schema in `migrations/`
//! - [`MemoryStore`]: process-local tables for tests and quick local runs
//!
//! # Modules
//!
//! - [`errors`]: [`errors::DbError`], the classified storage failure
//! - [`handlers`]: PostgreSQL repositories, one per table
//! - [`memory`]: the in-memory store
//! - [`models`]: request and response records shared by both stores
//! - [`store`]: the trait seam

pub mod errors;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod store;

use std::sync::Arc;

use tracing::{info, warn};

pub use handlers::PgStore;
pub use memory::MemoryStore;
pub use store::Store;

use crate::config::DatabaseConfig;

/// Build the configured store. Nothing is contacted yet; call [`Store::init`] before serving.
pub fn connect(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn Store>> {
    match config {
        DatabaseConfig::External { url, pool } => {
            info!("Using external PostgreSQL database");
            Ok(Arc::new(PgStore::connect_lazy(url, pool)?))
        }
        DatabaseConfig::Memory => {
            warn!("Using in-memory store, all data will be lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
