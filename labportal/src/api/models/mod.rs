//! API request and response data models.
//!
//! Request types validate themselves into the storage request records of [`crate::db::models`];
//! response types are built from the storage response records with `From`.

pub mod developers;
pub mod experiment_files;
pub mod experiments;
pub mod lab_files;
pub mod labs;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Confirmation body for operations with nothing else to return
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}
