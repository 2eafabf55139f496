//! Database models for files attached to catalog experiments.

use crate::types::{DeveloperId, ExperimentFileId, ExperimentId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct ExperimentFileCreateDBRequest {
    pub experiment_id: ExperimentId,
    pub file_name: String,
    pub file_path: String,
    pub file_type: Option<String>,
    /// Uploader, when the request carried a valid bearer token
    pub developer_id: Option<DeveloperId>,
}

#[derive(Debug, Clone)]
pub struct ExperimentFileDBResponse {
    pub id: ExperimentFileId,
    pub experiment_id: ExperimentId,
    pub file_name: String,
    pub file_path: String,
    pub file_type: Option<String>,
    pub developer_id: Option<DeveloperId>,
    pub created_at: DateTime<Utc>,
}
