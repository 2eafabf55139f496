//! Database models for labs.

use crate::types::{DeveloperId, ExperimentId, LabId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct LabCreateDBRequest {
    /// Owner, always taken from the authenticated caller
    pub developer_id: DeveloperId,
    pub name: String,
    pub description: Option<String>,
    pub experiment_id: Option<ExperimentId>,
}

#[derive(Debug, Clone, Default)]
pub struct LabUpdateDBRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub experiment_id: Option<ExperimentId>,
}

#[derive(Debug, Clone)]
pub struct LabDBResponse {
    pub id: LabId,
    pub developer_id: DeveloperId,
    pub name: String,
    pub description: Option<String>,
    pub experiment_id: Option<ExperimentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
