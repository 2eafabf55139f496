//! Database models for lab files.

use crate::types::{LabFileId, LabId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct LabFileCreateDBRequest {
    pub lab_id: LabId,
    pub file_name: String,
    pub file_path: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct LabFileDBResponse {
    pub id: LabFileId,
    pub lab_id: LabId,
    pub file_name: String,
    pub file_path: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
}
