//! API request/response models for lab files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::db::models::lab_files::{LabFileCreateDBRequest, LabFileDBResponse};
use crate::errors::{Error, Result};
use crate::types::{LabFileId, LabId};

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LabFileCreate {
    pub lab_id: Option<LabId>,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
}

impl LabFileCreate {
    pub fn validate(self) -> Result<LabFileCreateDBRequest> {
        let (Some(lab_id), Some(file_name), Some(file_path)) = (
            self.lab_id,
            self.file_name.filter(|n| !n.trim().is_empty()),
            self.file_path.filter(|p| !p.trim().is_empty()),
        ) else {
            return Err(Error::bad_request("lab_id, file_name, and file_path are required"));
        };

        if self.file_size.is_some_and(|size| size < 0) {
            return Err(Error::bad_request("file_size cannot be negative"));
        }

        Ok(LabFileCreateDBRequest {
            lab_id,
            file_name,
            file_path,
            file_type: self.file_type,
            file_size: self.file_size,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLabFilesQuery {
    /// Only return files of this lab
    pub lab_id: Option<LabId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LabFileResponse {
    pub id: LabFileId,
    pub lab_id: LabId,
    pub file_name: String,
    pub file_path: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<LabFileDBResponse> for LabFileResponse {
    fn from(db: LabFileDBResponse) -> Self {
        Self {
            id: db.id,
            lab_id: db.lab_id,
            file_name: db.file_name,
            file_path: db.file_path,
            file_type: db.file_type,
            file_size: db.file_size,
            created_at: db.created_at,
        }
    }
}
