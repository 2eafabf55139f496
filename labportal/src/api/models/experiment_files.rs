//! API request/response models for experiment files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::db::models::experiment_files::{ExperimentFileCreateDBRequest, ExperimentFileDBResponse};
use crate::errors::{Error, Result};
use crate::types::{DeveloperId, ExperimentFileId, ExperimentId};

/// The uploader is taken from the bearer token, never from the body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ExperimentFileCreate {
    pub experiment_id: Option<ExperimentId>,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub file_type: Option<String>,
}

impl ExperimentFileCreate {
    pub fn validate(self, uploader: Option<DeveloperId>) -> Result<ExperimentFileCreateDBRequest> {
        let (Some(experiment_id), Some(file_name), Some(file_path)) = (
            self.experiment_id,
            self.file_name.filter(|n| !n.trim().is_empty()),
            self.file_path.filter(|p| !p.trim().is_empty()),
        ) else {
            return Err(Error::bad_request("experiment_id, file_name, and file_path are required"));
        };

        Ok(ExperimentFileCreateDBRequest {
            experiment_id,
            file_name,
            file_path,
            file_type: self.file_type,
            developer_id: uploader,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListExperimentFilesQuery {
    /// Only return files of this experiment
    pub experiment_id: Option<ExperimentId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExperimentFileResponse {
    pub id: ExperimentFileId,
    pub experiment_id: ExperimentId,
    pub file_name: String,
    pub file_path: String,
    pub file_type: Option<String>,
    /// Uploader, when the upload was authenticated
    pub developer_id: Option<DeveloperId>,
    pub created_at: DateTime<Utc>,
}

impl From<ExperimentFileDBResponse> for ExperimentFileResponse {
    fn from(db: ExperimentFileDBResponse) -> Self {
        Self {
            id: db.id,
            experiment_id: db.experiment_id,
            file_name: db.file_name,
            file_path: db.file_path,
            file_type: db.file_type,
            developer_id: db.developer_id,
            created_at: db.created_at,
        }
    }
}
