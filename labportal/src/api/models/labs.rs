//! API request/response models for labs.
//!
//! There is no owner field on the request types: the owner is always the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::labs::{LabCreateDBRequest, LabDBResponse, LabUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::types::{DeveloperId, ExperimentId, LabId};

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LabCreate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub experiment_id: Option<ExperimentId>,
}

impl LabCreate {
    pub fn validate(self, owner: DeveloperId) -> Result<LabCreateDBRequest> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::bad_request("Lab name is required"))?;

        Ok(LabCreateDBRequest {
            developer_id: owner,
            name,
            description: self.description,
            experiment_id: self.experiment_id,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LabUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub experiment_id: Option<ExperimentId>,
}

impl LabUpdate {
    pub fn validate(self) -> Result<LabUpdateDBRequest> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(Error::bad_request("Lab name cannot be empty"));
        }

        Ok(LabUpdateDBRequest {
            name: self.name.map(|n| n.trim().to_string()),
            description: self.description,
            experiment_id: self.experiment_id,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LabResponse {
    pub id: LabId,
    pub developer_id: DeveloperId,
    pub name: String,
    pub description: Option<String>,
    pub experiment_id: Option<ExperimentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LabDBResponse> for LabResponse {
    fn from(db: LabDBResponse) -> Self {
        Self {
            id: db.id,
            developer_id: db.developer_id,
            name: db.name,
            description: db.description,
            experiment_id: db.experiment_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_comes_from_caller() {
        // Unknown fields such as a client-supplied owner are ignored
        let request: LabCreate = serde_json::from_value(serde_json::json!({
            "name": " Heaps ",
            "developer_id": 99,
        }))
        .unwrap();

        let db = request.validate(7).unwrap();
        assert_eq!(db.developer_id, 7);
        assert_eq!(db.name, "Heaps");
    }

    #[test]
    fn test_name_required() {
        let err = LabCreate::default().validate(1).unwrap_err();
        assert_eq!(err.user_message(), "Lab name is required");

        let err = LabUpdate {
            name: Some(" ".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.user_message(), "Lab name cannot be empty");
    }
}
