//! API request/response models for the experiment catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::db::models::experiments::{ExperimentCreateDBRequest, ExperimentDBResponse, ExperimentFilter, ExperimentUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::types::ExperimentId;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ExperimentCreate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub estimated_time: Option<String>,
    pub path: Option<String>,
}

impl ExperimentCreate {
    pub fn validate(self) -> Result<ExperimentCreateDBRequest> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::bad_request("Title is required"))?;

        Ok(ExperimentCreateDBRequest {
            title,
            description: self.description,
            category: self.category,
            difficulty: self.difficulty,
            estimated_time: self.estimated_time,
            path: self.path,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ExperimentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub estimated_time: Option<String>,
    pub path: Option<String>,
}

impl ExperimentUpdate {
    pub fn validate(self) -> Result<ExperimentUpdateDBRequest> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(Error::bad_request("Title cannot be empty"));
        }

        Ok(ExperimentUpdateDBRequest {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description,
            category: self.category,
            difficulty: self.difficulty,
            estimated_time: self.estimated_time,
            path: self.path,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListExperimentsQuery {
    /// Only return experiments in this category
    pub category: Option<String>,
}

impl From<ListExperimentsQuery> for ExperimentFilter {
    fn from(query: ListExperimentsQuery) -> Self {
        Self {
            category: query.category.filter(|c| !c.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExperimentResponse {
    pub id: ExperimentId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub estimated_time: Option<String>,
    pub path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ExperimentDBResponse> for ExperimentResponse {
    fn from(db: ExperimentDBResponse) -> Self {
        Self {
            id: db.id,
            title: db.title,
            description: db.description,
            category: db.category,
            difficulty: db.difficulty,
            estimated_time: db.estimated_time,
            path: db.path,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
