//! Database models for the experiment catalog.

use crate::types::ExperimentId;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct ExperimentCreateDBRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub estimated_time: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ExperimentUpdateDBRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub estimated_time: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExperimentDBResponse {
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

/// Filter for listing experiments
#[derive(Debug, Clone, Default)]
pub struct ExperimentFilter {
    /// Exact category match
    pub category: Option<String>,
}
