//! Database models for developer accounts.

use crate::types::{DeveloperId, Role};
use chrono::{DateTime, Utc};

/// Database request for creating a new developer
#[derive(Debug, Clone)]
pub struct DeveloperCreateDBRequest {
    pub name: String,
    pub last_name: Option<String>,
    /// Already lower-cased
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub profile_image: Option<String>,
}

/// Database request for updating a developer. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default)]
pub struct DeveloperUpdateDBRequest {
    pub name: Option<String>,
    /// `Some(None)` clears the last name
    pub last_name: Option<Option<String>>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub password_hash: Option<String>,
    pub profile_image: Option<String>,
}

/// Database response for a developer
#[derive(Debug, Clone)]
pub struct DeveloperDBResponse {
    pub id: DeveloperId,
    pub name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a guarded developer delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeveloperDeleteOutcome {
    Deleted,
    NotFound,
    /// The account is the only remaining admin; nothing was deleted
    LastAdmin,
}
