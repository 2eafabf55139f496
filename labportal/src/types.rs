//! Common type definitions.
//!
//! Entity ids are database-generated `BIGINT` identity values, exposed as `i64` aliases so
//! signatures read in terms of what they identify.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

// Type aliases for IDs
pub type DeveloperId = i64;
pub type ExperimentId = i64;
pub type LabId = i64;
pub type LabFileId = i64;
pub type ExperimentFileId = i64;

/// Account role label.
///
/// Roles are an open set of strings stored verbatim; only `"Admin"` carries privileges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub const ADMIN: &'static str = "Admin";
    pub const DEVELOPER: &'static str = "Developer";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn admin() -> Self {
        Self(Self::ADMIN.to_string())
    }

    pub fn developer() -> Self {
        Self(Self::DEVELOPER.to_string())
    }

    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::developer()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Role {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// Operations that storage-level protection rules can refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}
