//! Role checks for the developer management and catalog write routes.
//!
//! These routes are open unless `auth.protect_management_routes` is enabled. When it is, the
//! [`ManagementCaller`] extractor authenticates the request and loads the caller's role, and the
//! checks below decide what the caller may do.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::{
    AppState,
    api::models::developers::CurrentDeveloper,
    errors::{Error, Result},
    types::{DeveloperId, Operation, Role},
};

/// An authenticated caller with the role read from storage.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: DeveloperId,
    pub role: Role,
}

/// `None` when management routes are unprotected.
#[derive(Debug, Clone)]
pub struct ManagementCaller(pub Option<Caller>);

impl FromRequestParts<AppState> for ManagementCaller {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        if !state.config.auth.protect_management_routes {
            return Ok(ManagementCaller(None));
        }

        let current = CurrentDeveloper::from_request_parts(parts, state).await?;
        // A token can outlive its account
        let developer = state.store.get_developer(current.id).await?.ok_or_else(|| {
            debug!(developer_id = current.id, "Token subject no longer exists");
            Error::Unauthenticated {
                message: Some("Invalid token".to_string()),
            }
        })?;

        Ok(ManagementCaller(Some(Caller {
            id: developer.id,
            role: developer.role,
        })))
    }
}

/// Require the Admin role, if the routes are protected.
pub fn require_admin(caller: &ManagementCaller, action: &str, resource: &str) -> Result<()> {
    match &caller.0 {
        Some(caller) if !caller.role.is_admin() => Err(Error::InsufficientPermissions {
            action: action.to_string(),
            resource: resource.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Require the Admin role or that the caller is the target account.
pub fn require_admin_or_self(caller: &ManagementCaller, operation: Operation, target: DeveloperId) -> Result<()> {
    match &caller.0 {
        Some(caller) if !caller.role.is_admin() && caller.id != target => Err(Error::InsufficientPermissions {
            action: operation.to_string(),
            resource: format!("developer {target}"),
        }),
        _ => Ok(()),
    }
}

/// Only admins may assign roles.
pub fn require_role_change_allowed(caller: &ManagementCaller, requested: Option<&str>) -> Result<()> {
    match (&caller.0, requested) {
        (Some(caller), Some(_)) if !caller.role.is_admin() => Err(Error::InsufficientPermissions {
            action: "change".to_string(),
            resource: "developer roles".to_string(),
        }),
        _ => Ok(()),
    }
}
