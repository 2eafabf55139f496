//! API request/response models for developer accounts.
//!
//! Developer payloads use camelCase field names (`lastName`, `profileImage`, `createdAt`), the
//! shape the browser frontend reads. Request fields are all optional at the serde level so that
//! validation can report missing values with its own messages, in a fixed order.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::developers::DeveloperDBResponse;
use crate::errors::{Error, Result};
use crate::types::{DeveloperId, Role};

pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// `local@domain.tld` shape check
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn check_email(email: &str) -> Result<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(Error::bad_request("Please provide a valid email address"))
    }
}

fn check_password_length(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

/// Identity attached to a request by a verified bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentDeveloper {
    pub id: DeveloperId,
    pub email: String,
}

/// Self-service registration
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

/// A registration that passed validation. Email is lower-cased, names trimmed.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<ValidRegistration> {
        let (Some(name), Some(email), Some(password)) = (non_blank(self.name), non_blank(self.email), self.password.filter(|p| !p.is_empty()))
        else {
            return Err(Error::bad_request("Name, email, and password are required"));
        };

        let email = normalize_email(&email);
        check_email(&email)?;
        check_password_length(&password)?;

        if self.confirm_password.as_deref() != Some(password.as_str()) {
            return Err(Error::bad_request("Passwords do not match"));
        }

        Ok(ValidRegistration {
            name,
            last_name: non_blank(self.last_name),
            email,
            password,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns the lower-cased email and the password
    pub fn validate(self) -> Result<(String, String)> {
        let (Some(email), Some(password)) = (non_blank(self.email), self.password.filter(|p| !p.is_empty())) else {
            return Err(Error::bad_request("Email and password are required"));
        };

        let email = normalize_email(&email);
        check_email(&email)?;
        Ok((email, password))
    }
}

/// Account creation from the management screens. No token is issued.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct DeveloperCreate {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Defaults to `Developer`
    pub role: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ValidDeveloperCreate {
    pub name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl DeveloperCreate {
    pub fn validate(self) -> Result<ValidDeveloperCreate> {
        let (Some(name), Some(email), Some(password)) = (non_blank(self.name), non_blank(self.email), self.password.filter(|p| !p.is_empty()))
        else {
            return Err(Error::bad_request("Name, email, and password are required"));
        };

        let email = normalize_email(&email);
        check_email(&email)?;
        check_password_length(&password)?;

        Ok(ValidDeveloperCreate {
            name,
            last_name: non_blank(self.last_name),
            email,
            password,
            role: non_blank(self.role).map(Role::new).unwrap_or_default(),
        })
    }
}

/// JSON body of a developer update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct DeveloperUpdate {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
    /// An image as a `data:image/...;base64,` URL
    pub profile_image: Option<String>,
}

/// A developer update after the JSON or multipart body has been read.
///
/// `profile_image` is always a data URL here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeveloperUpdateCommand {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
    pub profile_image: Option<String>,
}

/// A validated update. The password is still plaintext; hashing happens in the handler.
#[derive(Debug, Clone, Default)]
pub struct ValidDeveloperUpdate {
    pub name: Option<String>,
    /// `Some(None)` when a blank last name was sent, which clears it
    pub last_name: Option<Option<String>>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
    pub profile_image: Option<String>,
}

impl DeveloperUpdateCommand {
    /// Drop the fields a developer may not change about themselves
    pub fn without_privileged_fields(self) -> Self {
        Self {
            role: None,
            password: None,
            ..self
        }
    }

    pub fn validate(self) -> Result<ValidDeveloperUpdate> {
        let name = match self.name {
            Some(name) if name.trim().is_empty() => return Err(Error::bad_request("Name cannot be empty")),
            name => name.map(|n| n.trim().to_string()),
        };

        let email = match self.email {
            Some(email) => {
                let email = normalize_email(&email);
                check_email(&email)?;
                Some(email)
            }
            None => None,
        };

        let role = match self.role {
            Some(role) if role.trim().is_empty() => return Err(Error::bad_request("Role cannot be empty")),
            role => role.map(|r| Role::new(r.trim())),
        };

        // Forms send an empty password field when it is left blank
        let password = self.password.filter(|p| !p.is_empty());
        if let Some(password) = &password {
            check_password_length(password)?;
        }

        if let Some(image) = &self.profile_image
            && !image.starts_with("data:image/")
        {
            return Err(Error::bad_request("Profile image must be an image"));
        }

        Ok(ValidDeveloperUpdate {
            name,
            last_name: self.last_name.map(|n| non_blank(Some(n))),
            email,
            role,
            password,
            profile_image: self.profile_image,
        })
    }
}

impl From<DeveloperUpdate> for DeveloperUpdateCommand {
    fn from(update: DeveloperUpdate) -> Self {
        Self {
            name: update.name,
            last_name: update.last_name,
            email: update.email,
            role: update.role,
            password: update.password,
            profile_image: update.profile_image,
        }
    }
}

/// Public view of a developer. Never includes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperResponse {
    pub id: DeveloperId,
    pub name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub role: Role,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DeveloperDBResponse> for DeveloperResponse {
    fn from(db: DeveloperDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            last_name: db.last_name,
            email: db.email,
            role: db.role,
            profile_image: db.profile_image,
            created_at: db.created_at,
        }
    }
}

/// Returned by register and login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub developer: DeveloperResponse,
    pub token: String,
}

/// Returned by create and update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeveloperMessageResponse {
    pub message: String,
    pub developer: DeveloperResponse,
}
