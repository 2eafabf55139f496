use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::info;

use crate::{
    AppState,
    api::{
        extract::{DeveloperUpdatePayload, JsonBody, PathParam},
        models::{
            MessageResponse,
            developers::{
                AuthResponse, CurrentDeveloper, DeveloperCreate, DeveloperMessageResponse, DeveloperResponse, DeveloperUpdate,
                DeveloperUpdateCommand, LoginRequest, RegisterRequest,
            },
        },
    },
    auth::{
        password::{self, Argon2Params},
        permissions::{ManagementCaller, require_admin, require_admin_or_self, require_role_change_allowed},
    },
    db::{
        errors::DbError,
        models::developers::{DeveloperCreateDBRequest, DeveloperDBResponse, DeveloperDeleteOutcome, DeveloperUpdateDBRequest},
    },
    errors::{Error, Result},
    types::{DeveloperId, Operation, Role},
};

const EMAIL_IN_USE: &str = "Email already in use";

fn email_in_use(err: Error) -> Error {
    match err {
        Error::Database(db) if db.is_duplicate_email() => Error::bad_request(EMAIL_IN_USE),
        other => other,
    }
}

/// Register a new developer account
#[utoipa::path(
    post,
    path = "/api/developers/register",
    request_body = RegisterRequest,
    tag = "developers",
    responses(
        (status = 201, description = "Developer registered", body = AuthResponse),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorBody),
        (status = 409, description = "Email already registered", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(State(state): State<AppState>, JsonBody(request): JsonBody<RegisterRequest>) -> Result<(StatusCode, Json<AuthResponse>)> {
    let registration = request.validate()?;

    // Fast path for the message; the unique index settles races with the same 409
    if state.store.get_developer_by_email(&registration.email).await?.is_some() {
        return Err(Error::Conflict {
            message: "Email already registered".to_string(),
        });
    }

    let password_hash = password::hash_password_blocking(registration.password, Argon2Params::from(&state.config.auth.password)).await?;
    let developer = state
        .store
        .create_developer(&DeveloperCreateDBRequest {
            name: registration.name,
            last_name: registration.last_name,
            email: registration.email,
            password_hash,
            role: Role::developer(),
            profile_image: None,
        })
        .await?;

    let token = state.tokens.issue(developer.id, &developer.email)?;
    info!(developer_id = developer.id, "Developer registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Developer registered successfully".to_string(),
            developer: developer.into(),
            token,
        }),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/developers/login",
    request_body = LoginRequest,
    tag = "developers",
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorBody),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, JsonBody(request): JsonBody<LoginRequest>) -> Result<Json<AuthResponse>> {
    let (email, password) = request.validate()?;

    // Unknown email and wrong password produce the same response
    let Some(developer) = state.store.get_developer_by_email(&email).await? else {
        return Err(Error::InvalidCredentials);
    };
    if !password::verify_password_blocking(password, developer.password_hash.clone()).await? {
        return Err(Error::InvalidCredentials);
    }

    let token = state.tokens.issue(developer.id, &developer.email)?;
    info!(developer_id = developer.id, "Developer logged in");

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        developer: developer.into(),
        token,
    }))
}

/// Get the authenticated developer's profile
#[utoipa::path(
    get,
    path = "/api/developers/profile",
    tag = "developers",
    responses(
        (status = 200, description = "Profile", body = DeveloperResponse),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorBody),
        (status = 404, description = "Account no longer exists", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_profile(State(state): State<AppState>, current: CurrentDeveloper) -> Result<Json<DeveloperResponse>> {
    let developer = state
        .store
        .get_developer(current.id)
        .await?
        .ok_or_else(|| Error::not_found("Developer", current.id))?;

    Ok(Json(developer.into()))
}

/// Update the authenticated developer's own profile.
///
/// Accepts `application/json` or `multipart/form-data` with a `profileImage` file. Role and
/// password are not changed here.
#[utoipa::path(
    put,
    path = "/api/developers/profile",
    request_body = DeveloperUpdate,
    tag = "developers",
    responses(
        (status = 200, description = "Profile updated", body = DeveloperMessageResponse),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorBody),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorBody),
        (status = 413, description = "Image too large", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentDeveloper,
    payload: DeveloperUpdatePayload,
) -> Result<Json<DeveloperMessageResponse>> {
    let command = payload.into_command().without_privileged_fields();
    let developer = apply_update(&state, current.id, command).await?;

    Ok(Json(DeveloperMessageResponse {
        message: "Profile updated successfully".to_string(),
        developer: developer.into(),
    }))
}

/// List all developer accounts
#[utoipa::path(
    get,
    path = "/api/developers",
    tag = "developers",
    responses(
        (status = 200, description = "All developers, newest first", body = [DeveloperResponse]),
        (status = 403, description = "Admin role required when management routes are protected", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_developers(State(state): State<AppState>, caller: ManagementCaller) -> Result<Json<Vec<DeveloperResponse>>> {
    require_admin(&caller, "list", "developers")?;

    let developers = state.store.list_developers().await?;
    Ok(Json(developers.into_iter().map(Into::into).collect()))
}

/// Public profile of the first admin account, or `null`
#[utoipa::path(
    get,
    path = "/api/developers/admin-details",
    tag = "developers",
    responses(
        (status = 200, description = "First admin, or null", body = Option<DeveloperResponse>),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_admin_details(State(state): State<AppState>) -> Result<Json<Option<DeveloperResponse>>> {
    let admin = state.store.first_admin().await?;
    Ok(Json(admin.map(Into::into)))
}

/// Create a developer account
#[utoipa::path(
    post,
    path = "/api/developers",
    request_body = DeveloperCreate,
    tag = "developers",
    responses(
        (status = 201, description = "Developer created", body = DeveloperMessageResponse),
        (status = 400, description = "Invalid input or email already in use", body = crate::errors::ErrorBody),
        (status = 403, description = "Admin role required when management routes are protected", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_developer(
    State(state): State<AppState>,
    caller: ManagementCaller,
    JsonBody(request): JsonBody<DeveloperCreate>,
) -> Result<(StatusCode, Json<DeveloperMessageResponse>)> {
    require_admin(&caller, "create", "developers")?;
    let request = request.validate()?;

    if state.store.get_developer_by_email(&request.email).await?.is_some() {
        return Err(Error::bad_request(EMAIL_IN_USE));
    }

    let password_hash = password::hash_password_blocking(request.password, Argon2Params::from(&state.config.auth.password)).await?;
    let developer = state
        .store
        .create_developer(&DeveloperCreateDBRequest {
            name: request.name,
            last_name: request.last_name,
            email: request.email,
            password_hash,
            role: request.role,
            profile_image: None,
        })
        .await
        .map_err(|e| email_in_use(e.into()))?;

    info!(developer_id = developer.id, role = %developer.role, "Developer created");
    Ok((
        StatusCode::CREATED,
        Json(DeveloperMessageResponse {
            message: "Developer created successfully".to_string(),
            developer: developer.into(),
        }),
    ))
}

/// Update a developer account.
///
/// Accepts `application/json` or `multipart/form-data` with a `profileImage` file.
#[utoipa::path(
    put,
    path = "/api/developers/{id}",
    request_body = DeveloperUpdate,
    tag = "developers",
    params(("id" = i64, Path, description = "Developer ID")),
    responses(
        (status = 200, description = "Developer updated", body = DeveloperMessageResponse),
        (status = 400, description = "Invalid input, email in use, or last admin demotion", body = crate::errors::ErrorBody),
        (status = 403, description = "Not permitted when management routes are protected", body = crate::errors::ErrorBody),
        (status = 404, description = "Developer not found", body = crate::errors::ErrorBody),
        (status = 413, description = "Image too large", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_developer(
    State(state): State<AppState>,
    PathParam(id): PathParam<DeveloperId>,
    caller: ManagementCaller,
    payload: DeveloperUpdatePayload,
) -> Result<Json<DeveloperMessageResponse>> {
    require_admin_or_self(&caller, Operation::Update, id)?;
    let command = payload.into_command();
    require_role_change_allowed(&caller, command.role.as_deref())?;

    let developer = apply_update(&state, id, command).await?;

    Ok(Json(DeveloperMessageResponse {
        message: "Developer updated successfully".to_string(),
        developer: developer.into(),
    }))
}

/// Delete a developer account. The last admin cannot be deleted.
#[utoipa::path(
    delete,
    path = "/api/developers/{id}",
    tag = "developers",
    params(("id" = i64, Path, description = "Developer ID")),
    responses(
        (status = 200, description = "Developer deleted", body = MessageResponse),
        (status = 400, description = "Last admin account", body = crate::errors::ErrorBody),
        (status = 403, description = "Admin role required when management routes are protected", body = crate::errors::ErrorBody),
        (status = 404, description = "Developer not found", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_developer(
    State(state): State<AppState>,
    PathParam(id): PathParam<DeveloperId>,
    caller: ManagementCaller,
) -> Result<Json<MessageResponse>> {
    require_admin(&caller, "delete", "developers")?;

    match state.store.delete_developer(id).await? {
        DeveloperDeleteOutcome::Deleted => {
            info!(developer_id = id, "Developer deleted");
            Ok(Json(MessageResponse::new("Developer deleted successfully")))
        }
        DeveloperDeleteOutcome::NotFound => Err(Error::not_found("Developer", id)),
        DeveloperDeleteOutcome::LastAdmin => Err(Error::bad_request("Cannot delete the last admin account")),
    }
}

/// Validate, check the email, hash a new password and write the update
async fn apply_update(state: &AppState, id: DeveloperId, command: DeveloperUpdateCommand) -> Result<DeveloperDBResponse> {
    let update = command.validate()?;

    if let Some(email) = &update.email
        && let Some(existing) = state.store.get_developer_by_email(email).await?
        && existing.id != id
    {
        return Err(Error::bad_request(EMAIL_IN_USE));
    }

    let password_hash = match update.password {
        Some(password) => Some(password::hash_password_blocking(password, Argon2Params::from(&state.config.auth.password)).await?),
        None => None,
    };

    let request = DeveloperUpdateDBRequest {
        name: update.name,
        last_name: update.last_name,
        email: update.email,
        role: update.role,
        password_hash,
        profile_image: update.profile_image,
    };

    let updated = state.store.update_developer(id, &request).await.map_err(|e| match e {
        DbError::UniqueViolation { .. } if e.is_duplicate_email() => Error::bad_request(EMAIL_IN_USE),
        other => other.into(),
    })?;

    let developer = updated.ok_or_else(|| Error::not_found("Developer", id))?;
    info!(developer_id = id, "Developer updated");
    Ok(developer)
}
