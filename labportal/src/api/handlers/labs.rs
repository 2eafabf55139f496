//! Labs owned by the authenticated developer.
//!
//! The caller id is passed into every storage call, so a lab owned by someone else is reported
//! exactly like a lab that does not exist.

use axum::{Json, extract::State, http::StatusCode};
use tracing::info;

use crate::{
    AppState,
    api::{
        extract::{JsonBody, PathParam},
        models::{
            MessageResponse,
            developers::CurrentDeveloper,
            labs::{LabCreate, LabResponse, LabUpdate},
        },
    },
    errors::{Error, Result},
    types::LabId,
};

#[utoipa::path(
    get,
    path = "/api/lab",
    tag = "labs",
    responses(
        (status = 200, description = "The caller's labs, newest first", body = [LabResponse]),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_labs(State(state): State<AppState>, current: CurrentDeveloper) -> Result<Json<Vec<LabResponse>>> {
    let labs = state.store.list_labs(current.id).await?;
    Ok(Json(labs.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/lab/{id}",
    tag = "labs",
    params(("id" = i64, Path, description = "Lab ID")),
    responses(
        (status = 200, description = "Lab", body = LabResponse),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorBody),
        (status = 404, description = "Lab not found", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_lab(State(state): State<AppState>, current: CurrentDeveloper, PathParam(id): PathParam<LabId>) -> Result<Json<LabResponse>> {
    let lab = state
        .store
        .get_lab(id, current.id)
        .await?
        .ok_or_else(|| Error::not_found("Lab", id))?;
    Ok(Json(lab.into()))
}

#[utoipa::path(
    post,
    path = "/api/lab",
    request_body = LabCreate,
    tag = "labs",
    responses(
        (status = 201, description = "Lab created", body = LabResponse),
        (status = 400, description = "Name missing or unknown experiment", body = crate::errors::ErrorBody),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_lab(
    State(state): State<AppState>,
    current: CurrentDeveloper,
    JsonBody(request): JsonBody<LabCreate>,
) -> Result<(StatusCode, Json<LabResponse>)> {
    let lab = state.store.create_lab(&request.validate(current.id)?).await?;
    info!(lab_id = lab.id, owner = current.id, "Lab created");
    Ok((StatusCode::CREATED, Json(lab.into())))
}

#[utoipa::path(
    put,
    path = "/api/lab/{id}",
    request_body = LabUpdate,
    tag = "labs",
    params(("id" = i64, Path, description = "Lab ID")),
    responses(
        (status = 200, description = "Lab updated", body = LabResponse),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorBody),
        (status = 404, description = "Lab not found", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_lab(
    State(state): State<AppState>,
    current: CurrentDeveloper,
    PathParam(id): PathParam<LabId>,
    JsonBody(request): JsonBody<LabUpdate>,
) -> Result<Json<LabResponse>> {
    let lab = state
        .store
        .update_lab(id, current.id, &request.validate()?)
        .await?
        .ok_or_else(|| Error::not_found("Lab", id))?;
    Ok(Json(lab.into()))
}

/// Delete a lab and its files
#[utoipa::path(
    delete,
    path = "/api/lab/{id}",
    tag = "labs",
    params(("id" = i64, Path, description = "Lab ID")),
    responses(
        (status = 200, description = "Lab deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorBody),
        (status = 404, description = "Lab not found", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_lab(State(state): State<AppState>, current: CurrentDeveloper, PathParam(id): PathParam<LabId>) -> Result<Json<MessageResponse>> {
    if !state.store.delete_lab(id, current.id).await? {
        return Err(Error::not_found("Lab", id));
    }
    info!(lab_id = id, owner = current.id, "Lab deleted");
    Ok(Json(MessageResponse::new("Lab deleted successfully")))
}

#[cfg(test)]
mod tests {
    use crate::api::models::labs::LabResponse;
    use crate::test_utils::{create_test_app, create_test_config, register};
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    #[test_log::test(tokio::test)]
    async fn test_foreign_lab_is_indistinguishable_from_missing() {
        let (server, _state) = create_test_app(create_test_config()).await;
        let a = register(&server, "Ann", "a@x.com", "secret1").await;
        let b = register(&server, "Bo", "b@x.com", "secret1").await;

        let response = server.post("/api/lab").authorization_bearer(&a.token).json(&json!({"name": "Heaps"})).await;
        response.assert_status(StatusCode::CREATED);
        let lab: LabResponse = response.json();
        assert_eq!(lab.developer_id, a.developer.id);

        let foreign = server.delete(&format!("/api/lab/{}", lab.id)).authorization_bearer(&b.token).await;
        let missing = server.delete("/api/lab/424242").authorization_bearer(&b.token).await;
        foreign.assert_status(StatusCode::NOT_FOUND);
        missing.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(foreign.json::<Value>(), missing.json::<Value>());
        assert_eq!(foreign.json::<Value>()["error"], "Lab not found");

        let foreign = server.get(&format!("/api/lab/{}", lab.id)).authorization_bearer(&b.token).await;
        foreign.assert_status(StatusCode::NOT_FOUND);
        let foreign = server
            .put(&format!("/api/lab/{}", lab.id))
            .authorization_bearer(&b.token)
            .json(&json!({"name": "Mine now"}))
            .await;
        foreign.assert_status(StatusCode::NOT_FOUND);

        let response = server.get(&format!("/api/lab/{}", lab.id)).authorization_bearer(&a.token).await;
        response.assert_status_ok();
        let refetched: LabResponse = response.json();
        assert_eq!(refetched.name, "Heaps");

        let b_labs: Vec<LabResponse> = server.get("/api/lab").authorization_bearer(&b.token).await.json();
        assert!(b_labs.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_client_supplied_owner_is_ignored() {
        let (server, _state) = create_test_app(create_test_config()).await;
        let a = register(&server, "Ann", "a@x.com", "secret1").await;
        let b = register(&server, "Bo", "b@x.com", "secret1").await;

        let lab: LabResponse = server
            .post("/api/lab")
            .authorization_bearer(&a.token)
            .json(&json!({"name": "Heaps", "developer_id": b.developer.id}))
            .await
            .json();
        assert_eq!(lab.developer_id, a.developer.id);
    }

    #[test_log::test(tokio::test)]
    async fn test_owner_update_and_delete() {
        let (server, _state) = create_test_app(create_test_config()).await;
        let a = register(&server, "Ann", "a@x.com", "secret1").await;

        let response = server.post("/api/lab").authorization_bearer(&a.token).json(&json!({})).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "Lab name is required");

        let lab: LabResponse = server
            .post("/api/lab")
            .authorization_bearer(&a.token)
            .json(&json!({"name": "Heaps", "description": "binary heaps"}))
            .await
            .json();

        let updated: LabResponse = server
            .put(&format!("/api/lab/{}", lab.id))
            .authorization_bearer(&a.token)
            .json(&json!({"name": "Heaps II"}))
            .await
            .json();
        assert_eq!(updated.name, "Heaps II");
        assert_eq!(updated.description.as_deref(), Some("binary heaps"));

        server
            .delete(&format!("/api/lab/{}", lab.id))
            .authorization_bearer(&a.token)
            .await
            .assert_status_ok();
        server
            .get(&format!("/api/lab/{}", lab.id))
            .authorization_bearer(&a.token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[test_log::test(tokio::test)]
    async fn test_unknown_experiment_reference_is_rejected() {
        let (server, _state) = create_test_app(create_test_config()).await;
        let a = register(&server, "Ann", "a@x.com", "secret1").await;

        let response = server
            .post("/api/lab")
            .authorization_bearer(&a.token)
            .json(&json!({"name": "Heaps", "experiment_id": 999}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
