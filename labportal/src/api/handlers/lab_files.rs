//! File records of owned labs. Ownership is inherited from the parent lab.

use axum::{Json, extract::State, http::StatusCode};
use tracing::info;

use crate::{
    AppState,
    api::{
        extract::{JsonBody, PathParam, QueryParams},
        models::{
            MessageResponse,
            developers::CurrentDeveloper,
            lab_files::{LabFileCreate, LabFileResponse, ListLabFilesQuery},
        },
    },
    errors::{Error, Result},
    types::{DeveloperId, LabFileId, LabId},
};

async fn ensure_lab_owned(state: &AppState, lab_id: LabId, owner: DeveloperId) -> Result<()> {
    match state.store.get_lab(lab_id, owner).await? {
        Some(_) => Ok(()),
        None => Err(Error::not_found("Lab", lab_id)),
    }
}

#[utoipa::path(
    get,
    path = "/api/lab-files",
    tag = "lab-files",
    params(ListLabFilesQuery),
    responses(
        (status = 200, description = "Files of the caller's labs", body = [LabFileResponse]),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorBody),
        (status = 404, description = "Lab not found", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_lab_files(
    State(state): State<AppState>,
    current: CurrentDeveloper,
    QueryParams(query): QueryParams<ListLabFilesQuery>,
) -> Result<Json<Vec<LabFileResponse>>> {
    if let Some(lab_id) = query.lab_id {
        ensure_lab_owned(&state, lab_id, current.id).await?;
    }

    let files = state.store.list_lab_files(current.id, query.lab_id).await?;
    Ok(Json(files.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/lab-files/{id}",
    tag = "lab-files",
    params(("id" = i64, Path, description = "Lab file ID")),
    responses(
        (status = 200, description = "Lab file", body = LabFileResponse),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorBody),
        (status = 404, description = "Lab file not found", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_lab_file(
    State(state): State<AppState>,
    current: CurrentDeveloper,
    PathParam(id): PathParam<LabFileId>,
) -> Result<Json<LabFileResponse>> {
    let file = state
        .store
        .get_lab_file(id, current.id)
        .await?
        .ok_or_else(|| Error::not_found("Lab file", id))?;
    Ok(Json(file.into()))
}

#[utoipa::path(
    post,
    path = "/api/lab-files",
    request_body = LabFileCreate,
    tag = "lab-files",
    responses(
        (status = 201, description = "Lab file recorded", body = LabFileResponse),
        (status = 400, description = "Required fields missing", body = crate::errors::ErrorBody),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorBody),
        (status = 404, description = "Lab not found", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_lab_file(
    State(state): State<AppState>,
    current: CurrentDeveloper,
    JsonBody(request): JsonBody<LabFileCreate>,
) -> Result<(StatusCode, Json<LabFileResponse>)> {
    let request = request.validate()?;
    ensure_lab_owned(&state, request.lab_id, current.id).await?;

    let file = state.store.create_lab_file(&request).await?;
    info!(lab_file_id = file.id, lab_id = file.lab_id, "Lab file recorded");
    Ok((StatusCode::CREATED, Json(file.into())))
}

#[utoipa::path(
    delete,
    path = "/api/lab-files/{id}",
    tag = "lab-files",
    params(("id" = i64, Path, description = "Lab file ID")),
    responses(
        (status = 200, description = "Lab file deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorBody),
        (status = 404, description = "Lab file not found", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_lab_file(
    State(state): State<AppState>,
    current: CurrentDeveloper,
    PathParam(id): PathParam<LabFileId>,
) -> Result<Json<MessageResponse>> {
    if !state.store.delete_lab_file(id, current.id).await? {
        return Err(Error::not_found("Lab file", id));
    }
    info!(lab_file_id = id, "Lab file deleted");
    Ok(Json(MessageResponse::new("Lab file deleted successfully")))
}

#[cfg(test)]
mod tests {
    use crate::api::models::{lab_files::LabFileResponse, labs::LabResponse};
    use crate::test_utils::{create_test_app, create_test_config, register};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    async fn create_lab(server: &TestServer, token: &str, name: &str) -> LabResponse {
        server
            .post("/api/lab")
            .authorization_bearer(token)
            .json(&json!({"name": name}))
            .await
            .json()
    }

    #[test_log::test(tokio::test)]
    async fn test_files_follow_lab_ownership() {
        let (server, _state) = create_test_app(create_test_config()).await;
        let a = register(&server, "Ann", "a@x.com", "secret1").await;
        let b = register(&server, "Bo", "b@x.com", "secret1").await;
        let lab = create_lab(&server, &a.token, "Heaps").await;

        // B cannot attach files to A's lab
        let response = server
            .post("/api/lab-files")
            .authorization_bearer(&b.token)
            .json(&json!({"lab_id": lab.id, "file_name": "x.rs", "file_path": "/x.rs"}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "Lab not found");

        let response = server
            .post("/api/lab-files")
            .authorization_bearer(&a.token)
            .json(&json!({"lab_id": lab.id, "file_name": "heap.rs", "file_path": "/labs/heap.rs", "file_size": 120}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let file: LabFileResponse = response.json();
        assert_eq!(file.file_size, Some(120));

        let foreign = server.get(&format!("/api/lab-files/{}", file.id)).authorization_bearer(&b.token).await;
        foreign.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(foreign.json::<Value>()["error"], "Lab file not found");

        server
            .get("/api/lab-files")
            .authorization_bearer(&b.token)
            .add_query_param("lab_id", lab.id)
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let b_files: Vec<LabFileResponse> = server.get("/api/lab-files").authorization_bearer(&b.token).await.json();
        assert!(b_files.is_empty());

        server
            .delete(&format!("/api/lab-files/{}", file.id))
            .authorization_bearer(&b.token)
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let a_files: Vec<LabFileResponse> = server
            .get("/api/lab-files")
            .authorization_bearer(&a.token)
            .add_query_param("lab_id", lab.id)
            .await
            .json();
        assert_eq!(a_files.len(), 1);

        server
            .delete(&format!("/api/lab-files/{}", file.id))
            .authorization_bearer(&a.token)
            .await
            .assert_status_ok();
    }

    #[test_log::test(tokio::test)]
    async fn test_required_fields() {
        let (server, _state) = create_test_app(create_test_config()).await;
        let a = register(&server, "Ann", "a@x.com", "secret1").await;

        let response = server
            .post("/api/lab-files")
            .authorization_bearer(&a.token)
            .json(&json!({"file_name": "x.rs"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "lab_id, file_name, and file_path are required");
    }

    #[test_log::test(tokio::test)]
    async fn test_deleting_lab_removes_its_files() {
        let (server, _state) = create_test_app(create_test_config()).await;
        let a = register(&server, "Ann", "a@x.com", "secret1").await;
        let lab = create_lab(&server, &a.token, "Heaps").await;

        let file: LabFileResponse = server
            .post("/api/lab-files")
            .authorization_bearer(&a.token)
            .json(&json!({"lab_id": lab.id, "file_name": "heap.rs", "file_path": "/labs/heap.rs"}))
            .await
            .json();

        server
            .delete(&format!("/api/lab/{}", lab.id))
            .authorization_bearer(&a.token)
            .await
            .assert_status_ok();
        server
            .get(&format!("/api/lab-files/{}", file.id))
            .authorization_bearer(&a.token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
