//! File records attached to catalog experiments.
//!
//! Uploads may be anonymous. When the request carries a bearer token the uploader is recorded,
//! and only that uploader can delete the file afterwards.

use axum::{Json, extract::State, http::StatusCode};
use tracing::info;

use crate::{
    AppState,
    api::{
        extract::{JsonBody, PathParam, QueryParams},
        models::{
            MessageResponse,
            experiment_files::{ExperimentFileCreate, ExperimentFileResponse, ListExperimentFilesQuery},
        },
    },
    auth::current_user::OptionalDeveloper,
    errors::{Error, Result},
    types::ExperimentFileId,
};

#[utoipa::path(
    get,
    path = "/api/experiment-files",
    tag = "experiment-files",
    params(ListExperimentFilesQuery),
    responses(
        (status = 200, description = "Experiment files, newest first", body = [ExperimentFileResponse]),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_experiment_files(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListExperimentFilesQuery>,
) -> Result<Json<Vec<ExperimentFileResponse>>> {
    let files = state.store.list_experiment_files(query.experiment_id).await?;
    Ok(Json(files.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/experiment-files/{id}",
    tag = "experiment-files",
    params(("id" = i64, Path, description = "Experiment file ID")),
    responses(
        (status = 200, description = "Experiment file", body = ExperimentFileResponse),
        (status = 404, description = "Experiment file not found", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_experiment_file(
    State(state): State<AppState>,
    PathParam(id): PathParam<ExperimentFileId>,
) -> Result<Json<ExperimentFileResponse>> {
    let file = state
        .store
        .get_experiment_file(id)
        .await?
        .ok_or_else(|| Error::not_found("Experiment file", id))?;
    Ok(Json(file.into()))
}

#[utoipa::path(
    post,
    path = "/api/experiment-files",
    request_body = ExperimentFileCreate,
    tag = "experiment-files",
    responses(
        (status = 201, description = "Experiment file recorded", body = ExperimentFileResponse),
        (status = 400, description = "Required fields missing", body = crate::errors::ErrorBody),
        (status = 401, description = "Authorization header present but invalid", body = crate::errors::ErrorBody),
        (status = 404, description = "Experiment not found", body = crate::errors::ErrorBody),
    ),
    security((), ("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_experiment_file(
    State(state): State<AppState>,
    OptionalDeveloper(uploader): OptionalDeveloper,
    JsonBody(request): JsonBody<ExperimentFileCreate>,
) -> Result<(StatusCode, Json<ExperimentFileResponse>)> {
    let request = request.validate(uploader.map(|u| u.id))?;

    if state.store.get_experiment(request.experiment_id).await?.is_none() {
        return Err(Error::not_found("Experiment", request.experiment_id));
    }

    let file = state.store.create_experiment_file(&request).await?;
    info!(experiment_file_id = file.id, uploader = ?file.developer_id, "Experiment file recorded");
    Ok((StatusCode::CREATED, Json(file.into())))
}

#[utoipa::path(
    delete,
    path = "/api/experiment-files/{id}",
    tag = "experiment-files",
    params(("id" = i64, Path, description = "Experiment file ID")),
    responses(
        (status = 200, description = "Experiment file deleted", body = MessageResponse),
        (status = 404, description = "Not found, or uploaded by someone else", body = crate::errors::ErrorBody),
    ),
    security((), ("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_experiment_file(
    State(state): State<AppState>,
    OptionalDeveloper(caller): OptionalDeveloper,
    PathParam(id): PathParam<ExperimentFileId>,
) -> Result<Json<MessageResponse>> {
    if !state.store.delete_experiment_file(id, caller.map(|c| c.id)).await? {
        return Err(Error::not_found("Experiment file", id));
    }
    info!(experiment_file_id = id, "Experiment file deleted");
    Ok(Json(MessageResponse::new("Experiment file deleted successfully")))
}
