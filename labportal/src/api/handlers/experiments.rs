use axum::{Json, extract::State, http::StatusCode};
use tracing::info;

use crate::{
    AppState,
    api::{
        extract::{JsonBody, PathParam, QueryParams},
        models::{
            MessageResponse,
            experiments::{ExperimentCreate, ExperimentResponse, ExperimentUpdate, ListExperimentsQuery},
        },
    },
    auth::permissions::{ManagementCaller, require_admin},
    errors::{Error, Result},
    types::ExperimentId,
};

/// List experiments, newest first
#[utoipa::path(
    get,
    path = "/api/experiments",
    tag = "experiments",
    params(ListExperimentsQuery),
    responses(
        (status = 200, description = "Experiments", body = [ExperimentResponse]),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_experiments(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListExperimentsQuery>,
) -> Result<Json<Vec<ExperimentResponse>>> {
    let experiments = state.store.list_experiments(&query.into()).await?;
    Ok(Json(experiments.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/experiments/{id}",
    tag = "experiments",
    params(("id" = i64, Path, description = "Experiment ID")),
    responses(
        (status = 200, description = "Experiment", body = ExperimentResponse),
        (status = 404, description = "Experiment not found", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_experiment(State(state): State<AppState>, PathParam(id): PathParam<ExperimentId>) -> Result<Json<ExperimentResponse>> {
    let experiment = state
        .store
        .get_experiment(id)
        .await?
        .ok_or_else(|| Error::not_found("Experiment", id))?;
    Ok(Json(experiment.into()))
}

#[utoipa::path(
    post,
    path = "/api/experiments",
    request_body = ExperimentCreate,
    tag = "experiments",
    responses(
        (status = 201, description = "Experiment created", body = ExperimentResponse),
        (status = 400, description = "Title missing", body = crate::errors::ErrorBody),
        (status = 403, description = "Admin role required when management routes are protected", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_experiment(
    State(state): State<AppState>,
    caller: ManagementCaller,
    JsonBody(request): JsonBody<ExperimentCreate>,
) -> Result<(StatusCode, Json<ExperimentResponse>)> {
    require_admin(&caller, "create", "experiments")?;

    let experiment = state.store.create_experiment(&request.validate()?).await?;
    info!(experiment_id = experiment.id, "Experiment created");
    Ok((StatusCode::CREATED, Json(experiment.into())))
}

#[utoipa::path(
    put,
    path = "/api/experiments/{id}",
    request_body = ExperimentUpdate,
    tag = "experiments",
    params(("id" = i64, Path, description = "Experiment ID")),
    responses(
        (status = 200, description = "Experiment updated", body = ExperimentResponse),
        (status = 403, description = "Admin role required when management routes are protected", body = crate::errors::ErrorBody),
        (status = 404, description = "Experiment not found", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_experiment(
    State(state): State<AppState>,
    PathParam(id): PathParam<ExperimentId>,
    caller: ManagementCaller,
    JsonBody(request): JsonBody<ExperimentUpdate>,
) -> Result<Json<ExperimentResponse>> {
    require_admin(&caller, "update", "experiments")?;

    let experiment = state
        .store
        .update_experiment(id, &request.validate()?)
        .await?
        .ok_or_else(|| Error::not_found("Experiment", id))?;
    Ok(Json(experiment.into()))
}

/// Delete an experiment together with its files
#[utoipa::path(
    delete,
    path = "/api/experiments/{id}",
    tag = "experiments",
    params(("id" = i64, Path, description = "Experiment ID")),
    responses(
        (status = 200, description = "Experiment deleted", body = MessageResponse),
        (status = 403, description = "Admin role required when management routes are protected", body = crate::errors::ErrorBody),
        (status = 404, description = "Experiment not found", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_experiment(
    State(state): State<AppState>,
    PathParam(id): PathParam<ExperimentId>,
    caller: ManagementCaller,
) -> Result<Json<MessageResponse>> {
    require_admin(&caller, "delete", "experiments")?;

    if !state.store.delete_experiment(id).await? {
        return Err(Error::not_found("Experiment", id));
    }
    info!(experiment_id = id, "Experiment deleted");
    Ok(Json(MessageResponse::new("Experiment deleted successfully")))
}
