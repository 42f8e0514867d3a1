use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, check_any_role};
use crate::modules::stages::model::{CreateStageDto, Stage};
use crate::modules::stages::service::StageService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/stages",
    request_body = CreateStageDto,
    responses(
        (status = 201, description = "Stage created successfully", body = Stage),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 409, description = "Stage name already exists")
    ),
    tag = "Stages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_stage(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateStageDto>,
) -> Result<(StatusCode, Json<Stage>), AppError> {
    let stage = StageService::create_stage(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(stage)))
}

#[utoipa::path(
    get,
    path = "/api/stages",
    responses(
        (status = 200, description = "List of stages ordered by name", body = Vec<Stage>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Stages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_stages(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Stage>>, AppError> {
    check_any_role(&auth_user, &[UserRole::Admin, UserRole::Secretary])?;

    let stages = StageService::get_all_stages(&state.db).await?;
    Ok(Json(stages))
}

#[utoipa::path(
    get,
    path = "/api/stages/{stage_id}",
    params(
        ("stage_id" = Uuid, Path, description = "Stage ID")
    ),
    responses(
        (status = 200, description = "Stage details", body = Stage),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Stage not found")
    ),
    tag = "Stages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_stage(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Stage>, AppError> {
    check_any_role(&auth_user, &[UserRole::Admin, UserRole::Secretary])?;

    let stage = StageService::get_stage_by_id(&state.db, id).await?;
    Ok(Json(stage))
}

#[utoipa::path(
    delete,
    path = "/api/stages/{stage_id}",
    params(
        ("stage_id" = Uuid, Path, description = "Stage ID")
    ),
    responses(
        (status = 204, description = "Stage and all dependents deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Stage not found")
    ),
    tag = "Stages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_stage(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    StageService::delete_stage(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
