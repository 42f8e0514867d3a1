use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, check_any_role};
use crate::modules::catalogs::model::StageScopeParams;
use crate::modules::teachers::model::{CreateTeacherDto, Teacher, TeacherView};
use crate::modules::teachers::service::TeacherService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/teachers",
    request_body = CreateTeacherDto,
    responses(
        (status = 201, description = "Teacher record created", body = Teacher),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "User or stage not found"),
        (status = 409, description = "Identity already has a teacher record"),
        (status = 422, description = "User does not hold the teacher role")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_teacher(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateTeacherDto>,
) -> Result<(StatusCode, Json<Teacher>), AppError> {
    let teacher = TeacherService::create_teacher(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

#[utoipa::path(
    get,
    path = "/api/teachers",
    params(StageScopeParams),
    responses(
        (status = 200, description = "Teachers in the stage ordered by last name, first name, username", body = Vec<TeacherView>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_teachers(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<StageScopeParams>,
) -> Result<Json<Vec<TeacherView>>, AppError> {
    check_any_role(&auth_user, &[UserRole::Admin, UserRole::Secretary])?;

    let teachers = TeacherService::get_teachers_for_stage(&state.db, params.stage_id).await?;
    Ok(Json(teachers))
}

#[utoipa::path(
    delete,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher record ID")
    ),
    responses(
        (status = 204, description = "Teacher record and its lessons deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Teacher not found")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    TeacherService::delete_teacher(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
