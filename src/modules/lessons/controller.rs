use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireSecretary, RequireTeacherRole, check_any_role};
use crate::modules::lessons::model::{CreateLessonDto, LessonView};
use crate::modules::lessons::service::LessonService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/lessons",
    request_body = CreateLessonDto,
    responses(
        (status = 201, description = "Lesson scheduled", body = LessonView),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - secretary only"),
        (status = 404, description = "A referenced record does not exist"),
        (status = 409, description = "The teacher, room or class group is already booked in this slot"),
        (status = 422, description = "References do not all belong to one stage")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_lesson(
    State(state): State<AppState>,
    RequireSecretary(_auth_user): RequireSecretary,
    ValidatedJson(dto): ValidatedJson<CreateLessonDto>,
) -> Result<(StatusCode, Json<LessonView>), AppError> {
    let lesson = LessonService::propose_lesson(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

#[utoipa::path(
    delete,
    path = "/api/lessons/{id}",
    params(
        ("id" = Uuid, Path, description = "Lesson ID")
    ),
    responses(
        (status = 204, description = "Lesson withdrawn"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - secretary only"),
        (status = 404, description = "Lesson not found")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_lesson(
    State(state): State<AppState>,
    RequireSecretary(_auth_user): RequireSecretary,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    LessonService::withdraw_lesson(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/lessons",
    responses(
        (status = 200, description = "The full schedule ordered by day then start time", body = Vec<LessonView>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_all_lessons(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
) -> Result<Json<Vec<LessonView>>, AppError> {
    let lessons = LessonService::get_all_lessons(&state.db).await?;
    Ok(Json(lessons))
}

/// The caller's own schedule, resolved from the token identity.
#[utoipa::path(
    get,
    path = "/api/lessons/mine",
    responses(
        (status = 200, description = "The caller's lessons ordered by day then start time", body = Vec<LessonView>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - teacher only")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_my_lessons(
    State(state): State<AppState>,
    RequireTeacherRole(auth_user): RequireTeacherRole,
) -> Result<Json<Vec<LessonView>>, AppError> {
    let user_id = auth_user.user_id()?;
    let lessons = LessonService::get_lessons_for_teacher(&state.db, user_id).await?;
    Ok(Json(lessons))
}

#[utoipa::path(
    get,
    path = "/api/stages/{stage_id}/lessons",
    params(
        ("stage_id" = Uuid, Path, description = "Stage ID")
    ),
    responses(
        (status = 200, description = "The stage schedule ordered by day then start time", body = Vec<LessonView>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_stage_lessons(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(stage_id): Path<Uuid>,
) -> Result<Json<Vec<LessonView>>, AppError> {
    check_any_role(&auth_user, &[UserRole::Admin, UserRole::Secretary])?;

    let lessons = LessonService::get_lessons_for_stage(&state.db, stage_id).await?;
    Ok(Json(lessons))
}
