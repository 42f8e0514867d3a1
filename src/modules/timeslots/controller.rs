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
use crate::modules::timeslots::model::{CreateTimeSlotDto, TimeSlot};
use crate::modules::timeslots::service::TimeSlotService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/timeslots",
    request_body = CreateTimeSlotDto,
    responses(
        (status = 201, description = "Time slot created", body = TimeSlot),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Stage not found"),
        (status = 409, description = "Identical time slot already exists")
    ),
    tag = "TimeSlots",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_timeslot(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateTimeSlotDto>,
) -> Result<(StatusCode, Json<TimeSlot>), AppError> {
    let slot = TimeSlotService::create_timeslot(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

#[utoipa::path(
    get,
    path = "/api/timeslots",
    params(StageScopeParams),
    responses(
        (status = 200, description = "Slots in the stage ordered by day then start time", body = Vec<TimeSlot>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "TimeSlots",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_timeslots(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<StageScopeParams>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    check_any_role(&auth_user, &[UserRole::Admin, UserRole::Secretary])?;

    let slots = TimeSlotService::get_timeslots_for_stage(&state.db, params.stage_id).await?;
    Ok(Json(slots))
}

#[utoipa::path(
    delete,
    path = "/api/timeslots/{id}",
    params(
        ("id" = Uuid, Path, description = "Time slot ID")
    ),
    responses(
        (status = 204, description = "Time slot and its lessons deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Time slot not found")
    ),
    tag = "TimeSlots",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_timeslot(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    TimeSlotService::delete_timeslot(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
