use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, check_any_role};
use crate::modules::catalogs::model::{
    CatalogEntry, CatalogKind, CreateCatalogEntryDto, StageScopeParams,
};
use crate::modules::catalogs::service::CatalogService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

// One set of handlers serves /api/subjects, /api/rooms and
// /api/class-groups; the router injects the kind as an extension.

#[instrument(skip(state, dto))]
pub async fn create_entry(
    State(state): State<AppState>,
    Extension(kind): Extension<CatalogKind>,
    RequireAdmin(_auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateCatalogEntryDto>,
) -> Result<(StatusCode, Json<CatalogEntry>), AppError> {
    let entry = CatalogService::create_entry(&state.db, kind, dto).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state))]
pub async fn get_entries(
    State(state): State<AppState>,
    Extension(kind): Extension<CatalogKind>,
    auth_user: AuthUser,
    Query(params): Query<StageScopeParams>,
) -> Result<Json<Vec<CatalogEntry>>, AppError> {
    check_any_role(&auth_user, &[UserRole::Admin, UserRole::Secretary])?;

    let entries = CatalogService::get_entries_for_stage(&state.db, kind, params.stage_id).await?;
    Ok(Json(entries))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(kind): Extension<CatalogKind>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    CatalogService::delete_entry(&state.db, kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
