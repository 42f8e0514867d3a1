use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_lesson, delete_lesson, get_all_lessons, get_my_lessons, get_stage_lessons,
};

pub fn init_lessons_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_lessons).post(create_lesson))
        .route("/mine", get(get_my_lessons))
        .route("/{id}", axum::routing::delete(delete_lesson))
}

/// Nested under `/api/stages/{stage_id}/lessons`.
pub fn init_stage_lessons_router() -> Router<AppState> {
    Router::new().route("/", get(get_stage_lessons))
}
