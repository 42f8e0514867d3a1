use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_stage, delete_stage, get_stage, get_stages};

pub fn init_stages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_stages).post(create_stage))
        .route("/{stage_id}", get(get_stage).delete(delete_stage))
}
