use axum::{Router, routing::delete, routing::get};

use crate::state::AppState;

use super::controller::{create_timeslot, delete_timeslot, get_timeslots};

pub fn init_timeslots_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_timeslots).post(create_timeslot))
        .route("/{id}", delete(delete_timeslot))
}
