use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_user, get_users};

pub fn init_users_router() -> Router<AppState> {
    Router::new().route("/", get(get_users).post(create_user))
}
