use axum::{Extension, Router, routing::get, routing::delete};

use crate::state::AppState;

use super::controller::{create_entry, delete_entry, get_entries};
use super::model::CatalogKind;

pub fn init_catalog_router(kind: CatalogKind) -> Router<AppState> {
    Router::new()
        .route("/", get(get_entries).post(create_entry))
        .route("/{id}", delete(delete_entry))
        .layer(Extension(kind))
}
