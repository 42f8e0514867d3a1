use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::auth::router::init_auth_router;
use crate::modules::catalogs::model::CatalogKind;
use crate::modules::catalogs::router::init_catalog_router;
use crate::modules::lessons::router::{init_lessons_router, init_stage_lessons_router};
use crate::modules::stages::router::init_stages_router;
use crate::modules::teachers::router::init_teachers_router;
use crate::modules::timeslots::router::init_timeslots_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/users", init_users_router())
                .nest(
                    "/stages",
                    init_stages_router()
                        .nest("/{stage_id}/lessons", init_stage_lessons_router()),
                )
                .nest("/subjects", init_catalog_router(CatalogKind::Subject))
                .nest("/rooms", init_catalog_router(CatalogKind::Room))
                .nest("/class-groups", init_catalog_router(CatalogKind::ClassGroup))
                .nest("/teachers", init_teachers_router())
                .nest("/timeslots", init_timeslots_router())
                .nest("/lessons", init_lessons_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
