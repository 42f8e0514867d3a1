use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveTime;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use slateplan::config::cors::CorsConfig;
use slateplan::config::jwt::JwtConfig;
use slateplan::router::init_router;
use slateplan::state::AppState;

pub async fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool.clone(),
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

/// Create a user directly in the database. `role` is one of "admin",
/// "secretary", "teacher".
pub async fn create_test_user(pool: &PgPool, username: &str, password: &str, role: &str) -> Uuid {
    // Low cost keeps test setup fast.
    let hashed = bcrypt::hash(password, 4).unwrap();

    sqlx::query_scalar(
        "INSERT INTO users (username, first_name, last_name, password, role)
         VALUES ($1, 'Test', 'User', $2, $3::user_role)
         RETURNING id",
    )
    .bind(username)
    .bind(hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn get_auth_token(app: axum::Router, username: &str, password: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&serde_json::json!({
                "username": username,
                "password": password
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    body["access_token"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn create_test_stage(pool: &PgPool, name: &str) -> Uuid {
    sqlx::query_scalar("INSERT INTO stages (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Insert into one of the catalog tables ("subjects", "rooms",
/// "class_groups").
#[allow(dead_code)]
pub async fn create_catalog_entry(pool: &PgPool, table: &str, stage_id: Uuid, name: &str) -> Uuid {
    sqlx::query_scalar(&format!(
        "INSERT INTO {table} (stage_id, name) VALUES ($1, $2) RETURNING id"
    ))
    .bind(stage_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_teacher_record(pool: &PgPool, user_id: Uuid, stage_id: Uuid) -> Uuid {
    sqlx::query_scalar("INSERT INTO teachers (user_id, stage_id) VALUES ($1, $2) RETURNING id")
        .bind(user_id)
        .bind(stage_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn create_test_timeslot(
    pool: &PgPool,
    stage_id: Uuid,
    day: &str,
    start: &str,
    end: &str,
) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO timeslots (stage_id, day, start_time, end_time)
         VALUES ($1, $2::weekday, $3, $4)
         RETURNING id",
    )
    .bind(stage_id)
    .bind(day)
    .bind(NaiveTime::parse_from_str(start, "%H:%M").unwrap())
    .bind(NaiveTime::parse_from_str(end, "%H:%M").unwrap())
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Fire an authenticated JSON request and return status plus parsed body
/// (Null for empty bodies).
#[allow(dead_code)]
pub async fn api_request(
    app: axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = builder
        .body(match body {
            Some(body) => Body::from(serde_json::to_string(&body).unwrap()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn unique_username() -> String {
    format!("user-{}", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn unique_name(prefix: &str) -> String {
    format!("{} {}", prefix, Uuid::new_v4())
}
