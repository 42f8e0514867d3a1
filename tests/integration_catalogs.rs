mod common;

use axum::http::StatusCode;
use common::{
    api_request, create_catalog_entry, create_test_stage, create_test_user, get_auth_token,
    setup_test_app, unique_name, unique_username,
};
use serde_json::json;
use sqlx::PgPool;

async fn admin_token(pool: &PgPool) -> String {
    let admin = unique_username();
    create_test_user(pool, &admin, "testpass123", "admin").await;
    let app = setup_test_app(pool.clone()).await;
    get_auth_token(app, &admin, "testpass123").await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_subject(pool: PgPool) {
    let token = admin_token(&pool).await;
    let stage_id = create_test_stage(&pool, &unique_name("Stage")).await;

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = api_request(
        app,
        "POST",
        "/api/subjects",
        Some(&token),
        Some(json!({"stage_id": stage_id, "name": "Maths"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Maths");
    assert_eq!(body["stage_id"], stage_id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_name_within_stage_conflicts(pool: PgPool) {
    let token = admin_token(&pool).await;
    let stage_id = create_test_stage(&pool, &unique_name("Stage")).await;
    create_catalog_entry(&pool, "rooms", stage_id, "Room 201").await;

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = api_request(
        app,
        "POST",
        "/api/rooms",
        Some(&token),
        Some(json!({"stage_id": stage_id, "name": "Room 201"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already exists"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_same_name_in_different_stages_allowed(pool: PgPool) {
    let token = admin_token(&pool).await;
    let middle = create_test_stage(&pool, &unique_name("Middle")).await;
    let high = create_test_stage(&pool, &unique_name("High")).await;
    create_catalog_entry(&pool, "subjects", middle, "Maths").await;

    let app = setup_test_app(pool.clone()).await;
    let (status, _) = api_request(
        app,
        "POST",
        "/api/subjects",
        Some(&token),
        Some(json!({"stage_id": high, "name": "Maths"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_entry_for_unknown_stage_not_found(pool: PgPool) {
    let token = admin_token(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let (status, _) = api_request(
        app,
        "POST",
        "/api/class-groups",
        Some(&token),
        Some(json!({"stage_id": uuid::Uuid::new_v4(), "name": "10A"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_is_stage_scoped_and_ordered(pool: PgPool) {
    let token = admin_token(&pool).await;
    let middle = create_test_stage(&pool, &unique_name("Middle")).await;
    let high = create_test_stage(&pool, &unique_name("High")).await;
    create_catalog_entry(&pool, "class_groups", middle, "6B").await;
    create_catalog_entry(&pool, "class_groups", middle, "6A").await;
    create_catalog_entry(&pool, "class_groups", high, "10A").await;

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = api_request(
        app,
        "GET",
        &format!("/api/class-groups?stage_id={}", middle),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    // Ordered by name, and never an entry from another stage.
    let names: Vec<&str> = entries.iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["6A", "6B"]);
    assert!(
        entries
            .iter()
            .all(|e| e["stage_id"] == middle.to_string().as_str())
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_cannot_read_catalogs(pool: PgPool) {
    let teacher = unique_username();
    create_test_user(&pool, &teacher, "testpass123", "teacher").await;
    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, &teacher, "testpass123").await;

    let stage_id = create_test_stage(&pool, &unique_name("Stage")).await;

    let app = setup_test_app(pool.clone()).await;
    let (status, _) = api_request(
        app,
        "GET",
        &format!("/api/subjects?stage_id={}", stage_id),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_entry_removes_dependent_lessons(pool: PgPool) {
    let token = admin_token(&pool).await;
    let stage_id = create_test_stage(&pool, &unique_name("Stage")).await;
    let subject_id = create_catalog_entry(&pool, "subjects", stage_id, "Maths").await;
    let room_id = create_catalog_entry(&pool, "rooms", stage_id, "Room 201").await;
    let group_id = create_catalog_entry(&pool, "class_groups", stage_id, "10A").await;
    let slot_id = common::create_test_timeslot(&pool, stage_id, "monday", "08:00", "09:00").await;
    let user_id = create_test_user(&pool, &unique_username(), "testpass123", "teacher").await;
    let teacher_id = common::create_teacher_record(&pool, user_id, stage_id).await;

    sqlx::query(
        "INSERT INTO lessons (teacher_id, subject_id, room_id, class_group_id, timeslot_id)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(teacher_id)
    .bind(subject_id)
    .bind(room_id)
    .bind(group_id)
    .bind(slot_id)
    .execute(&pool)
    .await
    .unwrap();

    let app = setup_test_app(pool.clone()).await;
    let (status, _) = api_request(
        app,
        "DELETE",
        &format!("/api/rooms/{}", room_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let lessons: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(lessons, 0);
}
