mod common;

use axum::http::StatusCode;
use common::{
    api_request, create_catalog_entry, create_teacher_record, create_test_stage,
    create_test_timeslot, create_test_user, get_auth_token, setup_test_app, unique_name,
    unique_username,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// One fully wired stage: a teacher, one entry in each catalog and a
/// Monday morning slot.
struct Fixture {
    stage_id: Uuid,
    teacher_id: Uuid,
    teacher_username: String,
    subject_id: Uuid,
    room_id: Uuid,
    group_id: Uuid,
    slot_id: Uuid,
}

async fn build_fixture(pool: &PgPool) -> Fixture {
    let stage_id = create_test_stage(pool, &unique_name("Stage")).await;
    let teacher_username = unique_username();
    let user_id = create_test_user(pool, &teacher_username, "testpass123", "teacher").await;
    let teacher_id = create_teacher_record(pool, user_id, stage_id).await;
    let subject_id = create_catalog_entry(pool, "subjects", stage_id, "Maths").await;
    let room_id = create_catalog_entry(pool, "rooms", stage_id, "Room 201").await;
    let group_id = create_catalog_entry(pool, "class_groups", stage_id, "10A").await;
    let slot_id = create_test_timeslot(pool, stage_id, "monday", "08:00", "09:00").await;

    Fixture {
        stage_id,
        teacher_id,
        teacher_username,
        subject_id,
        room_id,
        group_id,
        slot_id,
    }
}

impl Fixture {
    fn lesson_body(&self) -> serde_json::Value {
        json!({
            "teacher_id": self.teacher_id,
            "subject_id": self.subject_id,
            "room_id": self.room_id,
            "class_group_id": self.group_id,
            "timeslot_id": self.slot_id
        })
    }
}

async fn role_token(pool: &PgPool, role: &str) -> String {
    let username = unique_username();
    create_test_user(pool, &username, "testpass123", role).await;
    let app = setup_test_app(pool.clone()).await;
    get_auth_token(app, &username, "testpass123").await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_secretary_schedules_lesson(pool: PgPool) {
    let token = role_token(&pool, "secretary").await;
    let fx = build_fixture(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = api_request(
        app,
        "POST",
        "/api/lessons",
        Some(&token),
        Some(fx.lesson_body()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["subject_name"], "Maths");
    assert_eq!(body["room_name"], "Room 201");
    assert_eq!(body["class_group_name"], "10A");
    assert_eq!(body["day"], "monday");
    assert_eq!(body["stage_id"], fx.stage_id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_cannot_schedule_lesson(pool: PgPool) {
    let token = role_token(&pool, "admin").await;
    let fx = build_fixture(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let (status, _) = api_request(
        app,
        "POST",
        "/api/lessons",
        Some(&token),
        Some(fx.lesson_body()),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_double_booked_room_conflicts(pool: PgPool) {
    let token = role_token(&pool, "secretary").await;
    let fx = build_fixture(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let (status, _) = api_request(
        app,
        "POST",
        "/api/lessons",
        Some(&token),
        Some(fx.lesson_body()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // A second teacher and group in the same room and slot.
    let other_user =
        create_test_user(&pool, &unique_username(), "testpass123", "teacher").await;
    let other_teacher = create_teacher_record(&pool, other_user, fx.stage_id).await;
    let other_group = create_catalog_entry(&pool, "class_groups", fx.stage_id, "10B").await;

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = api_request(
        app,
        "POST",
        "/api/lessons",
        Some(&token),
        Some(json!({
            "teacher_id": other_teacher,
            "subject_id": fx.subject_id,
            "room_id": fx.room_id,
            "class_group_id": other_group,
            "timeslot_id": fx.slot_id
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        "The room is already booked in this time slot"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cross_stage_references_rejected(pool: PgPool) {
    let token = role_token(&pool, "secretary").await;
    let fx = build_fixture(&pool).await;

    let other_stage = create_test_stage(&pool, &unique_name("Other")).await;
    let foreign_room = create_catalog_entry(&pool, "rooms", other_stage, "Room 201").await;

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = api_request(
        app,
        "POST",
        "/api/lessons",
        Some(&token),
        Some(json!({
            "teacher_id": fx.teacher_id,
            "subject_id": fx.subject_id,
            "room_id": foreign_room,
            "class_group_id": fx.group_id,
            "timeslot_id": fx.slot_id
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("stage"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_reference_not_found(pool: PgPool) {
    let token = role_token(&pool, "secretary").await;
    let fx = build_fixture(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let (status, _) = api_request(
        app,
        "POST",
        "/api/lessons",
        Some(&token),
        Some(json!({
            "teacher_id": fx.teacher_id,
            "subject_id": Uuid::new_v4(),
            "room_id": fx.room_id,
            "class_group_id": fx.group_id,
            "timeslot_id": fx.slot_id
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_withdraw_frees_the_slot(pool: PgPool) {
    let token = role_token(&pool, "secretary").await;
    let fx = build_fixture(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = api_request(
        app,
        "POST",
        "/api/lessons",
        Some(&token),
        Some(fx.lesson_body()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let lesson_id = body["id"].as_str().unwrap().to_string();

    let app = setup_test_app(pool.clone()).await;
    let (status, _) = api_request(
        app,
        "DELETE",
        &format!("/api/lessons/{}", lesson_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Withdrawing again is an error, not a no-op.
    let app = setup_test_app(pool.clone()).await;
    let (status, _) = api_request(
        app,
        "DELETE",
        &format!("/api/lessons/{}", lesson_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The slot is available again.
    let app = setup_test_app(pool.clone()).await;
    let (status, _) = api_request(
        app,
        "POST",
        "/api/lessons",
        Some(&token),
        Some(fx.lesson_body()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_full_schedule_is_admin_only(pool: PgPool) {
    let secretary = role_token(&pool, "secretary").await;

    let app = setup_test_app(pool.clone()).await;
    let (status, _) = api_request(app, "GET", "/api/lessons", Some(&secretary), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = role_token(&pool, "admin").await;
    let app = setup_test_app(pool.clone()).await;
    let (status, body) = api_request(app, "GET", "/api/lessons", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stage_schedule_scoped_to_stage(pool: PgPool) {
    let secretary = role_token(&pool, "secretary").await;
    let fx = build_fixture(&pool).await;
    let other = build_fixture(&pool).await;

    for f in [&fx, &other] {
        let app = setup_test_app(pool.clone()).await;
        let (status, _) = api_request(
            app,
            "POST",
            "/api/lessons",
            Some(&secretary),
            Some(f.lesson_body()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = api_request(
        app,
        "GET",
        &format!("/api/stages/{}/lessons", fx.stage_id),
        Some(&secretary),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let lessons = body.as_array().unwrap();
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0]["stage_id"], fx.stage_id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_my_lessons_shows_only_own_schedule(pool: PgPool) {
    let secretary = role_token(&pool, "secretary").await;
    let fx = build_fixture(&pool).await;
    let other = build_fixture(&pool).await;

    for f in [&fx, &other] {
        let app = setup_test_app(pool.clone()).await;
        let (status, _) = api_request(
            app,
            "POST",
            "/api/lessons",
            Some(&secretary),
            Some(f.lesson_body()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let app = setup_test_app(pool.clone()).await;
    let teacher_token = get_auth_token(app, &fx.teacher_username, "testpass123").await;

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = api_request(app, "GET", "/api/lessons/mine", Some(&teacher_token), None).await;

    assert_eq!(status, StatusCode::OK);
    let lessons = body.as_array().unwrap();
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0]["teacher_id"], fx.teacher_id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_secretary_cannot_read_my_lessons(pool: PgPool) {
    let secretary = role_token(&pool, "secretary").await;

    let app = setup_test_app(pool.clone()).await;
    let (status, _) = api_request(app, "GET", "/api/lessons/mine", Some(&secretary), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
