use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::modules::lessons::model::{CreateLessonDto, LessonView};
use crate::utils::errors::AppError;

/// Joined projection used by every schedule view. The stage comes from
/// the slot; the same-stage invariant makes it the stage of all five
/// references.
const LESSON_VIEW: &str = r#"
    SELECT l.id,
           ts.stage_id,
           st.name AS stage_name,
           l.teacher_id,
           CASE WHEN trim(u.first_name || ' ' || u.last_name) = ''
                THEN u.username
                ELSE trim(u.first_name || ' ' || u.last_name)
           END AS teacher_name,
           l.subject_id,
           s.name AS subject_name,
           l.room_id,
           r.name AS room_name,
           l.class_group_id,
           g.name AS class_group_name,
           l.timeslot_id,
           ts.day,
           ts.start_time,
           ts.end_time,
           l.created_at
    FROM lessons l
    JOIN teachers t ON t.id = l.teacher_id
    JOIN users u ON u.id = t.user_id
    JOIN subjects s ON s.id = l.subject_id
    JOIN rooms r ON r.id = l.room_id
    JOIN class_groups g ON g.id = l.class_group_id
    JOIN timeslots ts ON ts.id = l.timeslot_id
    JOIN stages st ON st.id = ts.stage_id
"#;

#[derive(sqlx::FromRow)]
struct RefStages {
    teacher_stage: Option<Uuid>,
    subject_stage: Option<Uuid>,
    room_stage: Option<Uuid>,
    class_group_stage: Option<Uuid>,
    timeslot_stage: Option<Uuid>,
}

pub struct LessonService;

impl LessonService {
    /// Proposes a lesson. In one transaction: resolve the stage of each
    /// of the five references, require them all equal (a business rule,
    /// checked before and independently of the unique constraints), then
    /// insert under the three composite uniques. A violated constraint is
    /// mapped by name to the colliding resource. Postgres enforces the
    /// uniques atomically, so of two concurrent proposals for the same
    /// resource and slot exactly one commits.
    #[instrument(skip(db, dto), fields(teacher.id = %dto.teacher_id, timeslot.id = %dto.timeslot_id, db.operation = "INSERT", db.table = "lessons"))]
    pub async fn propose_lesson(db: &PgPool, dto: CreateLessonDto) -> Result<LessonView, AppError> {
        let mut tx = db.begin().await?;

        let stage_id = Self::resolve_common_stage(&mut tx, &dto).await?;

        let lesson_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO lessons (teacher_id, subject_id, room_id, class_group_id, timeslot_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(dto.teacher_id)
        .bind(dto.subject_id)
        .bind(dto.room_id)
        .bind(dto.class_group_id)
        .bind(dto.timeslot_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    let resource = match db_err.constraint() {
                        Some("uq_lessons_teacher_slot") => "teacher",
                        Some("uq_lessons_room_slot") => "room",
                        Some("uq_lessons_class_group_slot") => "class group",
                        _ => "resource",
                    };
                    warn!(conflict.resource = resource, "Lesson proposal collided");
                    return AppError::conflict(anyhow::anyhow!(
                        "The {} is already booked in this time slot",
                        resource
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::not_found(anyhow::anyhow!(
                        "A referenced record no longer exists"
                    ));
                }
            }
            AppError::from(e)
        })?;

        let lesson = sqlx::query_as::<_, LessonView>(&format!("{LESSON_VIEW} WHERE l.id = $1"))
            .bind(lesson_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(lesson.id = %lesson.id, stage.id = %stage_id, "Lesson scheduled");

        Ok(lesson)
    }

    /// Resolves the stage of each reference in one round trip and
    /// requires all five to be equal.
    async fn resolve_common_stage(
        tx: &mut Transaction<'_, Postgres>,
        dto: &CreateLessonDto,
    ) -> Result<Uuid, AppError> {
        let refs = sqlx::query_as::<_, RefStages>(
            "SELECT
                (SELECT stage_id FROM teachers WHERE id = $1) AS teacher_stage,
                (SELECT stage_id FROM subjects WHERE id = $2) AS subject_stage,
                (SELECT stage_id FROM rooms WHERE id = $3) AS room_stage,
                (SELECT stage_id FROM class_groups WHERE id = $4) AS class_group_stage,
                (SELECT stage_id FROM timeslots WHERE id = $5) AS timeslot_stage",
        )
        .bind(dto.teacher_id)
        .bind(dto.subject_id)
        .bind(dto.room_id)
        .bind(dto.class_group_id)
        .bind(dto.timeslot_id)
        .fetch_one(&mut **tx)
        .await?;

        let teacher_stage = refs
            .teacher_stage
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;
        let subject_stage = refs
            .subject_stage
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Subject not found")))?;
        let room_stage = refs
            .room_stage
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Room not found")))?;
        let class_group_stage = refs
            .class_group_stage
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class group not found")))?;
        let timeslot_stage = refs
            .timeslot_stage
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Time slot not found")))?;

        let all_same = [subject_stage, room_stage, class_group_stage, timeslot_stage]
            .iter()
            .all(|stage| *stage == teacher_stage);

        if !all_same {
            debug!("Lesson proposal references more than one stage");
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "All lesson references must belong to the same stage"
            )));
        }

        Ok(teacher_stage)
    }

    /// Deletes a lesson. Deliberately not idempotent: an unknown id is an
    /// error, not a no-op.
    #[instrument(skip(db), fields(lesson.id = %lesson_id, db.operation = "DELETE", db.table = "lessons"))]
    pub async fn withdraw_lesson(db: &PgPool, lesson_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            debug!(lesson.id = %lesson_id, "Lesson not found for withdrawal");
            return Err(AppError::not_found(anyhow::anyhow!("Lesson not found")));
        }

        info!(lesson.id = %lesson_id, "Lesson withdrawn");

        Ok(())
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "lessons"))]
    pub async fn get_all_lessons(db: &PgPool) -> Result<Vec<LessonView>, AppError> {
        let lessons = sqlx::query_as::<_, LessonView>(&format!(
            "{LESSON_VIEW} ORDER BY ts.day, ts.start_time"
        ))
        .fetch_all(db)
        .await?;

        Ok(lessons)
    }

    #[instrument(skip(db), fields(stage.id = %stage_id, db.operation = "SELECT", db.table = "lessons"))]
    pub async fn get_lessons_for_stage(
        db: &PgPool,
        stage_id: Uuid,
    ) -> Result<Vec<LessonView>, AppError> {
        let lessons = sqlx::query_as::<_, LessonView>(&format!(
            "{LESSON_VIEW} WHERE ts.stage_id = $1 ORDER BY ts.day, ts.start_time"
        ))
        .bind(stage_id)
        .fetch_all(db)
        .await?;

        Ok(lessons)
    }

    /// Lessons taught by the teacher record bound to the given identity.
    #[instrument(skip(db), fields(user.id = %user_id, db.operation = "SELECT", db.table = "lessons"))]
    pub async fn get_lessons_for_teacher(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<LessonView>, AppError> {
        let lessons = sqlx::query_as::<_, LessonView>(&format!(
            "{LESSON_VIEW} WHERE t.user_id = $1 ORDER BY ts.day, ts.start_time"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;

        Ok(lessons)
    }
}
