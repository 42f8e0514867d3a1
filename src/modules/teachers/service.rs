use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::modules::teachers::model::{CreateTeacherDto, Teacher, TeacherView};
use crate::modules::users::model::UserRole;
use crate::modules::users::service::UserService;
use crate::utils::errors::AppError;

pub struct TeacherService;

impl TeacherService {
    /// Binds an identity to a stage. The identity must exist and hold the
    /// `teacher` role; an identity can hold at most one teacher record.
    #[instrument(skip(db, dto), fields(user.id = %dto.user_id, stage.id = %dto.stage_id))]
    pub async fn create_teacher(db: &PgPool, dto: CreateTeacherDto) -> Result<Teacher, AppError> {
        let role = UserService::get_user_role(db, dto.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        if role != UserRole::Teacher {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "User does not hold the teacher role"
            )));
        }

        let stage_exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM stages WHERE id = $1")
            .bind(dto.stage_id)
            .fetch_optional(db)
            .await?;

        if stage_exists.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("Stage not found")));
        }

        let teacher = sqlx::query_as::<_, Teacher>(
            "INSERT INTO teachers (user_id, stage_id) VALUES ($1, $2)
             RETURNING id, user_id, stage_id, created_at, updated_at",
        )
        .bind(dto.user_id)
        .bind(dto.stage_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!(user.id = %dto.user_id, "Identity already bound to a teacher record");
                return AppError::conflict(anyhow::anyhow!(
                    "This user already has a teacher record"
                ));
            }
            AppError::from(e)
        })?;

        info!(teacher.id = %teacher.id, "Teacher record created");

        Ok(teacher)
    }

    #[instrument(skip(db), fields(stage.id = %stage_id))]
    pub async fn get_teachers_for_stage(
        db: &PgPool,
        stage_id: Uuid,
    ) -> Result<Vec<TeacherView>, AppError> {
        let teachers = sqlx::query_as::<_, TeacherView>(
            "SELECT t.id, t.user_id, t.stage_id, u.username, u.first_name, u.last_name
             FROM teachers t
             JOIN users u ON u.id = t.user_id
             WHERE t.stage_id = $1
             ORDER BY u.last_name, u.first_name, u.username",
        )
        .bind(stage_id)
        .fetch_all(db)
        .await?;

        Ok(teachers)
    }

    /// Deletes the teacher record and, first, its lessons, in one
    /// transaction. The identity record is untouched.
    #[instrument(skip(db), fields(teacher.id = %teacher_id))]
    pub async fn delete_teacher(db: &PgPool, teacher_id: Uuid) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        sqlx::query("DELETE FROM lessons WHERE teacher_id = $1")
            .bind(teacher_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(teacher_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Teacher not found")));
        }

        tx.commit().await?;

        info!(teacher.id = %teacher_id, "Teacher record deleted");

        Ok(())
    }
}
