use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::modules::stages::model::{CreateStageDto, Stage};
use crate::utils::errors::AppError;

pub struct StageService;

impl StageService {
    #[instrument(skip(db, dto), fields(stage.name = %dto.name, db.operation = "INSERT", db.table = "stages"))]
    pub async fn create_stage(db: &PgPool, dto: CreateStageDto) -> Result<Stage, AppError> {
        debug!(stage.name = %dto.name, "Creating new stage");

        let stage = sqlx::query_as::<_, Stage>(
            "INSERT INTO stages (name) VALUES ($1)
             RETURNING id, name, created_at, updated_at",
        )
        .bind(&dto.name)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!(stage.name = %dto.name, "Attempted to create stage with existing name");
                return AppError::conflict(anyhow::anyhow!("Stage name already exists"));
            }
            AppError::from(e)
        })?;

        info!(stage.id = %stage.id, stage.name = %stage.name, "Stage created successfully");

        Ok(stage)
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "stages"))]
    pub async fn get_all_stages(db: &PgPool) -> Result<Vec<Stage>, AppError> {
        let stages = sqlx::query_as::<_, Stage>(
            "SELECT id, name, created_at, updated_at FROM stages ORDER BY name",
        )
        .fetch_all(db)
        .await?;

        Ok(stages)
    }

    #[instrument(skip(db), fields(stage.id = %stage_id, db.operation = "SELECT", db.table = "stages"))]
    pub async fn get_stage_by_id(db: &PgPool, stage_id: Uuid) -> Result<Stage, AppError> {
        let stage = sqlx::query_as::<_, Stage>(
            "SELECT id, name, created_at, updated_at FROM stages WHERE id = $1",
        )
        .bind(stage_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Stage not found")))?;

        Ok(stage)
    }

    /// Deletes a stage and everything it owns: lessons first, then the
    /// slots, teachers and catalogs that reference the stage, then the
    /// stage row itself, all in one transaction. The schema's
    /// `ON DELETE CASCADE` clauses are a backstop, not the invoked path.
    #[instrument(skip(db), fields(stage.id = %stage_id, db.operation = "DELETE", db.table = "stages"))]
    pub async fn delete_stage(db: &PgPool, stage_id: Uuid) -> Result<(), AppError> {
        debug!("Deleting stage and all dependents");

        let mut tx = db.begin().await?;

        let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM stages WHERE id = $1")
            .bind(stage_id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            debug!(stage.id = %stage_id, "Stage not found for deletion");
            return Err(AppError::not_found(anyhow::anyhow!("Stage not found")));
        }

        sqlx::query(
            "DELETE FROM lessons
             WHERE timeslot_id IN (SELECT id FROM timeslots WHERE stage_id = $1)",
        )
        .bind(stage_id)
        .execute(&mut *tx)
        .await?;

        for table in ["timeslots", "teachers", "subjects", "rooms", "class_groups"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE stage_id = $1"))
                .bind(stage_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM stages WHERE id = $1")
            .bind(stage_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(stage.id = %stage_id, "Stage deleted successfully");

        Ok(())
    }
}
