use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::modules::timeslots::model::{CreateTimeSlotDto, TimeSlot};
use crate::utils::errors::AppError;

const SLOT_COLUMNS: &str = "id, stage_id, day, start_time, end_time, created_at, updated_at";

pub struct TimeSlotService;

impl TimeSlotService {
    /// Creates a slot. Rejects an exact `(stage, day, start, end)`
    /// duplicate; does not validate `start < end` and does not check for
    /// overlap with other slots.
    #[instrument(skip(db, dto), fields(stage.id = %dto.stage_id, slot.day = ?dto.day))]
    pub async fn create_timeslot(
        db: &PgPool,
        dto: CreateTimeSlotDto,
    ) -> Result<TimeSlot, AppError> {
        let stage_exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM stages WHERE id = $1")
            .bind(dto.stage_id)
            .fetch_optional(db)
            .await?;

        if stage_exists.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("Stage not found")));
        }

        let slot = sqlx::query_as::<_, TimeSlot>(&format!(
            "INSERT INTO timeslots (stage_id, day, start_time, end_time)
             VALUES ($1, $2, $3, $4)
             RETURNING {SLOT_COLUMNS}"
        ))
        .bind(dto.stage_id)
        .bind(dto.day)
        .bind(dto.start_time)
        .bind(dto.end_time)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!(stage.id = %dto.stage_id, "Exact duplicate time slot");
                return AppError::conflict(anyhow::anyhow!(
                    "An identical time slot already exists in this stage"
                ));
            }
            AppError::from(e)
        })?;

        info!(slot.id = %slot.id, "Time slot created");

        Ok(slot)
    }

    #[instrument(skip(db), fields(stage.id = %stage_id))]
    pub async fn get_timeslots_for_stage(
        db: &PgPool,
        stage_id: Uuid,
    ) -> Result<Vec<TimeSlot>, AppError> {
        let slots = sqlx::query_as::<_, TimeSlot>(&format!(
            "SELECT {SLOT_COLUMNS} FROM timeslots
             WHERE stage_id = $1
             ORDER BY day, start_time"
        ))
        .bind(stage_id)
        .fetch_all(db)
        .await?;

        Ok(slots)
    }

    /// Deletes the slot and, first, its lessons, in one transaction.
    #[instrument(skip(db), fields(slot.id = %slot_id))]
    pub async fn delete_timeslot(db: &PgPool, slot_id: Uuid) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        sqlx::query("DELETE FROM lessons WHERE timeslot_id = $1")
            .bind(slot_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM timeslots WHERE id = $1")
            .bind(slot_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Time slot not found")));
        }

        tx.commit().await?;

        info!(slot.id = %slot_id, "Time slot deleted");

        Ok(())
    }
}
