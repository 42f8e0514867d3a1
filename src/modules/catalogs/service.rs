use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::modules::catalogs::model::{CatalogEntry, CatalogKind, CreateCatalogEntryDto};
use crate::utils::errors::AppError;

pub struct CatalogService;

impl CatalogService {
    #[instrument(skip(db, dto), fields(catalog.kind = kind.table(), catalog.name = %dto.name))]
    pub async fn create_entry(
        db: &PgPool,
        kind: CatalogKind,
        dto: CreateCatalogEntryDto,
    ) -> Result<CatalogEntry, AppError> {
        let stage_exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM stages WHERE id = $1")
            .bind(dto.stage_id)
            .fetch_optional(db)
            .await?;

        if stage_exists.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("Stage not found")));
        }

        let query = format!(
            "INSERT INTO {} (stage_id, name) VALUES ($1, $2)
             RETURNING id, stage_id, name, created_at, updated_at",
            kind.table()
        );

        let entry = sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(dto.stage_id)
            .bind(&dto.name)
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    warn!(catalog.name = %dto.name, "Duplicate name within stage");
                    return AppError::conflict(anyhow::anyhow!(
                        "A {} with this name already exists in this stage",
                        kind.noun()
                    ));
                }
                AppError::from(e)
            })?;

        info!(catalog.id = %entry.id, catalog.name = %entry.name, "Catalog entry created");

        Ok(entry)
    }

    #[instrument(skip(db), fields(catalog.kind = kind.table(), stage.id = %stage_id))]
    pub async fn get_entries_for_stage(
        db: &PgPool,
        kind: CatalogKind,
        stage_id: Uuid,
    ) -> Result<Vec<CatalogEntry>, AppError> {
        let query = format!(
            "SELECT id, stage_id, name, created_at, updated_at
             FROM {} WHERE stage_id = $1 ORDER BY name",
            kind.table()
        );

        let entries = sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(stage_id)
            .fetch_all(db)
            .await?;

        Ok(entries)
    }

    /// Deletes the entry and, first, every lesson that references it, in
    /// one transaction.
    #[instrument(skip(db), fields(catalog.kind = kind.table(), catalog.id = %id))]
    pub async fn delete_entry(db: &PgPool, kind: CatalogKind, id: Uuid) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        sqlx::query(&format!(
            "DELETE FROM lessons WHERE {} = $1",
            kind.lesson_column()
        ))
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", kind.table()))
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            debug!(catalog.id = %id, "Entry not found for deletion");
            return Err(AppError::not_found(anyhow::anyhow!(
                "{} not found",
                kind.noun()
            )));
        }

        tx.commit().await?;

        info!(catalog.id = %id, "Catalog entry deleted");

        Ok(())
    }
}
