use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// An academic stage, the top-level partition. Every catalog entry, time
/// slot and teacher belongs to exactly one stage.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Stage {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStageDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}
