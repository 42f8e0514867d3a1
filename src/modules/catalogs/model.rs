use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// The three per-stage catalog types share one table shape and one
/// contract, so they share one service. The kind selects the table; it is
/// a closed set, never user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Subject,
    Room,
    ClassGroup,
}

impl CatalogKind {
    pub fn table(self) -> &'static str {
        match self {
            CatalogKind::Subject => "subjects",
            CatalogKind::Room => "rooms",
            CatalogKind::ClassGroup => "class_groups",
        }
    }

    /// Column on `lessons` referencing this catalog.
    pub fn lesson_column(self) -> &'static str {
        match self {
            CatalogKind::Subject => "subject_id",
            CatalogKind::Room => "room_id",
            CatalogKind::ClassGroup => "class_group_id",
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            CatalogKind::Subject => "subject",
            CatalogKind::Room => "room",
            CatalogKind::ClassGroup => "class group",
        }
    }
}

/// A named per-stage resource: a subject, room or class group.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub stage_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCatalogEntryDto {
    pub stage_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct StageScopeParams {
    pub stage_id: Uuid,
}
