use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A teacher record binds one identity to one stage. The binding is
/// one-to-one and immutable; a teacher never moves between stages.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Teacher {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stage_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Teacher joined with its identity for listings.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TeacherView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stage_id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl TeacherView {
    /// Display name, falling back to the username when no name is set.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeacherDto {
    pub user_id: Uuid,
    pub stage_id: Uuid,
}
