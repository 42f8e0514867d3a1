use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// School days. The Postgres enum declares the same order, so `ORDER BY
/// day` sorts Monday through Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "weekday", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

/// A fixed weekly period within a stage. Only exact duplicates are
/// rejected; overlapping ranges are allowed and slot curation is left to
/// the operator.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TimeSlot {
    pub id: Uuid,
    pub stage_id: Uuid,
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTimeSlotDto {
    pub stage_id: Uuid,
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}
