use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::timeslots::model::Weekday;

/// A lesson proposal: one reference into each catalog plus a time slot.
/// All five must belong to the same stage.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLessonDto {
    pub teacher_id: Uuid,
    pub subject_id: Uuid,
    pub room_id: Uuid,
    pub class_group_id: Uuid,
    pub timeslot_id: Uuid,
}

/// A committed lesson joined with everything a schedule view needs. The
/// stage is taken from the slot; by the same-stage invariant it matches
/// the other four references.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LessonView {
    pub id: Uuid,
    pub stage_id: Uuid,
    pub stage_name: String,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub room_id: Uuid,
    pub room_name: String,
    pub class_group_id: Uuid,
    pub class_group_name: String,
    pub timeslot_id: Uuid,
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}
