use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::{ErrorResponse, ProfileResponse};
use crate::modules::auth::model::{LoginRequest, LoginResponse};
use crate::modules::lessons::model::{CreateLessonDto, LessonView};
use crate::modules::stages::model::{CreateStageDto, Stage};
use crate::modules::teachers::model::{CreateTeacherDto, Teacher, TeacherView};
use crate::modules::timeslots::model::{CreateTimeSlotDto, TimeSlot, Weekday};
use crate::modules::users::model::{CreateUserDto, User, UserRole};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_profile,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::stages::controller::create_stage,
        crate::modules::stages::controller::get_stages,
        crate::modules::stages::controller::get_stage,
        crate::modules::stages::controller::delete_stage,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::timeslots::controller::create_timeslot,
        crate::modules::timeslots::controller::get_timeslots,
        crate::modules::timeslots::controller::delete_timeslot,
        crate::modules::lessons::controller::create_lesson,
        crate::modules::lessons::controller::delete_lesson,
        crate::modules::lessons::controller::get_all_lessons,
        crate::modules::lessons::controller::get_my_lessons,
        crate::modules::lessons::controller::get_stage_lessons,
    ),
    components(
        schemas(
            User,
            UserRole,
            CreateUserDto,
            LoginRequest,
            LoginResponse,
            ProfileResponse,
            ErrorResponse,
            Stage,
            CreateStageDto,
            Teacher,
            TeacherView,
            CreateTeacherDto,
            TimeSlot,
            Weekday,
            CreateTimeSlotDto,
            LessonView,
            CreateLessonDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User authentication endpoints"),
        (name = "Users", description = "Identity management endpoints"),
        (name = "Stages", description = "Academic stage registry"),
        (name = "Teachers", description = "Teacher directory"),
        (name = "TimeSlots", description = "Weekly time-slot calendar"),
        (name = "Lessons", description = "The lesson ledger and schedule views")
    ),
    info(
        title = "Slateplan API",
        version = "0.1.0",
        description = "A REST API built with Rust, Axum, and PostgreSQL for managing school timetables without double-booking teachers, rooms or class groups.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
