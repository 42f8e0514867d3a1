use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::modules::users::model::{CreateUserDto, User, UserFilterParams, UserRole};
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

const USER_COLUMNS: &str = "id, username, first_name, last_name, role, created_at, updated_at";

pub struct UserService;

impl UserService {
    #[instrument(skip(db, dto), fields(user.username = %dto.username))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, first_name, last_name, password, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.username)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&hashed_password)
        .bind(dto.role)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!(user.username = %dto.username, "Attempted to create user with existing username");
                return AppError::conflict(anyhow::anyhow!("Username already exists"));
            }
            AppError::from(e)
        })?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_users(db: &PgPool, filters: UserFilterParams) -> Result<Vec<User>, AppError> {
        let users = match filters.role {
            Some(role) => {
                sqlx::query_as::<_, User>(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY username"
                ))
                .bind(role)
                .fetch_all(db)
                .await?
            }
            None => {
                sqlx::query_as::<_, User>(&format!(
                    "SELECT {USER_COLUMNS} FROM users ORDER BY username"
                ))
                .fetch_all(db)
                .await?
            }
        };

        Ok(users)
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        Ok(user)
    }

    /// Role of a user, if the user exists. Used by the teacher directory
    /// to check the identity it is about to bind.
    #[instrument(skip(db))]
    pub async fn get_user_role(db: &PgPool, id: Uuid) -> Result<Option<UserRole>, AppError> {
        let role = sqlx::query_scalar::<_, UserRole>("SELECT role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?;

        Ok(role)
    }
}
