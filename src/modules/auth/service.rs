use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::users::model::{User, UserRole};
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::verify_password;

use super::model::{LoginRequest, LoginResponse};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config), fields(user.username = %dto.username))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: Uuid,
            username: String,
            first_name: String,
            last_name: String,
            password: String,
            role: UserRole,
            created_at: chrono::DateTime<chrono::Utc>,
            updated_at: chrono::DateTime<chrono::Utc>,
        }

        // One message for unknown username and bad password.
        let user_with_password = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, username, first_name, last_name, password, role, created_at, updated_at
             FROM users WHERE username = $1",
        )
        .bind(&dto.username)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(anyhow!("Invalid username or password")))?;

        let is_valid = verify_password(&dto.password, &user_with_password.password)?;

        if !is_valid {
            return Err(AppError::unauthorized(anyhow!(
                "Invalid username or password"
            )));
        }

        let access_token = create_access_token(
            user_with_password.id,
            &user_with_password.username,
            user_with_password.role,
            jwt_config,
        )?;

        let user = User {
            id: user_with_password.id,
            username: user_with_password.username,
            first_name: user_with_password.first_name,
            last_name: user_with_password.last_name,
            role: user_with_password.role,
            created_at: user_with_password.created_at,
            updated_at: user_with_password.updated_at,
        };

        Ok(LoginResponse { access_token, user })
    }
}
