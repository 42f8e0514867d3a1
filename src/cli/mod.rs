use sqlx::PgPool;

use crate::modules::users::model::UserRole;
use crate::utils::password::hash_password;

pub mod seeder;

/// Bootstrap an administrator account. Admins are created via CLI only,
/// never through the API.
pub async fn create_admin(
    db: &PgPool,
    username: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let result = sqlx::query(
        "INSERT INTO users (username, first_name, last_name, password, role)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (username) DO NOTHING",
    )
    .bind(username)
    .bind(first_name)
    .bind(last_name)
    .bind(hashed_password)
    .bind(UserRole::Admin)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("User with this username already exists".into());
    }

    Ok(())
}
