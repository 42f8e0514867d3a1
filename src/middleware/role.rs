//! Role-based authorization extractors.
//!
//! Single-role routes use the extractors produced by [`require_role!`];
//! routes open to more than one role take a plain [`AuthUser`] and call
//! [`check_any_role`] in the handler.

use anyhow::anyhow;

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;

/// Defines an extractor that authenticates the caller and rejects any
/// role other than the given one with 403.
#[macro_export]
macro_rules! require_role {
    ($name:ident, $role:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = $crate::utils::errors::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                if auth_user.role() != $role {
                    return Err($crate::utils::errors::AppError::forbidden(anyhow::anyhow!(
                        "Access denied. Required role: {}, but user has role: {}",
                        $role,
                        auth_user.role()
                    )));
                }

                Ok($name(auth_user))
            }
        }
    };
}

require_role!(RequireAdmin, UserRole::Admin);
require_role!(RequireSecretary, UserRole::Secretary);
require_role!(RequireTeacherRole, UserRole::Teacher);

/// Check that the caller holds one of the allowed roles.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn handler(auth_user: AuthUser) -> Result<Json<Response>, AppError> {
///     check_any_role(&auth_user, &[UserRole::Admin, UserRole::Secretary])?;
///     // Handler logic
/// }
/// ```
pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    if !allowed_roles.contains(&auth_user.role()) {
        return Err(AppError::forbidden(anyhow!(
            "Access denied. Required roles: {:?}, but user has role: {}",
            allowed_roles,
            auth_user.role()
        )));
    }

    Ok(())
}
