use axum::{extract::FromRequestParts, http::header};
use uuid::Uuid;

use crate::{
    error::AppError,
    tokens::{ACCESS_TOKEN_KIND, decode_token, jwt_secret},
};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    if !user.is_admin() {
        return Err(AppError::forbidden("FORBIDDEN", "Admin access required"));
    }
    Ok(())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::unauthorized("NO_TOKEN", "No token provided"))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::unauthorized("INVALID_TOKEN", "Invalid Authorization header"))?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::unauthorized(
                "INVALID_TOKEN",
                "Invalid Authorization scheme",
            ));
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();

        let secret = jwt_secret()?;

        let claims = decode_token(&secret, token)
            .ok_or_else(|| AppError::unauthorized("INVALID_TOKEN", "Invalid or expired token"))?;

        if claims.kind != ACCESS_TOKEN_KIND {
            return Err(AppError::unauthorized(
                "INVALID_TOKEN",
                "Refresh token cannot be used for access",
            ));
        }

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("INVALID_TOKEN", "Invalid user id in token"))?;

        Ok(AuthUser {
            user_id,
            role: claims.role,
        })
    }
}
