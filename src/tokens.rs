use std::collections::HashSet;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const ACCESS_TOKEN_KIND: &str = "access";
pub const REFRESH_TOKEN_KIND: &str = "refresh";

const ACCESS_TOKEN_HOURS: i64 = 1;
const REFRESH_TOKEN_DAYS: i64 = 7;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub kind: String,
    pub exp: usize,
}

/// Issued refresh tokens, revocable until they expire. Owned by `AppState`;
/// process-local and lost on restart.
pub struct TokenRegistry {
    inner: RwLock<HashSet<String>>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashSet::new()),
        }
    }

    pub async fn insert(&self, token: impl Into<String>) {
        self.inner.write().await.insert(token.into());
    }

    pub async fn contains(&self, token: &str) -> bool {
        self.inner.read().await.contains(token)
    }

    /// Returns whether the token was present.
    pub async fn revoke(&self, token: &str) -> bool {
        self.inner.write().await.remove(token)
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub fn issue_access_token(secret: &str, user_id: Uuid, role: &str) -> AppResult<String> {
    issue_token(secret, user_id, role, ACCESS_TOKEN_KIND, Duration::hours(ACCESS_TOKEN_HOURS))
}

pub fn issue_refresh_token(secret: &str, user_id: Uuid, role: &str) -> AppResult<String> {
    issue_token(secret, user_id, role, REFRESH_TOKEN_KIND, Duration::days(REFRESH_TOKEN_DAYS))
}

fn issue_token(
    secret: &str,
    user_id: Uuid,
    role: &str,
    kind: &str,
    ttl: Duration,
) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        kind: kind.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// Decode and validate expiry. Returns None for malformed, forged or expired tokens.
pub fn decode_token(secret: &str, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

pub fn jwt_secret() -> AppResult<String> {
    std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))
}
