use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::{
        AuthResponse, LoginRequest, LogoutRequest, RefreshRequest, RefreshResponse,
        RegisterRequest, UserProfile,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
    tokens::{
        REFRESH_TOKEN_KIND, decode_token, issue_access_token, issue_refresh_token, jwt_secret,
    },
    validation::{is_valid_email, is_valid_password, missing_fields},
};

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    let RegisterRequest {
        email,
        password,
        name,
    } = payload;

    if let Some(missing) = missing_fields(&[
        ("email", Some(email.as_str())),
        ("password", Some(password.as_str())),
        ("name", Some(name.as_str())),
    ]) {
        return Err(AppError::validation(
            "MISSING_FIELDS",
            format!("Missing required fields: {}", missing.join(", ")),
        ));
    }

    if !is_valid_email(&email) {
        return Err(AppError::validation("INVALID_EMAIL", "Invalid email format"));
    }

    if !is_valid_password(&password) {
        return Err(AppError::validation(
            "WEAK_PASSWORD",
            "Password must be at least 6 characters",
        ));
    }

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(&state.pool)
        .await?;

    if exist.is_some() {
        return Err(AppError::conflict("EMAIL_EXISTS", "Email already registered"));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let id = Uuid::new_v4();

    let user: User = sqlx::query_as(
        "INSERT INTO users (id, email, password_hash, name, role) VALUES ($1, $2, $3, $4, 'user') RETURNING *",
    )
    .bind(id)
    .bind(email.as_str())
    .bind(password_hash)
    .bind(name.as_str())
    .fetch_one(&state.pool)
    .await?;

    let secret = jwt_secret()?;
    let access_token = issue_access_token(&secret, user.id, &user.role)?;
    let refresh_token = issue_refresh_token(&secret, user.id, &user.role)?;
    state.tokens.insert(refresh_token.clone()).await;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let resp = AuthResponse {
        user: profile_of(user),
        access_token,
        refresh_token,
    };
    Ok(ApiResponse::success("User registered successfully", resp, None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    let LoginRequest { email, password } = payload;

    if let Some(missing) = missing_fields(&[
        ("email", Some(email.as_str())),
        ("password", Some(password.as_str())),
    ]) {
        return Err(AppError::validation(
            "MISSING_FIELDS",
            format!("Missing required fields: {}", missing.join(", ")),
        ));
    }

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(&state.pool)
        .await?;

    let user = match user {
        Some(u) => u,
        None => {
            return Err(AppError::unauthorized(
                "INVALID_CREDENTIALS",
                "Invalid credentials",
            ));
        }
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::unauthorized(
            "INVALID_CREDENTIALS",
            "Invalid credentials",
        ));
    }

    let secret = jwt_secret()?;
    let access_token = issue_access_token(&secret, user.id, &user.role)?;
    let refresh_token = issue_refresh_token(&secret, user.id, &user.role)?;
    state.tokens.insert(refresh_token.clone()).await;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let resp = AuthResponse {
        user: profile_of(user),
        access_token,
        refresh_token,
    };
    Ok(ApiResponse::success("Login successful", resp, None))
}

pub async fn refresh_access_token(
    state: &AppState,
    payload: RefreshRequest,
) -> AppResult<ApiResponse<RefreshResponse>> {
    let token = payload.refresh_token;
    if token.trim().is_empty() {
        return Err(AppError::validation(
            "MISSING_TOKEN",
            "Refresh token is required",
        ));
    }

    if !state.tokens.contains(&token).await {
        return Err(AppError::unauthorized(
            "INVALID_TOKEN",
            "Invalid refresh token",
        ));
    }

    let secret = jwt_secret()?;
    let claims = match decode_token(&secret, &token) {
        Some(c) if c.kind == REFRESH_TOKEN_KIND => c,
        _ => {
            // Expired or forged entries are of no further use; drop them.
            state.tokens.revoke(&token).await;
            return Err(AppError::unauthorized(
                "EXPIRED_TOKEN",
                "Invalid or expired token",
            ));
        }
    };

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::unauthorized("INVALID_TOKEN", "Invalid refresh token"))?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::not_found("USER_NOT_FOUND", "User not found")),
    };

    let access_token = issue_access_token(&secret, user.id, &user.role)?;

    Ok(ApiResponse::success(
        "Token refreshed successfully",
        RefreshResponse { access_token },
        None,
    ))
}

pub async fn logout_user(
    state: &AppState,
    payload: LogoutRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if let Some(token) = payload.refresh_token {
        state.tokens.revoke(&token).await;
    }
    Ok(ApiResponse::success(
        "Logout successful",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn get_profile(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<UserProfile>> {
    let profile: Option<UserProfile> = sqlx::query_as(
        "SELECT id, email, name, role, created_at FROM users WHERE id = $1",
    )
    .bind(user.user_id)
    .fetch_optional(&state.pool)
    .await?;

    match profile {
        Some(p) => Ok(ApiResponse::success("OK", p, None)),
        None => Err(AppError::not_found("USER_NOT_FOUND", "User not found")),
    }
}

fn profile_of(user: User) -> UserProfile {
    UserProfile {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
        created_at: user.created_at,
    }
}
