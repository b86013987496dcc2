use uuid::Uuid;

use crate::{
    dto::banners::{BannerList, CreateBannerRequest, UpdateBannerRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Banner, BannerStatus},
    response::{ApiResponse, Meta},
    routes::params::BannerListQuery,
    state::AppState,
};

pub async fn list_banners(
    state: &AppState,
    query: BannerListQuery,
) -> AppResult<ApiResponse<BannerList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let status = match query.status.as_deref() {
        None => Some(BannerStatus::Active),
        Some("") => None,
        Some(s) => Some(BannerStatus::parse(s).ok_or_else(|| {
            AppError::validation("INVALID_STATUS", "Invalid banner status")
        })?),
    };

    let order_by = match query.sort.as_deref() {
        Some("recent") => "created_at DESC",
        Some("oldest") => "created_at ASC",
        _ => "priority DESC, created_at DESC",
    };

    let (banners, total) = match status {
        Some(status) => {
            let banners: Vec<Banner> = sqlx::query_as(&format!(
                "SELECT * FROM banners WHERE status = $1 ORDER BY {order_by} LIMIT $2 OFFSET $3",
            ))
            .bind(status.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(&state.pool)
            .await?;
            let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM banners WHERE status = $1")
                .bind(status.as_str())
                .fetch_one(&state.pool)
                .await?;
            (banners, total.0)
        }
        None => {
            let banners: Vec<Banner> = sqlx::query_as(&format!(
                "SELECT * FROM banners ORDER BY {order_by} LIMIT $1 OFFSET $2",
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(&state.pool)
            .await?;
            let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM banners")
                .fetch_one(&state.pool)
                .await?;
            (banners, total.0)
        }
    };

    let meta = Meta::paged(page, limit, total);
    Ok(ApiResponse::success("OK", BannerList { banners }, Some(meta)))
}

pub async fn get_banner(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Banner>> {
    let banner: Option<Banner> = sqlx::query_as("SELECT * FROM banners WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;

    match banner {
        Some(b) => Ok(ApiResponse::success("OK", b, None)),
        None => Err(AppError::not_found("BANNER_NOT_FOUND", "Banner not found")),
    }
}

pub async fn create_banner(
    state: &AppState,
    user: &AuthUser,
    payload: CreateBannerRequest,
) -> AppResult<ApiResponse<Banner>> {
    ensure_admin(user)?;

    if payload.title.trim().is_empty() || payload.image.trim().is_empty() {
        return Err(AppError::validation(
            "MISSING_FIELDS",
            "Title and image are required",
        ));
    }

    let status = match payload.status.as_deref() {
        None => BannerStatus::Active,
        Some(s) => BannerStatus::parse(s).ok_or_else(|| {
            AppError::validation("INVALID_STATUS", "Invalid banner status")
        })?,
    };

    let banner: Banner = sqlx::query_as(
        r#"
        INSERT INTO banners (id, title, description, image, url, status, priority)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.title.as_str())
    .bind(payload.description)
    .bind(payload.image.as_str())
    .bind(payload.url)
    .bind(status.as_str())
    .bind(payload.priority.unwrap_or(0))
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Banner created successfully",
        banner,
        Some(Meta::empty()),
    ))
}

pub async fn update_banner(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateBannerRequest,
) -> AppResult<ApiResponse<Banner>> {
    ensure_admin(user)?;

    let existing: Option<Banner> = sqlx::query_as("SELECT * FROM banners WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let existing = match existing {
        Some(b) => b,
        None => return Err(AppError::not_found("BANNER_NOT_FOUND", "Banner not found")),
    };

    let status = match payload.status {
        None => existing.status,
        Some(s) => BannerStatus::parse(&s)
            .ok_or_else(|| AppError::validation("INVALID_STATUS", "Invalid banner status"))?
            .as_str()
            .to_string(),
    };

    let title = payload.title.unwrap_or(existing.title);
    let description = payload.description.or(existing.description);
    let image = payload.image.unwrap_or(existing.image);
    let url = payload.url.or(existing.url);
    let priority = payload.priority.unwrap_or(existing.priority);

    let banner: Banner = sqlx::query_as(
        r#"
        UPDATE banners
        SET title = $2, description = $3, image = $4, url = $5, status = $6,
            priority = $7, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(description)
    .bind(image)
    .bind(url)
    .bind(status)
    .bind(priority)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Banner updated successfully",
        banner,
        Some(Meta::empty()),
    ))
}

pub async fn delete_banner(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = sqlx::query("DELETE FROM banners WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("BANNER_NOT_FOUND", "Banner not found"));
    }

    Ok(ApiResponse::success(
        "Banner deleted successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
