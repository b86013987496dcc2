use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::banners::{BannerList, CreateBannerRequest, UpdateBannerRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Banner,
    response::ApiResponse,
    routes::params::BannerListQuery,
    services::banner_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_banners).post(create_banner))
        .route(
            "/{id}",
            get(get_banner).put(update_banner).delete(delete_banner),
        )
}

#[utoipa::path(
    get,
    path = "/api/banners",
    params(
        ("status" = Option<String>, Query, description = "active (default) or inactive"),
        ("sort" = Option<String>, Query, description = "priority (default), recent, oldest"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Banners by priority", body = ApiResponse<BannerList>)
    ),
    tag = "Banners"
)]
pub async fn list_banners(
    State(state): State<AppState>,
    Query(query): Query<BannerListQuery>,
) -> AppResult<Json<ApiResponse<BannerList>>> {
    let resp = banner_service::list_banners(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/banners/{id}",
    params(("id" = Uuid, Path, description = "Banner ID")),
    responses(
        (status = 200, description = "Banner", body = ApiResponse<Banner>),
        (status = 404, description = "Banner not found"),
    ),
    tag = "Banners"
)]
pub async fn get_banner(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Banner>>> {
    let resp = banner_service::get_banner(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/banners",
    request_body = CreateBannerRequest,
    security(("bearer_auth" = [])),
    tag = "Banners"
)]
pub async fn create_banner(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateBannerRequest>,
) -> AppResult<Json<ApiResponse<Banner>>> {
    let resp = banner_service::create_banner(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/banners/{id}",
    params(("id" = Uuid, Path, description = "Banner ID")),
    request_body = UpdateBannerRequest,
    security(("bearer_auth" = [])),
    tag = "Banners"
)]
pub async fn update_banner(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBannerRequest>,
) -> AppResult<Json<ApiResponse<Banner>>> {
    let resp = banner_service::update_banner(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/banners/{id}",
    params(("id" = Uuid, Path, description = "Banner ID")),
    security(("bearer_auth" = [])),
    tag = "Banners"
)]
pub async fn delete_banner(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = banner_service::delete_banner(&state, &user, id).await?;
    Ok(Json(resp))
}
