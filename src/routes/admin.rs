use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::admin::{AdminProductList, AdminUserList, Dashboard, SalesAnalytics, TopProductList},
    dto::orders::OrderList,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::{AdminProductQuery, AdminUserQuery, OrderListQuery, SalesQuery,
        TopProductsQuery},
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/stats", get(dashboard))
        .route("/users", get(list_users))
        .route("/orders", get(list_orders))
        .route("/products", get(list_products))
        .route("/analytics/sales", get(sales_analytics))
        .route("/analytics/top-products", get(top_products))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Counts, delivered revenue, recent orders, top sellers", body = ApiResponse<Dashboard>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Dashboard>>> {
    let resp = admin_service::get_dashboard(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(
        ("role" = Option<String>, Query, description = "Filter by role"),
        ("search" = Option<String>, Query, description = "Substring match on name/email"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Users with order/review counts", body = ApiResponse<AdminUserList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AdminUserQuery>,
) -> AppResult<Json<ApiResponse<AdminUserList>>> {
    let resp = admin_service::list_users(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "All orders, newest first", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = admin_service::list_all_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/products",
    params(
        ("category" = Option<uuid::Uuid>, Query, description = "Filter by category id"),
        ("search" = Option<String>, Query, description = "Substring match on name"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_products(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AdminProductQuery>,
) -> AppResult<Json<ApiResponse<AdminProductList>>> {
    let resp = admin_service::list_products(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics/sales",
    params(
        ("start_date" = Option<String>, Query, description = "RFC 3339 range start"),
        ("end_date" = Option<String>, Query, description = "RFC 3339 range end"),
    ),
    responses(
        (status = 200, description = "Delivered sales in range", body = ApiResponse<SalesAnalytics>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn sales_analytics(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<SalesQuery>,
) -> AppResult<Json<ApiResponse<SalesAnalytics>>> {
    let resp = admin_service::sales_analytics(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics/top-products",
    params(
        ("limit" = Option<i64>, Query, description = "Max rows, default 5"),
    ),
    responses(
        (status = 200, description = "Best sellers by quantity sold", body = ApiResponse<TopProductList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn top_products(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TopProductsQuery>,
) -> AppResult<Json<ApiResponse<TopProductList>>> {
    let resp = admin_service::top_products(&state, &user, query).await?;
    Ok(Json(resp))
}
