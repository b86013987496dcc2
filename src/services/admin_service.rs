use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;

use crate::{
    dto::admin::{
        AdminProductList, AdminUser, AdminUserList, Dashboard, DashboardStatistics,
        SalesAnalytics, TopProduct, TopProductList,
    },
    dto::orders::OrderList,
    entity::{
        orders::{Column as OrderCol, Entity as Orders},
        products::{Column as ProdCol, Entity as Products},
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::OrderStatus,
    response::{ApiResponse, Meta},
    routes::params::{AdminProductQuery, AdminUserQuery, OrderListQuery, SalesQuery,
        TopProductsQuery},
    services::{order_service, product_service},
    state::AppState,
};

const DASHBOARD_RECENT_ORDERS: u64 = 10;
const DASHBOARD_TOP_PRODUCTS: i64 = 5;

pub async fn get_dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Dashboard>> {
    ensure_admin(user)?;

    let total_users: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&state.pool)
        .await?;
    let total_products: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(&state.pool)
        .await?;
    let total_orders: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(&state.pool)
        .await?;

    // Revenue only counts orders that actually reached the customer.
    let total_revenue: (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(total), 0)::BIGINT FROM orders WHERE status = $1",
    )
    .bind(OrderStatus::Delivered.as_str())
    .fetch_one(&state.pool)
    .await?;

    let recent = Orders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .limit(DASHBOARD_RECENT_ORDERS)
        .all(&state.orm)
        .await?;
    let recent_orders = order_service::attach_details(&state.orm, recent).await?;

    let top_products = top_selling_products(state, DASHBOARD_TOP_PRODUCTS).await?;

    let dashboard = Dashboard {
        statistics: DashboardStatistics {
            total_users: total_users.0,
            total_products: total_products.0,
            total_orders: total_orders.0,
            total_revenue: total_revenue.0,
        },
        recent_orders,
        top_products,
    };

    Ok(ApiResponse::success("OK", dashboard, None))
}

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    query: AdminUserQuery,
) -> AppResult<ApiResponse<AdminUserList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let role = query.role.filter(|r| !r.is_empty());
    let search = query
        .search
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"));

    let users: Vec<AdminUser> = sqlx::query_as(
        r#"
        SELECT u.id, u.email, u.name, u.role, u.created_at,
               (SELECT COUNT(*) FROM orders o WHERE o.user_id = u.id) AS order_count,
               (SELECT COUNT(*) FROM reviews r WHERE r.user_id = u.id) AS review_count
        FROM users u
        WHERE ($1::text IS NULL OR u.role = $1)
          AND ($2::text IS NULL OR u.name ILIKE $2 OR u.email ILIKE $2)
        ORDER BY u.created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(role.as_deref())
    .bind(search.as_deref())
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM users u
        WHERE ($1::text IS NULL OR u.role = $1)
          AND ($2::text IS NULL OR u.name ILIKE $2 OR u.email ILIKE $2)
        "#,
    )
    .bind(role.as_deref())
    .bind(search.as_deref())
    .fetch_one(&state.pool)
    .await?;

    let meta = Meta::paged(page, limit, total.0);
    Ok(ApiResponse::success(
        "OK",
        AdminUserList { users },
        Some(meta),
    ))
}

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let finder = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let items = order_service::attach_details(&state.orm, orders).await?;

    let meta = Meta::paged(page, limit, total);
    Ok(ApiResponse::success("OK", OrderList { items }, Some(meta)))
}

pub async fn list_products(
    state: &AppState,
    user: &AuthUser,
    query: AdminProductQuery,
) -> AppResult<ApiResponse<AdminProductList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(category_id) = query.category {
        condition = condition.add(ProdCol::CategoryId.eq(category_id));
    }
    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        condition = condition.add(Expr::col(ProdCol::Name).ilike(pattern));
    }

    let finder = Products::find()
        .filter(condition)
        .order_by_desc(ProdCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let products = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_service::product_from_entity)
        .collect();

    let meta = Meta::paged(page, limit, total);
    Ok(ApiResponse::success(
        "OK",
        AdminProductList { products },
        Some(meta),
    ))
}

pub async fn sales_analytics(
    state: &AppState,
    user: &AuthUser,
    query: SalesQuery,
) -> AppResult<ApiResponse<SalesAnalytics>> {
    ensure_admin(user)?;

    let row: (i64, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(total), 0)::BIGINT, COUNT(*)
        FROM orders
        WHERE status = $1
          AND ($2::timestamptz IS NULL OR created_at >= $2)
          AND ($3::timestamptz IS NULL OR created_at <= $3)
        "#,
    )
    .bind(OrderStatus::Delivered.as_str())
    .bind(query.start_date)
    .bind(query.end_date)
    .fetch_one(&state.pool)
    .await?;

    let (total_sales, total_orders) = row;
    let average_order_value = if total_orders > 0 {
        let avg = total_sales as f64 / total_orders as f64;
        (avg * 100.0).round() / 100.0
    } else {
        0.0
    };

    Ok(ApiResponse::success(
        "OK",
        SalesAnalytics {
            total_sales,
            total_orders,
            average_order_value,
        },
        None,
    ))
}

pub async fn top_products(
    state: &AppState,
    user: &AuthUser,
    query: TopProductsQuery,
) -> AppResult<ApiResponse<TopProductList>> {
    ensure_admin(user)?;
    let limit = query.limit.unwrap_or(DASHBOARD_TOP_PRODUCTS).clamp(1, 100);
    let products = top_selling_products(state, limit).await?;
    Ok(ApiResponse::success(
        "OK",
        TopProductList { products },
        None,
    ))
}

/// Quantity and revenue per product across every order item, best sellers first.
async fn top_selling_products(state: &AppState, limit: i64) -> AppResult<Vec<TopProduct>> {
    let products: Vec<TopProduct> = sqlx::query_as(
        r#"
        SELECT oi.product_id, oi.name,
               SUM(oi.quantity)::BIGINT AS total_quantity,
               SUM(oi.subtotal)::BIGINT AS total_revenue
        FROM order_items oi
        GROUP BY oi.product_id, oi.name
        ORDER BY total_quantity DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(&state.pool)
    .await?;
    Ok(products)
}
