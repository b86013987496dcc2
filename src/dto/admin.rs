use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::orders::OrderWithItems;
use crate::models::Product;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStatistics {
    pub total_users: i64,
    pub total_products: i64,
    pub total_orders: i64,
    /// Sum of order totals over delivered orders.
    pub total_revenue: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Dashboard {
    pub statistics: DashboardStatistics,
    pub recent_orders: Vec<OrderWithItems>,
    pub top_products: Vec<TopProduct>,
}

/// Per-product sales aggregated across all order items.
#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct TopProduct {
    pub product_id: Uuid,
    pub name: String,
    pub total_quantity: i64,
    pub total_revenue: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopProductList {
    pub products: Vec<TopProduct>,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub order_count: i64,
    pub review_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminUserList {
    pub users: Vec<AdminUser>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminProductList {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SalesAnalytics {
    pub total_sales: i64,
    pub total_orders: i64,
    pub average_order_value: f64,
}
