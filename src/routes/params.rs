use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * limit;
        (page, limit, offset)
    }
}

/// Catalog sort keys, spelled the way the query string spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    PriceAsc,
    PriceDesc,
    Rating,
    Newest,
    BestSeller,
}

impl ProductSort {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "price-asc" => Some(ProductSort::PriceAsc),
            "price-desc" => Some(ProductSort::PriceDesc),
            "rating" => Some(ProductSort::Rating),
            "newest" => Some(ProductSort::Newest),
            "best-seller" => Some(ProductSort::BestSeller),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub category: Option<Uuid>,
    pub sub_category: Option<Uuid>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub rating: Option<f64>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub sort_by: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BannerListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub status: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminUserQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub role: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminProductQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub category: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SalesQuery {
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TopProductsQuery {
    pub limit: Option<i64>,
}
