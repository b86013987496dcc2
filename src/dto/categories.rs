use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::SubCategory;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSubCategoryRequest {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryWithSubs {
    #[serde(flatten)]
    pub category: crate::models::Category,
    pub product_count: i64,
    pub sub_categories: Vec<SubCategory>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub categories: Vec<CategoryWithSubs>,
    pub total: i64,
}

/// Category detail including a compact product listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: crate::models::Category,
    pub product_count: i64,
    pub sub_categories: Vec<SubCategory>,
    pub products: Vec<CategoryProduct>,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct CategoryProduct {
    pub id: uuid::Uuid,
    pub name: String,
    pub price: i64,
    pub stock: i32,
    pub rating: f64,
    pub review_count: i32,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubCategoryList {
    pub category: String,
    pub sub_categories: Vec<SubCategory>,
    pub total: i64,
}
