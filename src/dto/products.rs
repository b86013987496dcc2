use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub original_price: Option<i64>,
    pub category_id: Uuid,
    pub sub_category_id: Option<Uuid>,
    pub image: Option<String>,
    pub stock: i32,
    #[schema(value_type = Object)]
    pub tags: Option<Value>,
    #[schema(value_type = Object)]
    pub specs: Option<Value>,
    pub is_best_seller: Option<bool>,
    pub is_new_arrival: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub original_price: Option<i64>,
    pub category_id: Option<Uuid>,
    pub sub_category_id: Option<Uuid>,
    pub image: Option<String>,
    pub stock: Option<i32>,
    #[schema(value_type = Object)]
    pub tags: Option<Value>,
    #[schema(value_type = Object)]
    pub specs: Option<Value>,
    pub is_best_seller: Option<bool>,
    pub is_new_arrival: Option<bool>,
}

#[derive(Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

/// Lightweight row for the typeahead search endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResult {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub image: Option<String>,
    pub rating: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResultList {
    pub results: Vec<SearchResult>,
}
