use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Review;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub product_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReviewRequest {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

/// Review joined with the reviewer's display name.
#[derive(Debug, Serialize, ToSchema, FromQueryResult)]
pub struct ReviewWithUser {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub verified_purchase: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_name: String,
}

/// Review joined with a summary of the reviewed product.
#[derive(Debug, Serialize, ToSchema, FromQueryResult)]
pub struct ReviewWithProduct {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub verified_purchase: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub product_name: String,
    pub product_image: Option<String>,
    pub product_price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewData {
    pub review: Review,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewList {
    pub reviews: Vec<ReviewWithUser>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserReviewList {
    pub reviews: Vec<ReviewWithProduct>,
}
