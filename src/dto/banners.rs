use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Banner;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBannerRequest {
    pub title: String,
    pub description: Option<String>,
    pub image: String,
    pub url: Option<String>,
    pub status: Option<String>,
    pub priority: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBannerRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,
    pub priority: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BannerList {
    pub banners: Vec<Banner>,
}
