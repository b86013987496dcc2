use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub total: Option<i64>,
    pub total_pages: Option<i64>,
    pub has_more: Option<bool>,
}

impl Meta {
    pub fn paged(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        let has_more = page * limit < total;
        Self {
            page: Some(page),
            limit: Some(limit),
            total: Some(total),
            total_pages: Some(total_pages),
            has_more: Some(has_more),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            limit: None,
            total: None,
            total_pages: None,
            has_more: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
