use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::reviews::{
        CreateReviewRequest, ReviewData, ReviewList, UpdateReviewRequest, UserReviewList,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::{Pagination, ReviewListQuery},
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_review))
        .route("/user", get(list_user_reviews))
        .route("/products/{product_id}/reviews", get(list_product_reviews))
        .route("/{review_id}", put(update_review).delete(delete_review))
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 200, description = "Review created, product rating recomputed", body = ApiResponse<ReviewData>),
        (status = 400, description = "Invalid rating or duplicate review"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<Json<ApiResponse<ReviewData>>> {
    let resp = review_service::create_review(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reviews/products/{product_id}/reviews",
    params(
        ("product_id" = Uuid, Path, description = "Product ID"),
        ("sort_by" = Option<String>, Query, description = "recent, rating-high, rating-low"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Product reviews with reviewer names", body = ApiResponse<ReviewList>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Reviews"
)]
pub async fn list_product_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Query(query): Query<ReviewListQuery>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::list_product_reviews(&state, product_id, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reviews/user",
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn list_user_reviews(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<UserReviewList>>> {
    let resp = review_service::list_user_reviews(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/reviews/{review_id}",
    params(("review_id" = Uuid, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<ReviewData>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Review not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn update_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(review_id): Path<Uuid>,
    Json(payload): Json<UpdateReviewRequest>,
) -> AppResult<Json<ApiResponse<ReviewData>>> {
    let resp = review_service::update_review(&state, &user, review_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/reviews/{review_id}",
    params(("review_id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted, product rating recomputed"),
        (status = 403, description = "Not the owner or an admin"),
        (status = 404, description = "Review not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(review_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = review_service::delete_review(&state, &user, review_id).await?;
    Ok(Json(resp))
}
