use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::reviews::{
        CreateReviewRequest, ReviewData, ReviewList, ReviewWithProduct, ReviewWithUser,
        UpdateReviewRequest, UserReviewList,
    },
    entity::{
        order_items::{self, Column as OrderItemCol, Entity as OrderItems},
        orders::Column as OrderCol,
        products::{Column as ProdCol, Entity as Products},
        reviews::{self, ActiveModel as ReviewActive, Column as ReviewCol, Entity as Reviews,
            Model as ReviewModel},
        users::Column as UserCol,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{OrderStatus, Review},
    pricing::aggregate_rating,
    response::{ApiResponse, Meta},
    routes::params::{Pagination, ReviewListQuery},
    state::AppState,
};

pub async fn create_review(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<ReviewData>> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::validation(
            "INVALID_RATING",
            "Rating must be between 1 and 5",
        ));
    }

    let txn = state.orm.begin().await?;

    let product = Products::find_by_id(payload.product_id).one(&txn).await?;
    if product.is_none() {
        return Err(AppError::not_found("PRODUCT_NOT_FOUND", "Product not found"));
    }

    let existing = Reviews::find()
        .filter(ReviewCol::ProductId.eq(payload.product_id))
        .filter(ReviewCol::UserId.eq(user.user_id))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(AppError::validation(
            "DUPLICATE_REVIEW",
            "You have already reviewed this product",
        ));
    }

    // Snapshotted once: a delivered order containing this product marks the
    // review as a verified purchase, and later deliveries do not revisit it.
    let delivered = OrderItems::find()
        .join(JoinType::InnerJoin, order_items::Relation::Orders.def())
        .filter(OrderItemCol::ProductId.eq(payload.product_id))
        .filter(OrderCol::UserId.eq(user.user_id))
        .filter(OrderCol::Status.eq(OrderStatus::Delivered.as_str()))
        .count(&txn)
        .await?;

    let review = ReviewActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(payload.product_id),
        user_id: Set(user.user_id),
        rating: Set(payload.rating),
        comment: Set(payload.comment),
        verified_purchase: Set(delivered > 0),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    recompute_product_rating(&txn, payload.product_id).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "review_create",
        Some("reviews"),
        Some(serde_json::json!({ "review_id": review.id, "product_id": review.product_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Review created successfully",
        ReviewData {
            review: review_from_entity(review),
        },
        None,
    ))
}

pub async fn list_product_reviews(
    state: &AppState,
    product_id: Uuid,
    query: ReviewListQuery,
) -> AppResult<ApiResponse<ReviewList>> {
    let product = Products::find_by_id(product_id).one(&state.orm).await?;
    if product.is_none() {
        return Err(AppError::not_found("PRODUCT_NOT_FOUND", "Product not found"));
    }

    let (page, limit, offset) = query.pagination.normalize();

    let mut finder = Reviews::find()
        .filter(ReviewCol::ProductId.eq(product_id))
        .join(JoinType::InnerJoin, reviews::Relation::Users.def())
        .column_as(UserCol::Name, "user_name");

    finder = match query.sort_by.as_deref() {
        Some("rating-high") => finder.order_by_desc(ReviewCol::Rating),
        Some("rating-low") => finder.order_by_asc(ReviewCol::Rating),
        _ => finder.order_by_desc(ReviewCol::CreatedAt),
    };

    let total = Reviews::find()
        .filter(ReviewCol::ProductId.eq(product_id))
        .count(&state.orm)
        .await? as i64;

    let reviews = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .into_model::<ReviewWithUser>()
        .all(&state.orm)
        .await?;

    let meta = Meta::paged(page, limit, total);
    Ok(ApiResponse::success("OK", ReviewList { reviews }, Some(meta)))
}

pub async fn list_user_reviews(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserReviewList>> {
    let (page, limit, offset) = pagination.normalize();

    let total = Reviews::find()
        .filter(ReviewCol::UserId.eq(user.user_id))
        .count(&state.orm)
        .await? as i64;

    let reviews = Reviews::find()
        .filter(ReviewCol::UserId.eq(user.user_id))
        .join(JoinType::InnerJoin, reviews::Relation::Products.def())
        .column_as(ProdCol::Name, "product_name")
        .column_as(ProdCol::Image, "product_image")
        .column_as(ProdCol::Price, "product_price")
        .order_by_desc(ReviewCol::CreatedAt)
        .limit(limit as u64)
        .offset(offset as u64)
        .into_model::<ReviewWithProduct>()
        .all(&state.orm)
        .await?;

    let meta = Meta::paged(page, limit, total);
    Ok(ApiResponse::success(
        "OK",
        UserReviewList { reviews },
        Some(meta),
    ))
}

pub async fn update_review(
    state: &AppState,
    user: &AuthUser,
    review_id: Uuid,
    payload: UpdateReviewRequest,
) -> AppResult<ApiResponse<ReviewData>> {
    if let Some(rating) = payload.rating {
        if !(1..=5).contains(&rating) {
            return Err(AppError::validation(
                "INVALID_RATING",
                "Rating must be between 1 and 5",
            ));
        }
    }

    let txn = state.orm.begin().await?;

    let review = Reviews::find_by_id(review_id).one(&txn).await?;
    let review = match review {
        Some(r) => r,
        None => return Err(AppError::not_found("REVIEW_NOT_FOUND", "Review not found")),
    };

    if review.user_id != user.user_id {
        return Err(AppError::forbidden("UNAUTHORIZED", "Unauthorized"));
    }

    let product_id = review.product_id;
    let mut active: ReviewActive = review.into();
    if let Some(rating) = payload.rating {
        active.rating = Set(rating);
    }
    if let Some(comment) = payload.comment {
        active.comment = Set(Some(comment));
    }
    active.updated_at = Set(Utc::now().into());
    let review = active.update(&txn).await?;

    recompute_product_rating(&txn, product_id).await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Review updated successfully",
        ReviewData {
            review: review_from_entity(review),
        },
        None,
    ))
}

pub async fn delete_review(
    state: &AppState,
    user: &AuthUser,
    review_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;

    let review = Reviews::find_by_id(review_id).one(&txn).await?;
    let review = match review {
        Some(r) => r,
        None => return Err(AppError::not_found("REVIEW_NOT_FOUND", "Review not found")),
    };

    // Owners delete their own reviews; admins may moderate any.
    if review.user_id != user.user_id && !user.is_admin() {
        return Err(AppError::forbidden("UNAUTHORIZED", "Unauthorized"));
    }

    let product_id = review.product_id;
    Reviews::delete_by_id(review_id).exec(&txn).await?;

    recompute_product_rating(&txn, product_id).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "review_delete",
        Some("reviews"),
        Some(serde_json::json!({ "review_id": review_id, "product_id": product_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Review deleted successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Re-derive the product's rating and review count from its current reviews.
/// Deleting the last review resets both to zero.
pub(crate) async fn recompute_product_rating<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
) -> AppResult<()> {
    let ratings: Vec<i32> = Reviews::find()
        .filter(ReviewCol::ProductId.eq(product_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|r| r.rating)
        .collect();

    let (rating, review_count) = aggregate_rating(&ratings);

    Products::update_many()
        .col_expr(ProdCol::Rating, Expr::value(rating))
        .col_expr(ProdCol::ReviewCount, Expr::value(review_count))
        .filter(ProdCol::Id.eq(product_id))
        .exec(conn)
        .await?;

    Ok(())
}

fn review_from_entity(model: ReviewModel) -> Review {
    Review {
        id: model.id,
        product_id: model.product_id,
        user_id: model.user_id,
        rating: model.rating,
        comment: model.comment,
        verified_purchase: model.verified_purchase,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
