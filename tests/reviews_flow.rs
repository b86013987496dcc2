mod common;

use axum_storefront_api::{
    dto::{
        orders::{CreateOrderRequest, OrderItemRequest, UpdateOrderStatusRequest},
        reviews::{CreateReviewRequest, UpdateReviewRequest},
    },
    entity::products::Entity as Products,
    middleware::auth::AuthUser,
    routes::params::{Pagination, ReviewListQuery},
    services::{order_service, review_service},
    state::AppState,
};
use sea_orm::EntityTrait;
use uuid::Uuid;

async fn product_rating(state: &AppState, product_id: Uuid) -> anyhow::Result<(f64, i32)> {
    let product = Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .expect("product");
    Ok((product.rating, product.review_count))
}

// The derived pair (rating, review_count) must track every review mutation,
// and verified_purchase is snapshotted from delivered-order history.
#[tokio::test]
async fn review_aggregation_flow() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let first_id = common::create_user(&state, "user", "reviewer1@example.com").await?;
    let second_id = common::create_user(&state, "user", "reviewer2@example.com").await?;
    let admin_id = common::create_user(&state, "admin", "admin@example.com").await?;
    let category_id = common::create_category(&state, "Laptop", "laptop").await?;
    let product = common::create_product(&state, category_id, "Workstation", 40_000_000, 5).await?;

    let first = AuthUser {
        user_id: first_id,
        role: "user".into(),
    };
    let second = AuthUser {
        user_id: second_id,
        role: "user".into(),
    };
    let admin = AuthUser {
        user_id: admin_id,
        role: "admin".into(),
    };

    // The first reviewer has a delivered order, so their review is verified.
    let order = order_service::create_order(
        &state,
        &first,
        CreateOrderRequest {
            items: vec![OrderItemRequest {
                product_id: product,
                quantity: 1,
            }],
            customer_info: common::customer_info(),
            payment_method: "cod".into(),
        },
    )
    .await?
    .data
    .expect("order data");
    order_service::update_order_status(
        &state,
        &admin,
        order.order.id,
        UpdateOrderStatusRequest {
            status: "delivered".into(),
            description: None,
        },
    )
    .await?;

    let verified = review_service::create_review(
        &state,
        &first,
        CreateReviewRequest {
            product_id: product,
            rating: 4,
            comment: Some("Solid machine".into()),
        },
    )
    .await?
    .data
    .expect("review data");
    assert!(verified.review.verified_purchase);
    assert_eq!(product_rating(&state, product).await?, (4.0, 1));

    // The second reviewer never bought it: unverified, and the mean updates.
    let second_review = review_service::create_review(
        &state,
        &second,
        CreateReviewRequest {
            product_id: product,
            rating: 5,
            comment: None,
        },
    )
    .await?
    .data
    .expect("review data");
    assert!(!second_review.review.verified_purchase);
    assert_eq!(product_rating(&state, product).await?, (4.5, 2));

    // A second review from the same user is rejected and changes nothing.
    let err = review_service::create_review(
        &state,
        &first,
        CreateReviewRequest {
            product_id: product,
            rating: 1,
            comment: None,
        },
    )
    .await
    .expect_err("expected duplicate rejection");
    assert_eq!(err.code(), "DUPLICATE_REVIEW");
    assert_eq!(product_rating(&state, product).await?, (4.5, 2));

    let err = review_service::create_review(
        &state,
        &second,
        CreateReviewRequest {
            product_id: product,
            rating: 6,
            comment: None,
        },
    )
    .await
    .expect_err("expected rating rejection");
    assert_eq!(err.code(), "INVALID_RATING");

    // Updates recompute the aggregate too, and only the owner may update.
    review_service::update_review(
        &state,
        &second,
        second_review.review.id,
        UpdateReviewRequest {
            rating: Some(3),
            comment: None,
        },
    )
    .await?;
    assert_eq!(product_rating(&state, product).await?, (3.5, 2));

    let err = review_service::update_review(
        &state,
        &first,
        second_review.review.id,
        UpdateReviewRequest {
            rating: Some(5),
            comment: None,
        },
    )
    .await
    .expect_err("expected ownership rejection");
    assert_eq!(err.code(), "UNAUTHORIZED");

    // Admin moderation may remove any review.
    review_service::delete_review(&state, &admin, second_review.review.id).await?;
    assert_eq!(product_rating(&state, product).await?, (4.0, 1));

    // Deleting the last review resets the aggregate to zero.
    let listing = review_service::list_product_reviews(
        &state,
        product,
        ReviewListQuery {
            pagination: Pagination::default(),
            sort_by: None,
        },
    )
    .await?
    .data
    .expect("review list");
    assert_eq!(listing.reviews.len(), 1);
    assert_eq!(listing.reviews[0].user_name, "Test User");

    review_service::delete_review(&state, &first, listing.reviews[0].id).await?;
    assert_eq!(product_rating(&state, product).await?, (0.0, 0));

    Ok(())
}
