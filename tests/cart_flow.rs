mod common;

use axum_storefront_api::{
    dto::cart::{AddToCartRequest, UpdateCartItemRequest},
    middleware::auth::AuthUser,
    services::cart_service,
};

// Cart invariants: a line never exceeds live stock (including merges),
// updates are ownership-gated, and totals follow live prices.
#[tokio::test]
async fn cart_stock_and_ownership_flow() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let owner_id = common::create_user(&state, "user", "shopper@example.com").await?;
    let other_id = common::create_user(&state, "user", "other@example.com").await?;
    let category_id = common::create_category(&state, "Laptop", "laptop").await?;
    let notebook = common::create_product(&state, category_id, "Notebook 13", 9_990_000, 5).await?;
    let headset = common::create_product(&state, category_id, "Headset", 200_000, 10).await?;

    let owner = AuthUser {
        user_id: owner_id,
        role: "user".into(),
    };
    let other = AuthUser {
        user_id: other_id,
        role: "user".into(),
    };

    // Stock 5: adding 3 succeeds, a second add of 3 (merge to 6) is rejected
    // and leaves the line untouched.
    let added = cart_service::add_to_cart(
        &state,
        &owner,
        AddToCartRequest {
            product_id: notebook,
            quantity: Some(3),
        },
    )
    .await?
    .data
    .expect("cart data");
    assert_eq!(added.item.quantity, 3);

    let err = cart_service::add_to_cart(
        &state,
        &owner,
        AddToCartRequest {
            product_id: notebook,
            quantity: Some(3),
        },
    )
    .await
    .expect_err("expected stock rejection");
    assert_eq!(err.code(), "INSUFFICIENT_STOCK");

    let cart = cart_service::get_cart(&state, &owner)
        .await?
        .data
        .expect("cart data");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 3);

    // Quantity defaults to 1 when omitted; totals follow live prices.
    let headset_line = cart_service::add_to_cart(
        &state,
        &other,
        AddToCartRequest {
            product_id: headset,
            quantity: None,
        },
    )
    .await?
    .data
    .expect("cart data");
    assert_eq!(headset_line.item.quantity, 1);

    cart_service::update_cart_item(
        &state,
        &other,
        headset_line.item.id,
        UpdateCartItemRequest { quantity: 2 },
    )
    .await?;
    let cart = cart_service::get_cart(&state, &other)
        .await?
        .data
        .expect("cart data");
    assert_eq!(cart.summary.subtotal, 400_000);
    assert_eq!(cart.summary.shipping_fee, 30_000);
    assert_eq!(cart.summary.total, 430_000);
    assert_eq!(cart.summary.item_count, 1);

    // Updates and removals are gated on ownership, quantity and stock.
    let err = cart_service::update_cart_item(
        &state,
        &owner,
        headset_line.item.id,
        UpdateCartItemRequest { quantity: 4 },
    )
    .await
    .expect_err("expected ownership rejection");
    assert_eq!(err.code(), "UNAUTHORIZED");

    let err = cart_service::update_cart_item(
        &state,
        &other,
        headset_line.item.id,
        UpdateCartItemRequest { quantity: 0 },
    )
    .await
    .expect_err("expected quantity rejection");
    assert_eq!(err.code(), "INVALID_QUANTITY");

    let err = cart_service::update_cart_item(
        &state,
        &other,
        headset_line.item.id,
        UpdateCartItemRequest { quantity: 11 },
    )
    .await
    .expect_err("expected stock rejection");
    assert_eq!(err.code(), "INSUFFICIENT_STOCK");

    let err = cart_service::remove_cart_item(&state, &owner, headset_line.item.id)
        .await
        .expect_err("expected ownership rejection");
    assert_eq!(err.code(), "UNAUTHORIZED");

    cart_service::remove_cart_item(&state, &other, headset_line.item.id).await?;
    let err = cart_service::remove_cart_item(&state, &other, headset_line.item.id)
        .await
        .expect_err("expected not found");
    assert_eq!(err.code(), "ITEM_NOT_FOUND");

    // Clearing a cart is idempotent: the second clear is a no-op success.
    let cleared = cart_service::clear_cart(&state, &owner).await?;
    assert!(cleared.success);
    let cleared = cart_service::clear_cart(&state, &owner).await?;
    assert!(cleared.success);
    let cart = cart_service::get_cart(&state, &owner)
        .await?
        .data
        .expect("cart data");
    assert!(cart.items.is_empty());

    Ok(())
}
