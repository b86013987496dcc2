mod common;

use axum_storefront_api::{
    dto::{
        cart::AddToCartRequest,
        orders::{CreateOrderRequest, OrderItemRequest, UpdateOrderStatusRequest},
        products::UpdateProductRequest,
    },
    entity::products::Entity as Products,
    middleware::auth::AuthUser,
    services::{cart_service, order_service, product_service},
};
use sea_orm::EntityTrait;

// Integration flow: user fills a cart and creates an order (stock reserved,
// totals frozen, cart cleared), orders are trackable by code, the admin walks
// the status machine, and cancellation is only accepted while still pending.
#[tokio::test]
async fn order_lifecycle_flow() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user_id = common::create_user(&state, "user", "buyer@example.com").await?;
    let admin_id = common::create_user(&state, "admin", "admin@example.com").await?;
    let category_id = common::create_category(&state, "Laptop", "laptop").await?;
    let cheap = common::create_product(&state, category_id, "Mouse", 100_000, 10).await?;
    let pricey = common::create_product(&state, category_id, "Keyboard", 450_000, 5).await?;
    let scarce = common::create_product(&state, category_id, "Ultrabook", 20_000_000, 2).await?;

    let auth_user = AuthUser {
        user_id,
        role: "user".into(),
    };
    let auth_admin = AuthUser {
        user_id: admin_id,
        role: "admin".into(),
    };

    cart_service::add_to_cart(
        &state,
        &auth_user,
        AddToCartRequest {
            product_id: cheap,
            quantity: Some(1),
        },
    )
    .await?;

    // Two items at 100_000 and 450_000 clear the free-shipping threshold.
    let created = order_service::create_order(
        &state,
        &auth_user,
        CreateOrderRequest {
            items: vec![
                OrderItemRequest {
                    product_id: cheap,
                    quantity: 1,
                },
                OrderItemRequest {
                    product_id: pricey,
                    quantity: 1,
                },
            ],
            customer_info: common::customer_info(),
            payment_method: "cod".into(),
        },
    )
    .await?
    .data
    .expect("order data");

    assert_eq!(created.order.subtotal, 550_000);
    assert_eq!(created.order.shipping_fee, 0);
    assert_eq!(created.order.total, 550_000);
    assert_eq!(created.order.status, "pending");
    assert_eq!(created.order.payment_status, "pending");
    assert_eq!(created.items.len(), 2);
    assert_eq!(created.timeline.len(), 1);
    assert!(created.order.order_code.starts_with("ORD-"));

    // Stock was decremented inside the same transaction.
    let mouse = Products::find_by_id(cheap)
        .one(&state.orm)
        .await?
        .expect("product");
    assert_eq!(mouse.stock, 9);
    let keyboard = Products::find_by_id(pricey)
        .one(&state.orm)
        .await?
        .expect("product");
    assert_eq!(keyboard.stock, 4);

    // The buyer's cart is cleared unconditionally.
    let cart = cart_service::get_cart(&state, &auth_user)
        .await?
        .data
        .expect("cart data");
    assert!(cart.items.is_empty());
    assert_eq!(cart.summary.subtotal, 0);

    // A small order pays the flat shipping fee.
    let small = order_service::create_order(
        &state,
        &auth_user,
        CreateOrderRequest {
            items: vec![OrderItemRequest {
                product_id: cheap,
                quantity: 1,
            }],
            customer_info: common::customer_info(),
            payment_method: "card".into(),
        },
    )
    .await?
    .data
    .expect("order data");
    assert_eq!(small.order.subtotal, 100_000);
    assert_eq!(small.order.shipping_fee, 30_000);
    assert_eq!(small.order.total, 130_000);

    // Requesting more than the available stock rejects the whole order
    // and reserves nothing.
    let err = order_service::create_order(
        &state,
        &auth_user,
        CreateOrderRequest {
            items: vec![OrderItemRequest {
                product_id: scarce,
                quantity: 3,
            }],
            customer_info: common::customer_info(),
            payment_method: "cod".into(),
        },
    )
    .await
    .expect_err("expected stock rejection");
    assert_eq!(err.code(), "INSUFFICIENT_STOCK");
    let ultrabook = Products::find_by_id(scarce)
        .one(&state.orm)
        .await?
        .expect("product");
    assert_eq!(ultrabook.stock, 2);

    // Later price edits never touch the frozen snapshot.
    product_service::update_product(
        &state,
        &auth_admin,
        cheap,
        UpdateProductRequest {
            name: None,
            description: None,
            price: Some(999_999),
            original_price: None,
            category_id: None,
            sub_category_id: None,
            image: None,
            stock: None,
            tags: None,
            specs: None,
            is_best_seller: None,
            is_new_arrival: None,
        },
    )
    .await?;
    let frozen = order_service::get_order(&state, &auth_user, created.order.id)
        .await?
        .data
        .expect("order data");
    assert_eq!(frozen.order.subtotal, 550_000);
    assert_eq!(frozen.order.total, 550_000);
    let mouse_line = frozen
        .items
        .iter()
        .find(|item| item.product_id == cheap)
        .expect("mouse line");
    assert_eq!(mouse_line.price, 100_000);

    // Tracking by order code is public and returns the timeline.
    let tracked = order_service::track_order(&state, &created.order.order_code)
        .await?
        .data
        .expect("order data");
    assert_eq!(tracked.order.id, created.order.id);
    assert_eq!(tracked.timeline.len(), 1);

    let err = order_service::track_order(&state, "ORD-00000000-NOPE")
        .await
        .expect_err("expected not found");
    assert_eq!(err.code(), "ORDER_NOT_FOUND");

    // Status updates are admin-only and enum-checked.
    let err = order_service::update_order_status(
        &state,
        &auth_user,
        created.order.id,
        UpdateOrderStatusRequest {
            status: "confirmed".into(),
            description: None,
        },
    )
    .await
    .expect_err("expected forbidden");
    assert_eq!(err.code(), "FORBIDDEN");

    let err = order_service::update_order_status(
        &state,
        &auth_admin,
        created.order.id,
        UpdateOrderStatusRequest {
            status: "paid".into(),
            description: None,
        },
    )
    .await
    .expect_err("expected invalid status");
    assert_eq!(err.code(), "INVALID_STATUS");

    let confirmed = order_service::update_order_status(
        &state,
        &auth_admin,
        created.order.id,
        UpdateOrderStatusRequest {
            status: "confirmed".into(),
            description: None,
        },
    )
    .await?
    .data
    .expect("order data");
    assert_eq!(confirmed.order.status, "confirmed");
    assert_eq!(confirmed.timeline.len(), 2);

    // Once confirmed, the buyer can no longer cancel.
    let err = order_service::cancel_order(&state, &auth_user, created.order.id)
        .await
        .expect_err("expected cancellation rejection");
    assert_eq!(err.code(), "CANNOT_CANCEL_ORDER");

    // The second order is still pending, so cancellation goes through.
    let cancelled = order_service::cancel_order(&state, &auth_user, small.order.id)
        .await?
        .data
        .expect("order data");
    assert_eq!(cancelled.order.status, "cancelled");
    assert_eq!(cancelled.timeline.len(), 2);

    // Other users cannot read someone else's order.
    let err = order_service::get_order(&state, &auth_admin, created.order.id)
        .await
        .expect_err("expected ownership rejection");
    assert_eq!(err.code(), "UNAUTHORIZED");

    Ok(())
}
