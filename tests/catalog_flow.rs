mod common;

use axum_storefront_api::{
    dto::{
        categories::CreateCategoryRequest,
        orders::{CreateOrderRequest, OrderItemRequest},
        products::CreateProductRequest,
    },
    middleware::auth::AuthUser,
    services::{category_service, order_service, product_service},
};
use uuid::Uuid;

fn product_request(name: &str, category_id: Uuid, price: i64, stock: i32) -> CreateProductRequest {
    CreateProductRequest {
        name: name.to_string(),
        description: "A product for testing".into(),
        price,
        original_price: None,
        category_id,
        sub_category_id: None,
        image: None,
        stock,
        tags: None,
        specs: None,
        is_best_seller: None,
        is_new_arrival: None,
    }
}

// Referential guards: a category with products and a product with order
// history both refuse deletion, and slugs stay unique.
#[tokio::test]
async fn category_and_product_admin_flow() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let admin_id = common::create_user(&state, "admin", "admin@example.com").await?;
    let buyer_id = common::create_user(&state, "user", "buyer@example.com").await?;
    let admin = AuthUser {
        user_id: admin_id,
        role: "admin".into(),
    };
    let buyer = AuthUser {
        user_id: buyer_id,
        role: "user".into(),
    };

    let err = category_service::create_category(
        &state,
        &buyer,
        CreateCategoryRequest {
            name: "Phones".into(),
            slug: "phones".into(),
            icon: None,
        },
    )
    .await
    .expect_err("expected forbidden");
    assert_eq!(err.code(), "FORBIDDEN");

    let category = category_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: "Phones".into(),
            slug: "phones".into(),
            icon: None,
        },
    )
    .await?
    .data
    .expect("category data");

    let err = category_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: "Phones again".into(),
            slug: "phones".into(),
            icon: None,
        },
    )
    .await
    .expect_err("expected duplicate slug rejection");
    assert_eq!(err.code(), "DUPLICATE_SLUG");

    // Products must reference an existing category.
    let err = product_service::create_product(
        &state,
        &admin,
        product_request("Orphan", Uuid::new_v4(), 1_000_000, 1),
    )
    .await
    .expect_err("expected missing category rejection");
    assert_eq!(err.code(), "CATEGORY_NOT_FOUND");

    let phone = product_service::create_product(
        &state,
        &admin,
        product_request("Flagship Phone", category.id, 5_000_000, 3),
    )
    .await?
    .data
    .expect("product data");
    assert_eq!(phone.original_price, 5_000_000);

    // The category now owns a product, so it refuses deletion.
    let err = category_service::delete_category(&state, &admin, category.id)
        .await
        .expect_err("expected category guard");
    assert_eq!(err.code(), "CATEGORY_HAS_PRODUCTS");

    // Once an order references the product, the snapshot keeps it alive.
    order_service::create_order(
        &state,
        &buyer,
        CreateOrderRequest {
            items: vec![OrderItemRequest {
                product_id: phone.id,
                quantity: 1,
            }],
            customer_info: common::customer_info(),
            payment_method: "transfer".into(),
        },
    )
    .await?;

    let err = product_service::delete_product(&state, &admin, phone.id)
        .await
        .expect_err("expected order-history guard");
    assert_eq!(err.code(), "PRODUCT_HAS_ORDERS");

    // An unsold product deletes cleanly.
    let spare = product_service::create_product(
        &state,
        &admin,
        product_request("Spare Phone", category.id, 3_000_000, 1),
    )
    .await?
    .data
    .expect("product data");
    product_service::delete_product(&state, &admin, spare.id).await?;

    // Lookup works by slug as well as id, and counts only live products.
    let detail = category_service::get_category(&state, "phones")
        .await?
        .data
        .expect("category detail");
    assert_eq!(detail.category.id, category.id);
    assert_eq!(detail.product_count, 1);

    // A category with no products deletes successfully.
    let empty = category_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: "Tablets".into(),
            slug: "tablets".into(),
            icon: None,
        },
    )
    .await?
    .data
    .expect("category data");
    category_service::delete_category(&state, &admin, empty.id).await?;

    let err = category_service::get_category(&state, "tablets")
        .await
        .expect_err("expected not found");
    assert_eq!(err.code(), "CATEGORY_NOT_FOUND");

    Ok(())
}
