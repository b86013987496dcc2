use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::cart::{
        AddToCartRequest, CartItemData, CartLine, CartProduct, CartSummary, CartView,
        UpdateCartItemRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartItem,
    pricing::order_total,
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(FromRow)]
struct CartWithProductRow {
    item_id: Uuid,
    quantity: i32,
    product_id: Uuid,
    name: String,
    price: i64,
    image: Option<String>,
    stock: i32,
}

#[derive(FromRow)]
struct ProductStockRow {
    stock: i32,
}

pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let rows = sqlx::query_as::<_, CartWithProductRow>(
        r#"
        SELECT ci.id AS item_id, ci.quantity,
               p.id AS product_id, p.name, p.price, p.image, p.stock
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.user_id = $1
        ORDER BY ci.created_at DESC
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    let subtotal: i64 = rows
        .iter()
        .map(|row| row.price * i64::from(row.quantity))
        .sum();
    let (shipping_fee, total) = order_total(subtotal);

    let item_count = rows.len() as i64;
    let items = rows
        .into_iter()
        .map(|row| CartLine {
            id: row.item_id,
            quantity: row.quantity,
            product: CartProduct {
                id: row.product_id,
                name: row.name,
                price: row.price,
                image: row.image,
                stock: row.stock,
            },
        })
        .collect();

    let view = CartView {
        items,
        summary: CartSummary {
            subtotal,
            shipping_fee,
            total,
            item_count,
        },
    };

    Ok(ApiResponse::success("OK", view, None))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItemData>> {
    let quantity = payload.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::validation(
            "INVALID_QUANTITY",
            "Quantity must be at least 1",
        ));
    }

    let product: Option<ProductStockRow> =
        sqlx::query_as("SELECT stock FROM products WHERE id = $1")
            .bind(payload.product_id)
            .fetch_optional(&state.pool)
            .await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::not_found("PRODUCT_NOT_FOUND", "Product not found")),
    };

    if product.stock < quantity {
        return Err(AppError::validation(
            "INSUFFICIENT_STOCK",
            "Insufficient stock",
        ));
    }

    let exist: Option<CartItem> =
        sqlx::query_as("SELECT * FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user.user_id)
            .bind(payload.product_id)
            .fetch_optional(&state.pool)
            .await?;

    let cart_item = if let Some(item) = exist {
        // Merged quantity must still fit the current stock.
        let new_quantity = item.quantity + quantity;
        if new_quantity > product.stock {
            return Err(AppError::validation(
                "INSUFFICIENT_STOCK",
                "Insufficient stock",
            ));
        }

        sqlx::query_as::<_, CartItem>(
            r#"
            UPDATE cart_items
            SET quantity = $3
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(item.id)
        .bind(user.user_id)
        .bind(new_quantity)
        .fetch_one(&state.pool)
        .await?
    } else {
        sqlx::query_as(
            "INSERT INTO cart_items (id, user_id, product_id, quantity) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user.user_id)
        .bind(payload.product_id)
        .bind(quantity)
        .fetch_one(&state.pool)
        .await?
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({ "product_id": payload.product_id, "quantity": quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Item added to cart successfully",
        CartItemData { item: cart_item },
        None,
    ))
}

pub async fn update_cart_item(
    state: &AppState,
    user: &AuthUser,
    item_id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartItemData>> {
    if payload.quantity < 1 {
        return Err(AppError::validation(
            "INVALID_QUANTITY",
            "Quantity must be at least 1",
        ));
    }

    let item: Option<CartItem> = sqlx::query_as("SELECT * FROM cart_items WHERE id = $1")
        .bind(item_id)
        .fetch_optional(&state.pool)
        .await?;
    let item = match item {
        Some(i) => i,
        None => return Err(AppError::not_found("ITEM_NOT_FOUND", "Cart item not found")),
    };

    if item.user_id != user.user_id {
        return Err(AppError::forbidden("UNAUTHORIZED", "Unauthorized"));
    }

    let product: ProductStockRow = sqlx::query_as("SELECT stock FROM products WHERE id = $1")
        .bind(item.product_id)
        .fetch_one(&state.pool)
        .await?;

    if product.stock < payload.quantity {
        return Err(AppError::validation(
            "INSUFFICIENT_STOCK",
            "Insufficient stock",
        ));
    }

    let updated: CartItem = sqlx::query_as(
        "UPDATE cart_items SET quantity = $2 WHERE id = $1 RETURNING *",
    )
    .bind(item_id)
    .bind(payload.quantity)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Cart item updated successfully",
        CartItemData { item: updated },
        None,
    ))
}

pub async fn remove_cart_item(
    state: &AppState,
    user: &AuthUser,
    item_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let item: Option<CartItem> = sqlx::query_as("SELECT * FROM cart_items WHERE id = $1")
        .bind(item_id)
        .fetch_optional(&state.pool)
        .await?;
    let item = match item {
        Some(i) => i,
        None => return Err(AppError::not_found("ITEM_NOT_FOUND", "Cart item not found")),
    };

    if item.user_id != user.user_id {
        return Err(AppError::forbidden("UNAUTHORIZED", "Unauthorized"));
    }

    sqlx::query("DELETE FROM cart_items WHERE id = $1")
        .bind(item_id)
        .execute(&state.pool)
        .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_remove",
        Some("cart_items"),
        Some(serde_json::json!({ "item_id": item_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Cart item removed successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Clearing an already-empty cart is a no-op success.
pub async fn clear_cart(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user.user_id)
        .execute(&state.pool)
        .await?;

    Ok(ApiResponse::success(
        "Cart cleared successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
