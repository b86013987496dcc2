use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::CartItem;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

/// Cart line joined with the live product it points at.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartLine {
    pub id: Uuid,
    pub quantity: i32,
    pub product: CartProduct,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartProduct {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub image: Option<String>,
    pub stock: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartSummary {
    pub subtotal: i64,
    pub shipping_fee: i64,
    pub total: i64,
    pub item_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub summary: CartSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemData {
    pub item: CartItem,
}
