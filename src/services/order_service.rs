use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CreateOrderRequest, OrderList, OrderWithItems, UpdateOrderStatusRequest},
    entity::{
        cart_items::Column as CartCol,
        cart_items::Entity as CartItems,
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        order_timeline::{
            ActiveModel as TimelineActive, Column as TimelineCol, Entity as OrderTimeline,
            Model as TimelineModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus, TimelineEntry},
    pricing::order_total,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    state::AppState,
    validation::missing_fields,
};

struct ItemSnapshot {
    product_id: Uuid,
    name: String,
    price: i64,
    quantity: i32,
    image: Option<String>,
}

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let customer = &payload.customer_info;
    if let Some(missing) = missing_fields(&[
        ("name", customer.name.as_deref()),
        ("email", customer.email.as_deref()),
        ("phone", customer.phone.as_deref()),
        ("address", customer.address.as_deref()),
        ("city", customer.city.as_deref()),
    ]) {
        return Err(AppError::validation(
            "MISSING_FIELDS",
            format!("Missing customer info: {}", missing.join(", ")),
        ));
    }

    if payload.items.is_empty() {
        return Err(AppError::validation(
            "EMPTY_ORDER",
            "Order must have at least one item",
        ));
    }

    let payment_method = PaymentMethod::parse(&payload.payment_method).ok_or_else(|| {
        AppError::validation("INVALID_PAYMENT_METHOD", "Invalid payment method")
    })?;

    // Stock reservation, order persistence and cart clear commit together
    // or not at all.
    let txn = state.orm.begin().await?;

    let mut subtotal: i64 = 0;
    let mut snapshots: Vec<ItemSnapshot> = Vec::with_capacity(payload.items.len());

    for item in &payload.items {
        if item.quantity < 1 {
            return Err(AppError::validation(
                "INVALID_QUANTITY",
                "Quantity must be at least 1",
            ));
        }

        let product = Products::find_by_id(item.product_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?;
        let product = match product {
            Some(p) => p,
            None => {
                return Err(AppError::not_found(
                    "PRODUCT_NOT_FOUND",
                    format!("Product {} not found", item.product_id),
                ));
            }
        };

        if product.stock < item.quantity {
            return Err(AppError::validation(
                "INSUFFICIENT_STOCK",
                format!("Insufficient stock for {}", product.name),
            ));
        }

        subtotal += product.price * i64::from(item.quantity);
        snapshots.push(ItemSnapshot {
            product_id: product.id,
            name: product.name,
            price: product.price,
            quantity: item.quantity,
            image: product.image,
        });
    }

    let (shipping_fee, total) = order_total(subtotal);

    let order_id = Uuid::new_v4();
    let order_code = build_order_code(order_id);

    let order = OrderActive {
        id: Set(order_id),
        user_id: Set(user.user_id),
        order_code: Set(order_code),
        subtotal: Set(subtotal),
        shipping_fee: Set(shipping_fee),
        total: Set(total),
        status: Set(OrderStatus::Pending.as_str().into()),
        payment_method: Set(payment_method.as_str().into()),
        payment_status: Set(PaymentStatus::Pending.as_str().into()),
        customer_name: Set(customer.name.clone().unwrap_or_default()),
        customer_email: Set(customer.email.clone().unwrap_or_default()),
        customer_phone: Set(customer.phone.clone().unwrap_or_default()),
        address: Set(customer.address.clone().unwrap_or_default()),
        city: Set(customer.city.clone().unwrap_or_default()),
        district: Set(customer.district.clone()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut order_items: Vec<OrderItem> = Vec::with_capacity(snapshots.len());
    for snapshot in &snapshots {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(snapshot.product_id),
            name: Set(snapshot.name.clone()),
            price: Set(snapshot.price),
            quantity: Set(snapshot.quantity),
            image: Set(snapshot.image.clone()),
            subtotal: Set(snapshot.price * i64::from(snapshot.quantity)),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        order_items.push(order_item_from_entity(item));

        Products::update_many()
            .col_expr(
                ProdCol::Stock,
                Expr::col(ProdCol::Stock).sub(snapshot.quantity),
            )
            .filter(ProdCol::Id.eq(snapshot.product_id))
            .exec(&txn)
            .await?;
    }

    let timeline_entry =
        append_timeline(&txn, order.id, OrderStatus::Pending, "Order created".into()).await?;

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "total": order.total })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order created successfully",
        OrderWithItems {
            order: order_from_entity(order),
            items: order_items,
            timeline: vec![timeline_entry],
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let finder = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let items = attach_details(&state.orm, orders).await?;

    let meta = Meta::paged(page, limit, total);
    Ok(ApiResponse::success("OK", OrderList { items }, Some(meta)))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::not_found("ORDER_NOT_FOUND", "Order not found")),
    };

    if order.user_id != user.user_id {
        return Err(AppError::forbidden("UNAUTHORIZED", "Unauthorized"));
    }

    let data = load_order_with_details(&state.orm, order).await?;
    Ok(ApiResponse::success("OK", data, Some(Meta::empty())))
}

/// Public lookup by order code; the code itself is the capability.
pub async fn track_order(
    state: &AppState,
    order_code: &str,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(OrderCol::OrderCode.eq(order_code))
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::not_found("ORDER_NOT_FOUND", "Order not found")),
    };

    let data = load_order_with_details(&state.orm, order).await?;
    Ok(ApiResponse::success("OK", data, Some(Meta::empty())))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;

    let status = OrderStatus::parse(&payload.status)
        .ok_or_else(|| AppError::validation("INVALID_STATUS", "Invalid status"))?;

    let txn = state.orm.begin().await?;

    let existing = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::not_found("ORDER_NOT_FOUND", "Order not found")),
    };

    let mut active: OrderActive = existing.into();
    active.status = Set(status.as_str().into());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    let description = payload
        .description
        .unwrap_or_else(|| format!("Order status updated to {}", status.as_str()));
    append_timeline(&txn, order.id, status, description).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let data = load_order_with_details(&state.orm, order).await?;
    Ok(ApiResponse::success(
        "Order status updated successfully",
        data,
        Some(Meta::empty()),
    ))
}

pub async fn cancel_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::not_found("ORDER_NOT_FOUND", "Order not found")),
    };

    if order.user_id != user.user_id {
        return Err(AppError::forbidden("UNAUTHORIZED", "Unauthorized"));
    }

    let current = OrderStatus::parse(&order.status);
    if !current.map(|s| s.can_cancel()).unwrap_or(false) {
        return Err(AppError::validation(
            "CANNOT_CANCEL_ORDER",
            "Can only cancel pending orders",
        ));
    }

    let mut active: OrderActive = order.into();
    active.status = Set(OrderStatus::Cancelled.as_str().into());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    append_timeline(
        &txn,
        order.id,
        OrderStatus::Cancelled,
        "Order has been cancelled".into(),
    )
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_cancel",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let data = load_order_with_details(&state.orm, order).await?;
    Ok(ApiResponse::success(
        "Order cancelled successfully",
        data,
        Some(Meta::empty()),
    ))
}

async fn append_timeline<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
    status: OrderStatus,
    description: String,
) -> AppResult<TimelineEntry> {
    let entry = TimelineActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        status: Set(status.as_str().into()),
        description: Set(description),
        created_at: NotSet,
    }
    .insert(conn)
    .await?;
    Ok(timeline_from_entity(entry))
}

async fn load_order_with_details<C: ConnectionTrait>(
    conn: &C,
    order: OrderModel,
) -> AppResult<OrderWithItems> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(conn)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    let timeline = OrderTimeline::find()
        .filter(TimelineCol::OrderId.eq(order.id))
        .order_by_asc(TimelineCol::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(timeline_from_entity)
        .collect();

    Ok(OrderWithItems {
        order: order_from_entity(order),
        items,
        timeline,
    })
}

/// Batch-load items and timeline for a page of orders.
pub(crate) async fn attach_details<C: ConnectionTrait>(
    conn: &C,
    orders: Vec<OrderModel>,
) -> AppResult<Vec<OrderWithItems>> {
    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();

    let mut items_by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for item in OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(ids.clone()))
        .all(conn)
        .await?
    {
        items_by_order
            .entry(item.order_id)
            .or_default()
            .push(order_item_from_entity(item));
    }

    let mut timeline_by_order: HashMap<Uuid, Vec<TimelineEntry>> = HashMap::new();
    for entry in OrderTimeline::find()
        .filter(TimelineCol::OrderId.is_in(ids))
        .order_by_asc(TimelineCol::CreatedAt)
        .all(conn)
        .await?
    {
        timeline_by_order
            .entry(entry.order_id)
            .or_default()
            .push(timeline_from_entity(entry));
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            let timeline = timeline_by_order.remove(&order.id).unwrap_or_default();
            OrderWithItems {
                order: order_from_entity(order),
                items,
                timeline,
            }
        })
        .collect())
}

pub(crate) fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        order_code: model.order_code,
        subtotal: model.subtotal,
        shipping_fee: model.shipping_fee,
        total: model.total,
        status: model.status,
        payment_method: model.payment_method,
        payment_status: model.payment_status,
        customer_name: model.customer_name,
        customer_email: model.customer_email,
        customer_phone: model.customer_phone,
        address: model.address,
        city: model.city,
        district: model.district,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub(crate) fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        name: model.name,
        price: model.price,
        quantity: model.quantity,
        image: model.image,
        subtotal: model.subtotal,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub(crate) fn timeline_from_entity(model: TimelineModel) -> TimelineEntry {
    TimelineEntry {
        id: model.id,
        order_id: model.order_id,
        status: model.status,
        description: model.description,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn build_order_code(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.simple().to_string();
    let short = suffix[..8].to_uppercase();
    format!("ORD-{date}-{short}")
}
