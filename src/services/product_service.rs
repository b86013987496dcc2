use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::products::{
        CreateProductRequest, ProductList, SearchResult, SearchResultList, UpdateProductRequest,
    },
    entity::{
        categories::Entity as Categories,
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
        reviews::{Column as ReviewCol, Entity as Reviews},
        sub_categories::Entity as SubCategories,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSort, SearchQuery},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();

    if let Some(category_id) = query.category {
        condition = condition.add(Column::CategoryId.eq(category_id));
    }

    if let Some(sub_category_id) = query.sub_category {
        condition = condition.add(Column::SubCategoryId.eq(sub_category_id));
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    if let Some(min_rating) = query.rating {
        condition = condition.add(Column::Rating.gte(min_rating));
    }

    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    let sort = query
        .sort
        .as_deref()
        .and_then(ProductSort::parse)
        .unwrap_or(ProductSort::Newest);

    let mut finder = Products::find().filter(condition);
    finder = match sort {
        ProductSort::PriceAsc => finder.order_by_asc(Column::Price),
        ProductSort::PriceDesc => finder.order_by_desc(Column::Price),
        ProductSort::Rating => finder.order_by_desc(Column::Rating),
        ProductSort::Newest => finder.order_by_desc(Column::CreatedAt),
        ProductSort::BestSeller => finder.order_by_desc(Column::ReviewCount),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let meta = Meta::paged(page, limit, total);
    Ok(ApiResponse::success("OK", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let result = Products::find_by_id(id).one(&state.orm).await?;
    match result {
        Some(p) => Ok(ApiResponse::success("OK", product_from_entity(p), None)),
        None => Err(AppError::not_found("PRODUCT_NOT_FOUND", "Product not found")),
    }
}

pub async fn search_products(
    state: &AppState,
    query: SearchQuery,
) -> AppResult<ApiResponse<SearchResultList>> {
    let q = query.q.unwrap_or_default();
    if q.trim().len() < 2 {
        return Err(AppError::validation(
            "INVALID_SEARCH",
            "Search query must be at least 2 characters",
        ));
    }

    let limit = query.limit.unwrap_or(10).min(50);
    let pattern = format!("%{}%", q.trim());

    let results = Products::find()
        .filter(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        )
        .limit(limit)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|p| SearchResult {
            id: p.id,
            name: p.name,
            price: p.price,
            image: p.image,
            rating: p.rating,
        })
        .collect();

    Ok(ApiResponse::success(
        "OK",
        SearchResultList { results },
        None,
    ))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;

    let category = Categories::find_by_id(payload.category_id)
        .one(&state.orm)
        .await?;
    if category.is_none() {
        return Err(AppError::not_found(
            "CATEGORY_NOT_FOUND",
            "Category not found",
        ));
    }

    if let Some(sub_category_id) = payload.sub_category_id {
        let sub = SubCategories::find_by_id(sub_category_id)
            .one(&state.orm)
            .await?;
        if sub.is_none() {
            return Err(AppError::not_found(
                "SUBCATEGORY_NOT_FOUND",
                "SubCategory not found",
            ));
        }
    }

    let original_price = payload.original_price.unwrap_or(payload.price);

    let product = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        description: Set(Some(payload.description)),
        price: Set(payload.price),
        original_price: Set(original_price),
        category_id: Set(payload.category_id),
        sub_category_id: Set(payload.sub_category_id),
        image: Set(payload.image),
        stock: Set(payload.stock),
        rating: Set(0.0),
        review_count: Set(0),
        tags: Set(payload.tags.unwrap_or_else(|| serde_json::json!([]))),
        specs: Set(payload.specs.unwrap_or_else(|| serde_json::json!({}))),
        is_best_seller: Set(payload.is_best_seller.unwrap_or(false)),
        is_new_arrival: Set(payload.is_new_arrival.unwrap_or(true)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product created successfully",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;

    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::not_found("PRODUCT_NOT_FOUND", "Product not found")),
    };

    if let Some(category_id) = payload.category_id {
        let category = Categories::find_by_id(category_id).one(&state.orm).await?;
        if category.is_none() {
            return Err(AppError::not_found(
                "CATEGORY_NOT_FOUND",
                "Category not found",
            ));
        }
    }

    if let Some(sub_category_id) = payload.sub_category_id {
        let sub = SubCategories::find_by_id(sub_category_id)
            .one(&state.orm)
            .await?;
        if sub.is_none() {
            return Err(AppError::not_found(
                "SUBCATEGORY_NOT_FOUND",
                "SubCategory not found",
            ));
        }
    }

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(original_price) = payload.original_price {
        active.original_price = Set(original_price);
    }
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(sub_category_id) = payload.sub_category_id {
        active.sub_category_id = Set(Some(sub_category_id));
    }
    if let Some(image) = payload.image {
        active.image = Set(Some(image));
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(tags) = payload.tags {
        active.tags = Set(tags);
    }
    if let Some(specs) = payload.specs {
        active.specs = Set(specs);
    }
    if let Some(is_best_seller) = payload.is_best_seller {
        active.is_best_seller = Set(is_best_seller);
    }
    if let Some(is_new_arrival) = payload.is_new_arrival {
        active.is_new_arrival = Set(is_new_arrival);
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Product updated successfully",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;

    let product = Products::find_by_id(id).one(&txn).await?;
    if product.is_none() {
        return Err(AppError::not_found("PRODUCT_NOT_FOUND", "Product not found"));
    }

    // Order history references the snapshot rows; the product must stay.
    let ordered = OrderItems::find()
        .filter(OrderItemCol::ProductId.eq(id))
        .count(&txn)
        .await?;
    if ordered > 0 {
        return Err(AppError::validation(
            "PRODUCT_HAS_ORDERS",
            "Cannot delete product with existing orders",
        ));
    }

    Reviews::delete_many()
        .filter(ReviewCol::ProductId.eq(id))
        .exec(&txn)
        .await?;

    Products::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product deleted successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub(crate) fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        original_price: model.original_price,
        category_id: model.category_id,
        sub_category_id: model.sub_category_id,
        image: model.image,
        stock: model.stock,
        rating: model.rating,
        review_count: model.review_count,
        tags: model.tags,
        specs: model.specs,
        is_best_seller: model.is_best_seller,
        is_new_arrival: model.is_new_arrival,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
