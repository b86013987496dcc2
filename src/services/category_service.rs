use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    dto::categories::{
        CategoryDetail, CategoryList, CategoryProduct, CategoryWithSubs, CreateCategoryRequest,
        CreateSubCategoryRequest, SubCategoryList, UpdateCategoryRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, SubCategory},
    response::{ApiResponse, Meta},
    state::AppState,
};

const DEFAULT_ICON: &str = "📦";

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let categories: Vec<Category> = sqlx::query_as("SELECT * FROM categories ORDER BY name")
        .fetch_all(&state.pool)
        .await?;

    let subs: Vec<SubCategory> =
        sqlx::query_as("SELECT * FROM sub_categories ORDER BY name")
            .fetch_all(&state.pool)
            .await?;

    let counts: Vec<(Uuid, i64)> =
        sqlx::query_as("SELECT category_id, COUNT(*) FROM products GROUP BY category_id")
            .fetch_all(&state.pool)
            .await?;
    let counts: HashMap<Uuid, i64> = counts.into_iter().collect();

    let mut subs_by_category: HashMap<Uuid, Vec<SubCategory>> = HashMap::new();
    for sub in subs {
        subs_by_category.entry(sub.category_id).or_default().push(sub);
    }

    let total = categories.len() as i64;
    let categories = categories
        .into_iter()
        .map(|category| {
            let product_count = counts.get(&category.id).copied().unwrap_or(0);
            let sub_categories = subs_by_category.remove(&category.id).unwrap_or_default();
            CategoryWithSubs {
                category,
                product_count,
                sub_categories,
            }
        })
        .collect();

    Ok(ApiResponse::success(
        "OK",
        CategoryList { categories, total },
        None,
    ))
}

/// Lookup by id when the path segment parses as a UUID, by slug otherwise.
pub async fn get_category(state: &AppState, key: &str) -> AppResult<ApiResponse<CategoryDetail>> {
    let category: Option<Category> = match Uuid::parse_str(key) {
        Ok(id) => {
            sqlx::query_as("SELECT * FROM categories WHERE id = $1")
                .bind(id)
                .fetch_optional(&state.pool)
                .await?
        }
        Err(_) => {
            sqlx::query_as("SELECT * FROM categories WHERE slug = $1")
                .bind(key)
                .fetch_optional(&state.pool)
                .await?
        }
    };

    let category = match category {
        Some(c) => c,
        None => {
            return Err(AppError::not_found(
                "CATEGORY_NOT_FOUND",
                "Category not found",
            ));
        }
    };

    let sub_categories: Vec<SubCategory> =
        sqlx::query_as("SELECT * FROM sub_categories WHERE category_id = $1 ORDER BY name")
            .bind(category.id)
            .fetch_all(&state.pool)
            .await?;

    let products: Vec<CategoryProduct> = sqlx::query_as(
        r#"
        SELECT id, name, price, stock, rating, review_count, image
        FROM products
        WHERE category_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(category.id)
    .fetch_all(&state.pool)
    .await?;

    let detail = CategoryDetail {
        product_count: products.len() as i64,
        sub_categories,
        products,
        category,
    };

    Ok(ApiResponse::success("OK", detail, None))
}

pub async fn list_sub_categories(
    state: &AppState,
    category_id: Uuid,
) -> AppResult<ApiResponse<SubCategoryList>> {
    let category: Option<Category> = sqlx::query_as("SELECT * FROM categories WHERE id = $1")
        .bind(category_id)
        .fetch_optional(&state.pool)
        .await?;
    let category = match category {
        Some(c) => c,
        None => {
            return Err(AppError::not_found(
                "CATEGORY_NOT_FOUND",
                "Category not found",
            ));
        }
    };

    let sub_categories: Vec<SubCategory> =
        sqlx::query_as("SELECT * FROM sub_categories WHERE category_id = $1 ORDER BY name")
            .bind(category_id)
            .fetch_all(&state.pool)
            .await?;

    let total = sub_categories.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        SubCategoryList {
            category: category.name,
            sub_categories,
            total,
        },
        None,
    ))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;

    if payload.name.trim().is_empty() || payload.slug.trim().is_empty() {
        return Err(AppError::validation(
            "MISSING_FIELDS",
            "Name and slug are required",
        ));
    }

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM categories WHERE slug = $1")
        .bind(payload.slug.as_str())
        .fetch_optional(&state.pool)
        .await?;
    if exist.is_some() {
        return Err(AppError::validation(
            "DUPLICATE_SLUG",
            "Category with this slug already exists",
        ));
    }

    let icon = payload.icon.unwrap_or_else(|| DEFAULT_ICON.to_string());
    let category: Category = sqlx::query_as(
        "INSERT INTO categories (id, name, slug, icon) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.as_str())
    .bind(payload.slug.as_str())
    .bind(icon)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Category created successfully",
        category,
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    category_id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;

    let existing: Option<Category> = sqlx::query_as("SELECT * FROM categories WHERE id = $1")
        .bind(category_id)
        .fetch_optional(&state.pool)
        .await?;
    let existing = match existing {
        Some(c) => c,
        None => {
            return Err(AppError::not_found(
                "CATEGORY_NOT_FOUND",
                "Category not found",
            ));
        }
    };

    if let Some(slug) = payload.slug.as_ref().filter(|s| **s != existing.slug) {
        let duplicate: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM categories WHERE slug = $1")
                .bind(slug.as_str())
                .fetch_optional(&state.pool)
                .await?;
        if duplicate.is_some() {
            return Err(AppError::validation(
                "DUPLICATE_SLUG",
                "Category with this slug already exists",
            ));
        }
    }

    let name = payload.name.unwrap_or(existing.name);
    let slug = payload.slug.unwrap_or(existing.slug);
    let icon = payload.icon.or(existing.icon);

    let category: Category = sqlx::query_as(
        r#"
        UPDATE categories
        SET name = $2, slug = $3, icon = $4, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(category_id)
    .bind(name)
    .bind(slug)
    .bind(icon)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Category updated successfully",
        category,
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    category_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM categories WHERE id = $1")
        .bind(category_id)
        .fetch_optional(&state.pool)
        .await?;
    if exist.is_none() {
        return Err(AppError::not_found(
            "CATEGORY_NOT_FOUND",
            "Category not found",
        ));
    }

    let product_count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM products WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&state.pool)
            .await?;
    if product_count.0 > 0 {
        return Err(AppError::validation(
            "CATEGORY_HAS_PRODUCTS",
            "Cannot delete category with products",
        ));
    }

    sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(category_id)
        .execute(&state.pool)
        .await?;

    Ok(ApiResponse::success(
        "Category deleted successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn create_sub_category(
    state: &AppState,
    user: &AuthUser,
    category_id: Uuid,
    payload: CreateSubCategoryRequest,
) -> AppResult<ApiResponse<SubCategory>> {
    ensure_admin(user)?;

    if payload.name.trim().is_empty() || payload.slug.trim().is_empty() {
        return Err(AppError::validation(
            "MISSING_FIELDS",
            "Name and slug are required",
        ));
    }

    let category: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM categories WHERE id = $1")
        .bind(category_id)
        .fetch_optional(&state.pool)
        .await?;
    if category.is_none() {
        return Err(AppError::not_found(
            "CATEGORY_NOT_FOUND",
            "Category not found",
        ));
    }

    let sub_category: SubCategory = sqlx::query_as(
        "INSERT INTO sub_categories (id, category_id, name, slug) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(category_id)
    .bind(payload.name.as_str())
    .bind(payload.slug.as_str())
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Subcategory created successfully",
        sub_category,
        Some(Meta::empty()),
    ))
}
