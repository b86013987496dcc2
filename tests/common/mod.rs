use axum_storefront_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::orders::CustomerInfo,
    entity::{
        categories::ActiveModel as CategoryActive, products::ActiveModel as ProductActive,
        users::ActiveModel as UserActive,
    },
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

/// Returns None (and prints a notice) when no database is configured, so the
/// flow tests can skip instead of failing on machines without Postgres.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_timeline, order_items, orders, cart_items, reviews, banners, audit_logs, products, sub_categories, categories, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(Some(AppState::new(pool, orm)))
}

pub async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        name: Set("Test User".into()),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

pub async fn create_category(state: &AppState, name: &str, slug: &str) -> anyhow::Result<Uuid> {
    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        slug: Set(slug.to_string()),
        icon: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(category.id)
}

pub async fn create_product(
    state: &AppState,
    category_id: Uuid,
    name: &str,
    price: i64,
    stock: i32,
) -> anyhow::Result<Uuid> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(Some("A product for testing".into())),
        price: Set(price),
        original_price: Set(price),
        category_id: Set(category_id),
        sub_category_id: Set(None),
        image: Set(None),
        stock: Set(stock),
        rating: NotSet,
        review_count: NotSet,
        tags: NotSet,
        specs: NotSet,
        is_best_seller: NotSet,
        is_new_arrival: NotSet,
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(product.id)
}

pub fn customer_info() -> CustomerInfo {
    CustomerInfo {
        name: Some("Test Customer".into()),
        email: Some("customer@example.com".into()),
        phone: Some("0900000000".into()),
        address: Some("1 Somewhere Street".into()),
        city: Some("Hanoi".into()),
        district: None,
    }
}
