use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_storefront_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "admin").await?;
    let user_id = ensure_user(&pool, "user@example.com", "user123", "user").await?;
    let category_id = ensure_category(&pool, "Laptop", "laptop").await?;
    seed_products(&pool, category_id).await?;
    seed_banner(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, name, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(email.split('@').next().unwrap_or("user"))
    .bind(role)
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn ensure_category(pool: &sqlx::PgPool, name: &str, slug: &str) -> anyhow::Result<Uuid> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO categories (id, name, slug, icon)
        VALUES ($1, $2, $3, '💻')
        ON CONFLICT (slug) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    let category_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM categories WHERE slug = $1")
                .bind(slug)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured category {name}");
    Ok(category_id)
}

async fn seed_products(pool: &sqlx::PgPool, category_id: Uuid) -> anyhow::Result<()> {
    let products = vec![
        ("Gaming Laptop 15", "RTX graphics, 144Hz display", 29_990_000_i64, 15),
        ("Business Ultrabook 14", "Light chassis, long battery life", 22_990_000, 20),
        ("Budget Laptop 15", "Everyday workloads", 12_490_000, 50),
        ("Creator Laptop 16", "Colour-accurate display", 35_990_000, 8),
    ];

    for (name, desc, price, stock) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, original_price, category_id, stock)
            VALUES ($1, $2, $3, $4, $4, $5, $6)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(category_id)
        .bind(stock)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}

async fn seed_banner(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let existing: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM banners WHERE title = $1")
        .bind("Back to school")
        .fetch_one(pool)
        .await?;
    if existing.0 > 0 {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO banners (id, title, description, image, url, status, priority)
        VALUES ($1, 'Back to school', 'Laptop deals all month', '/banners/back-to-school.jpg', '/products?category=laptop', 'active', 10)
        "#,
    )
    .bind(Uuid::new_v4())
    .execute(pool)
    .await?;

    println!("Seeded banner");
    Ok(())
}
