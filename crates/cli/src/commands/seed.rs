//! Seed the database with demo data.
//!
//! Creates a handful of categories, one admin, two producers, two
//! consumers, and a small product catalog. Intended for local
//! development; the seed goes through the same store traits as the API,
//! so everything it writes is valid domain data.
//!
//! # Environment Variables
//!
//! - `PLAZA_DATABASE_URL` - `SQLite` connection string

use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::SecretString;

use plaza_core::{Price, UserId, UserRole};

use plaza_api::db::{self, RelationalStore};
use plaza_api::models::{NewCategory, NewProduct, NewUser};
use plaza_api::services::auth::hash_password;
use plaza_api::store::{CatalogStore, IdentityStore};

const SEED_PASSWORD: &str = "plaza-demo-password";

struct SeedUser {
    username: &'static str,
    email: &'static str,
    role: UserRole,
}

const SEED_USERS: &[SeedUser] = &[
    SeedUser {
        username: "admin",
        email: "admin@plaza.test",
        role: UserRole::Admin,
    },
    SeedUser {
        username: "marta_ceramics",
        email: "marta@plaza.test",
        role: UserRole::Producer,
    },
    SeedUser {
        username: "finn_leather",
        email: "finn@plaza.test",
        role: UserRole::Producer,
    },
    SeedUser {
        username: "alice",
        email: "alice@plaza.test",
        role: UserRole::Consumer,
    },
    SeedUser {
        username: "bob",
        email: "bob@plaza.test",
        role: UserRole::Consumer,
    },
];

const SEED_CATEGORIES: &[(&str, &str)] = &[
    ("Art", "Prints, paintings and sculpture"),
    ("Clothing", "Handmade garments"),
    ("Accessories", "Bags, belts and small goods"),
    ("Home Decor", "Objects for the home"),
    ("Jewelry", "Rings, necklaces and earrings"),
];

// (name, price, category index, producer index, stock, tags)
#[allow(clippy::type_complexity)]
const SEED_PRODUCTS: &[(&str, &str, usize, usize, i64, &[&str])] = &[
    ("Stoneware Vase", "42.00", 3, 0, 12, &["ceramic", "vase"]),
    ("Linen Scarf", "24.50", 1, 0, 30, &["linen"]),
    ("Leather Belt", "35.00", 2, 1, 18, &["leather"]),
    ("Card Wallet", "29.99", 2, 1, 25, &["leather", "wallet"]),
    ("Silver Ring", "55.00", 4, 0, 8, &["silver", "ring"]),
    ("Brass Earrings", "19.99", 4, 1, 14, &["brass"]),
    ("Abstract Print", "60.00", 0, 0, 5, &["print"]),
    ("Wool Beanie", "17.50", 1, 1, 40, &["wool"]),
    ("Ceramic Mug", "15.00", 3, 0, 50, &["ceramic", "mug"]),
    ("Pendant Necklace", "48.00", 4, 0, 10, &["necklace"]),
];

/// Seed categories, users and products.
///
/// # Errors
///
/// Returns an error on any store failure; a duplicate from a previous
/// seed run surfaces as a conflict.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("PLAZA_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "PLAZA_DATABASE_URL not set")?;

    let pool = db::create_pool(&database_url).await?;
    db::apply_schema(&pool).await?;
    let store = Arc::new(RelationalStore::new(pool));

    tracing::info!("Seeding users...");
    let password_hash = hash_password(SEED_PASSWORD)?;
    let mut user_ids: Vec<UserId> = Vec::new();
    for seed in SEED_USERS {
        let user = store
            .create_user(NewUser {
                username: seed.username.parse()?,
                email: seed.email.parse()?,
                password_hash: password_hash.clone(),
                role: seed.role,
            })
            .await?;
        tracing::info!(username = seed.username, role = %seed.role, "created user");
        user_ids.push(user.id);
    }

    tracing::info!("Seeding categories...");
    let mut category_ids = Vec::new();
    for (name, description) in SEED_CATEGORIES {
        let category = store
            .create_category(NewCategory::new(
                (*name).to_owned(),
                Some((*description).to_owned()),
            )?)
            .await?;
        category_ids.push(category.id);
    }

    tracing::info!("Seeding products...");
    // Producers are seeded at indices 1 and 2.
    let producers = [user_ids[1], user_ids[2]];
    for (name, price, category, producer, stock, tags) in SEED_PRODUCTS {
        let price = Price::new(price.parse::<Decimal>()?)?;
        let new = NewProduct::new(
            (*name).to_owned(),
            None,
            price,
            None,
            category_ids[*category],
            *stock,
            true,
            tags.iter().map(|t| (*t).to_owned()).collect(),
            Vec::new(),
        )?;
        store.create_product(producers[*producer], new).await?;
    }

    tracing::info!(
        users = SEED_USERS.len(),
        categories = SEED_CATEGORIES.len(),
        products = SEED_PRODUCTS.len(),
        "Seed complete!"
    );
    Ok(())
}
