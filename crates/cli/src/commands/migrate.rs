//! Database migration command.
//!
//! Applies the relational schema; the statements are idempotent, so
//! running it against an existing database is safe.
//!
//! # Environment Variables
//!
//! - `PLAZA_DATABASE_URL` - `SQLite` connection string

use secrecy::SecretString;

use plaza_api::db;

/// Apply the relational schema.
///
/// # Errors
///
/// Returns an error if `PLAZA_DATABASE_URL` is unset or any statement
/// fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("PLAZA_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "PLAZA_DATABASE_URL not set")?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Applying schema...");
    db::apply_schema(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
