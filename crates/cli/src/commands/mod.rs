//! CLI subcommand implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

use fleetdesk_admin::db;

/// Errors shared by the database commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Repository(#[from] db::RepositoryError),

    #[error("No fuel types found; run `fleetdesk seed fuel-types` first")]
    NoFuelTypes,
}

/// Connect to the admin database named by `ADMIN_DATABASE_URL`
/// (or `DATABASE_URL`).
async fn connect() -> Result<sqlx::PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    tracing::info!("Connecting to admin database...");
    Ok(db::create_pool(&database_url, 2).await?)
}
