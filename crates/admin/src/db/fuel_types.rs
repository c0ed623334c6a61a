//! Fuel type repository.

use sqlx::PgPool;
use tracing::{debug, instrument};

use fleetdesk_core::FuelTypeId;
use fleetdesk_core::cars::FuelType;

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct FuelTypeRow {
    id: i32,
    name: String,
}

impl From<FuelTypeRow> for FuelType {
    fn from(row: FuelTypeRow) -> Self {
        Self {
            id: FuelTypeId::new(row.id),
            name: row.name,
        }
    }
}

/// Repository for fuel type reference data.
pub struct FuelTypeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FuelTypeRepository<'a> {
    /// Create a new fuel type repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all fuel types ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<FuelType>, RepositoryError> {
        let rows = sqlx::query_as::<_, FuelTypeRow>(
            r#"
            SELECT id, name FROM car_fuel_types
            ORDER BY name COLLATE "C", id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// The fuel type with the lowest ID, if any exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn first(&self) -> Result<Option<FuelType>, RepositoryError> {
        let row = sqlx::query_as::<_, FuelTypeRow>(
            "SELECT id, name FROM car_fuel_types ORDER BY id LIMIT 1",
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Check whether a fuel type exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: FuelTypeId) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM car_fuel_types WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    /// Insert a fuel type unless one with the same name exists.
    ///
    /// Returns `true` if a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self))]
    pub async fn insert_if_missing(&self, name: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO car_fuel_types (name) VALUES ($1) ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .execute(self.pool)
        .await?;

        let inserted = result.rows_affected() == 1;
        debug!(inserted, "Upserted fuel type");
        Ok(inserted)
    }
}
