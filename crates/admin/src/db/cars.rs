//! Car repository.
//!
//! Listing queries are compiled from a [`QueryDescriptor`] into SQL with
//! `sqlx::QueryBuilder`, so the same descriptor that can be evaluated in
//! memory drives the database query. Text ordering uses the `"C"` collation
//! to match byte-wise string comparison.

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, instrument};

use fleetdesk_core::cars::{
    CarRecord, Condition, Field, FuelType, NewCar, OrderBy, QueryDescriptor, SortDirection, Value,
};
use fleetdesk_core::{CarId, FuelTypeId};

use super::RepositoryError;

const SELECT_CARS: &str = "SELECT c.id, c.brand, c.license_plate, c.year, c.driver_name, \
     f.id AS fuel_type_id, f.name AS fuel_type_name \
     FROM cars c JOIN car_fuel_types f ON f.id = c.fuel_type_id";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CarRow {
    id: i32,
    brand: String,
    license_plate: String,
    year: i32,
    driver_name: Option<String>,
    fuel_type_id: i32,
    fuel_type_name: String,
}

impl From<CarRow> for CarRecord {
    fn from(row: CarRow) -> Self {
        Self {
            id: CarId::new(row.id),
            brand: row.brand,
            license_plate: row.license_plate,
            year: row.year,
            driver_name: row.driver_name,
            fuel_type: FuelType {
                id: FuelTypeId::new(row.fuel_type_id),
                name: row.fuel_type_name,
            },
        }
    }
}

// =============================================================================
// Query compilation
// =============================================================================

const fn column(field: Field) -> &'static str {
    match field {
        Field::Id => "c.id",
        Field::Brand => "c.brand",
        Field::LicensePlate => "c.license_plate",
        Field::Year => "c.year",
        Field::DriverName => "c.driver_name",
        Field::FuelTypeName => "f.name",
    }
}

const fn is_text(field: Field) -> bool {
    !matches!(field, Field::Id | Field::Year)
}

/// Build the `SELECT` for a listing query.
pub(crate) fn select_query(query: &QueryDescriptor) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_CARS);

    for (i, condition) in query.predicate.conditions.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        push_condition(&mut builder, condition);
    }

    push_order(&mut builder, query.order);
    builder
}

fn push_condition(builder: &mut QueryBuilder<'static, Postgres>, condition: &Condition) {
    match condition {
        Condition::Equals { field, value } => {
            builder.push(column(*field)).push(" = ");
            match value {
                Value::Integer(n) => builder.push_bind(*n),
                Value::Text(s) => builder.push_bind(s.clone()),
            };
        }
        Condition::Contains { fields, needle } => {
            if fields.is_empty() {
                builder.push("FALSE");
                return;
            }
            builder.push("(");
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                builder
                    .push("strpos(")
                    .push(column(*field))
                    .push(", ")
                    .push_bind(needle.clone())
                    .push(") > 0");
            }
            builder.push(")");
        }
        Condition::ContainsAny { field, values } => {
            builder
                .push(column(*field))
                .push(" = ANY(")
                .push_bind(values.clone())
                .push(")");
        }
    }
}

fn push_order(builder: &mut QueryBuilder<'static, Postgres>, order: OrderBy) {
    builder.push(" ORDER BY ").push(column(order.field));
    if is_text(order.field) {
        builder.push(r#" COLLATE "C""#);
    }
    builder.push(match order.direction {
        SortDirection::Ascending => " ASC NULLS LAST",
        SortDirection::Descending => " DESC NULLS FIRST",
    });
    if order.field != Field::Id {
        builder.push(", c.id ASC");
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for car database operations.
pub struct CarRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CarRepository<'a> {
    /// Create a new car repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List cars matching a query, in the query's order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, query), fields(conditions = query.predicate.conditions.len()))]
    pub async fn list(&self, query: &QueryDescriptor) -> Result<Vec<CarRecord>, RepositoryError> {
        let rows: Vec<CarRow> = select_query(query)
            .build_query_as()
            .fetch_all(self.pool)
            .await?;

        debug!(count = rows.len(), "Listed cars");
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List every car, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<CarRecord>, RepositoryError> {
        self.list(&QueryDescriptor::default()).await
    }

    /// Get a car by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CarId) -> Result<Option<CarRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, CarRow>(&format!("{SELECT_CARS} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Check whether a license plate is used by any car other than `excluding`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn license_plate_in_use(
        &self,
        license_plate: &str,
        excluding: Option<CarId>,
    ) -> Result<bool, RepositoryError> {
        let (in_use,): (bool,) = sqlx::query_as(
            r"
            SELECT EXISTS(
                SELECT 1 FROM cars
                WHERE license_plate = $1 AND ($2::INTEGER IS NULL OR id <> $2)
            )
            ",
        )
        .bind(license_plate)
        .bind(excluding)
        .fetch_one(self.pool)
        .await?;

        Ok(in_use)
    }

    /// Insert a car.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the license plate is taken.
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, car), fields(license_plate = %car.license_plate))]
    pub async fn create(&self, car: &NewCar) -> Result<CarId, RepositoryError> {
        let (id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO cars (brand, license_plate, year, driver_name, fuel_type_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(&car.brand)
        .bind(&car.license_plate)
        .bind(car.year)
        .bind(car.driver_name.as_deref())
        .bind(car.fuel_type_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "license plate already exists"))?;

        debug!(id, "Created car");
        Ok(CarId::new(id))
    }

    /// Overwrite a car's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no car has this ID.
    /// Returns `RepositoryError::Conflict` if the license plate is taken.
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self, car), fields(license_plate = %car.license_plate))]
    pub async fn update(&self, id: CarId, car: &NewCar) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cars
            SET brand = $2, license_plate = $3, year = $4, driver_name = $5, fuel_type_id = $6
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&car.brand)
        .bind(&car.license_plate)
        .bind(car.year)
        .bind(car.driver_name.as_deref())
        .bind(car.fuel_type_id)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "license plate already exists"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a car.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no car has this ID.
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CarId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fleetdesk_core::cars::{FilterCriteria, SortKey, SortSpec, build_query};

    fn sql(criteria: &FilterCriteria, sort: SortSpec) -> String {
        let query = build_query(criteria, sort).unwrap();
        select_query(&query).sql().to_owned()
    }

    #[test]
    fn test_no_filters() {
        let sql = sql(&FilterCriteria::default(), SortSpec::default());
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with(" ORDER BY c.id ASC NULLS LAST"));
    }

    #[test]
    fn test_search_is_one_or_group() {
        let criteria = FilterCriteria {
            search: Some("Vol".to_string()),
            ..Default::default()
        };
        let sql = sql(&criteria, SortSpec::default());
        assert!(sql.contains(
            " WHERE (strpos(c.brand, $1) > 0 OR strpos(c.license_plate, $2) > 0 \
             OR strpos(c.driver_name, $3) > 0)"
        ));
    }

    #[test]
    fn test_conditions_are_anded_in_order() {
        let criteria = FilterCriteria {
            brand: Some("Volvo".to_string()),
            year: Some("2022".to_string()),
            fuel_types: vec!["Diesel".to_string(), "Electric".to_string()],
            ..Default::default()
        };
        let sql = sql(&criteria, SortSpec::default());
        assert!(sql.contains(" WHERE c.brand = $1 AND c.year = $2 AND f.name = ANY($3)"));
    }

    #[test]
    fn test_fuel_type_sort_uses_name_and_id_tiebreak() {
        let sort = SortSpec {
            key: SortKey::FuelType,
            direction: SortDirection::Ascending,
        };
        let sql = sql(&FilterCriteria::default(), sort);
        assert!(sql.ends_with(r#" ORDER BY f.name COLLATE "C" ASC NULLS LAST, c.id ASC"#));
    }

    #[test]
    fn test_descending_puts_nulls_first() {
        let sort = SortSpec {
            key: SortKey::DriverName,
            direction: SortDirection::Descending,
        };
        let sql = sql(&FilterCriteria::default(), sort);
        assert!(sql.ends_with(r#" ORDER BY c.driver_name COLLATE "C" DESC NULLS FIRST, c.id ASC"#));
    }

    #[test]
    fn test_year_sort_has_no_collation() {
        let sort = SortSpec {
            key: SortKey::Year,
            direction: SortDirection::Descending,
        };
        let sql = sql(&FilterCriteria::default(), sort);
        assert!(sql.ends_with(" ORDER BY c.year DESC NULLS FIRST, c.id ASC"));
    }

    #[test]
    fn test_empty_contains_group_matches_nothing() {
        let query = QueryDescriptor {
            predicate: fleetdesk_core::cars::Predicate {
                conditions: vec![Condition::Contains {
                    fields: vec![],
                    needle: "x".to_string(),
                }],
            },
            order: OrderBy::default(),
        };
        assert!(select_query(&query).sql().contains(" WHERE FALSE "));
    }
}
