//! Seed reference data and the placeholder car.
//!
//! # Usage
//!
//! ```bash
//! # Insert the default fuel types (Petrol, Diesel, Electric, Hybrid)
//! fleetdesk seed fuel-types
//!
//! # Insert specific fuel types
//! fleetdesk seed fuel-types --name LPG --name Hydrogen
//!
//! # Insert the placeholder car unless it already exists
//! fleetdesk seed mock-car
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use fleetdesk_admin::db::{CarRepository, FuelTypeRepository};
use fleetdesk_core::FuelTypeId;
use fleetdesk_core::cars::NewCar;

use super::{CommandError, connect};

/// Fuel types inserted when none are named on the command line.
pub const DEFAULT_FUEL_TYPES: [&str; 4] = ["Petrol", "Diesel", "Electric", "Hybrid"];

/// License plate reserved for the placeholder car.
pub const MOCK_LICENSE_PLATE: &str = "------";
const MOCK_YEAR: i32 = 2025;
const MOCK_DRIVER: &str = "abdulrahman";

/// Insert fuel types that do not exist yet.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn fuel_types(names: &[String]) -> Result<(), CommandError> {
    let pool = connect().await?;
    let repo = FuelTypeRepository::new(&pool);

    let names: Vec<&str> = if names.is_empty() {
        DEFAULT_FUEL_TYPES.to_vec()
    } else {
        names.iter().map(|name| name.trim()).filter(|name| !name.is_empty()).collect()
    };

    let mut inserted = 0usize;
    for name in &names {
        if repo.insert_if_missing(name).await? {
            inserted += 1;
        }
    }

    info!(inserted, skipped = names.len() - inserted, "Fuel types seeded");
    Ok(())
}

/// Insert the placeholder car unless its license plate is already taken.
///
/// The car is attached to the fuel type with the lowest ID.
///
/// # Errors
///
/// Returns an error if no fuel types exist, the database is unreachable or
/// the insert fails.
pub async fn mock_car() -> Result<(), CommandError> {
    let pool = connect().await?;
    let cars = CarRepository::new(&pool);

    if cars.license_plate_in_use(MOCK_LICENSE_PLATE, None).await? {
        info!("Mock car already present, nothing to do");
        return Ok(());
    }

    let fuel_type = FuelTypeRepository::new(&pool)
        .first()
        .await?
        .ok_or(CommandError::NoFuelTypes)?;

    let car = mock_car_at(Utc::now(), fuel_type.id);
    let id = cars.create(&car).await?;

    info!(car_id = %id, brand = %car.brand, "Inserted mock car");
    Ok(())
}

/// The placeholder car as of `now`. The brand records the insertion time.
fn mock_car_at(now: DateTime<Utc>, fuel_type_id: FuelTypeId) -> NewCar {
    NewCar {
        brand: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        license_plate: MOCK_LICENSE_PLATE.to_owned(),
        year: MOCK_YEAR,
        driver_name: Some(MOCK_DRIVER.to_owned()),
        fuel_type_id,
    }
}
