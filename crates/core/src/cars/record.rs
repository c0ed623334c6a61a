//! Car and fuel type records as returned by the store.

use serde::{Deserialize, Serialize};

use crate::types::{CarId, FuelTypeId};

/// A fuel type from the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelType {
    /// Unique fuel type ID.
    pub id: FuelTypeId,
    /// Display name (e.g. "Diesel").
    pub name: String,
}

/// A car with its fuel type resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarRecord {
    /// Unique car ID.
    pub id: CarId,
    /// Manufacturer brand.
    pub brand: String,
    /// License plate, unique across all cars.
    pub license_plate: String,
    /// Model year.
    pub year: i32,
    /// Assigned driver, if any.
    pub driver_name: Option<String>,
    /// Fuel type.
    pub fuel_type: FuelType,
}
