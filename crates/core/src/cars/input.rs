//! Create/update input for cars and its validation.

use serde::{Deserialize, Serialize};

use crate::types::FuelTypeId;

/// Why a create or update request was rejected.
///
/// The messages are shown to the merchant as-is.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CarValidationError {
    /// Brand, license plate, year or fuel type is missing or not a positive number.
    #[error("All fields except driver name are required")]
    MissingRequired,
    /// Another car already uses the license plate.
    #[error("License plate already exists")]
    LicensePlateTaken,
    /// The fuel type does not exist.
    #[error("Unknown fuel type {0}")]
    UnknownFuelType(FuelTypeId),
}

/// Raw car form fields as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarInput {
    pub brand: String,
    #[serde(alias = "licensePlace")]
    pub license_plate: String,
    pub year: String,
    pub driver_name: String,
    pub fuel_type_id: String,
}

/// A validated car ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCar {
    pub brand: String,
    pub license_plate: String,
    pub year: i32,
    pub driver_name: Option<String>,
    pub fuel_type_id: FuelTypeId,
}

impl CarInput {
    /// Validate the form fields.
    ///
    /// Text fields are trimmed. A blank driver name becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CarValidationError::MissingRequired`] if brand or license
    /// plate is blank, or year or fuel type ID is not a positive integer.
    pub fn validate(&self) -> Result<NewCar, CarValidationError> {
        let brand = self.brand.trim();
        let license_plate = self.license_plate.trim();
        if brand.is_empty() || license_plate.is_empty() {
            return Err(CarValidationError::MissingRequired);
        }

        let year = positive_int(&self.year).ok_or(CarValidationError::MissingRequired)?;
        let fuel_type_id =
            positive_int(&self.fuel_type_id).ok_or(CarValidationError::MissingRequired)?;

        let driver_name = Some(self.driver_name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_owned);

        Ok(NewCar {
            brand: brand.to_owned(),
            license_plate: license_plate.to_owned(),
            year,
            driver_name,
            fuel_type_id: FuelTypeId::new(fuel_type_id),
        })
    }
}

fn positive_int(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().filter(|n| *n > 0)
}
