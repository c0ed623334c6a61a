//! Option lists for the listing's filter dropdowns.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::record::{CarRecord, FuelType};

/// Distinct column values across the unfiltered car set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Distinct brands, sorted.
    pub brands: Vec<String>,
    /// Distinct license plates, sorted.
    pub license_plates: Vec<String>,
    /// Distinct years rendered as text, newest first.
    pub years: Vec<String>,
    /// Distinct non-empty driver names, sorted.
    pub driver_names: Vec<String>,
}

impl FilterOptions {
    /// Collect the distinct values of every filterable column.
    ///
    /// An empty slice yields four empty lists.
    #[must_use]
    pub fn from_records(cars: &[CarRecord]) -> Self {
        let brands: BTreeSet<&str> = cars.iter().map(|c| c.brand.as_str()).collect();
        let plates: BTreeSet<&str> = cars.iter().map(|c| c.license_plate.as_str()).collect();
        let years: BTreeSet<i32> = cars.iter().map(|c| c.year).collect();
        let drivers: BTreeSet<&str> = cars
            .iter()
            .filter_map(|c| c.driver_name.as_deref())
            .filter(|name| !name.is_empty())
            .collect();

        Self {
            brands: brands.into_iter().map(str::to_owned).collect(),
            license_plates: plates.into_iter().map(str::to_owned).collect(),
            years: years.into_iter().rev().map(|y| y.to_string()).collect(),
            driver_names: drivers.into_iter().map(str::to_owned).collect(),
        }
    }
}

/// Drop fuel types whose name was already seen, keeping the first.
#[must_use]
pub fn fuel_type_options(fuel_types: &[FuelType]) -> Vec<FuelType> {
    let mut seen = HashSet::new();
    fuel_types
        .iter()
        .filter(|ft| seen.insert(ft.name.as_str()))
        .cloned()
        .collect()
}
