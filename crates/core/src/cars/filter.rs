//! Filter criteria and sort specification for the car listing.
//!
//! Both are parsed from the listing's URL query parameters:
//!
//! ```text
//! search, brand, licensePlate, year, driverName   single-valued, first occurrence wins
//! fuelType                                        repeatable, empty values skipped
//! sortKey                                         id | brand | licensePlate | year | driverName | fuelType
//! sortDirection                                   asc | desc
//! ```

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors raised while turning request parameters into a query.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The year filter is not a whole number.
    #[error("year filter must be a whole number (got {0:?})")]
    MalformedYear(String),
    /// The sort key is not one of the sortable columns.
    #[error("unknown sort key {0:?}")]
    UnknownSortKey(String),
    /// The sort direction is neither ascending nor descending.
    #[error("unknown sort direction {0:?}")]
    UnknownSortDirection(String),
    /// A text filter contains a NUL character, which the store cannot compare.
    #[error("{0} filter must not contain NUL characters")]
    NulCharacter(&'static str),
}

/// Request-scoped filter values for the car listing.
///
/// `None`, empty strings and an empty fuel type list all mean
/// "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Free-text search over brand, license plate and driver name.
    pub search: Option<String>,
    /// Exact brand.
    pub brand: Option<String>,
    /// Exact license plate.
    pub license_plate: Option<String>,
    /// Exact year, as entered.
    pub year: Option<String>,
    /// Exact driver name.
    pub driver_name: Option<String>,
    /// Fuel type names; a car matches if its fuel type is any of them.
    pub fuel_types: Vec<String>,
}

impl FilterCriteria {
    /// Returns `true` if no criterion constrains the listing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.search,
            &self.brand,
            &self.license_plate,
            &self.year,
            &self.driver_name,
        ]
        .into_iter()
        .all(|value| non_empty(value.as_deref()).is_none())
            && self.fuel_types.is_empty()
    }
}

/// Returns the value if it is present and not empty.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Sortable car listing columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Id,
    Brand,
    LicensePlate,
    Year,
    DriverName,
    /// Sorts by the fuel type's name, not its ID.
    FuelType,
}

impl SortKey {
    /// All sortable columns in table order.
    pub const ALL: [Self; 6] = [
        Self::Id,
        Self::Brand,
        Self::LicensePlate,
        Self::Year,
        Self::DriverName,
        Self::FuelType,
    ];

    /// The query parameter value for this key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Brand => "brand",
            Self::LicensePlate => "licensePlate",
            Self::Year => "year",
            Self::DriverName => "driverName",
            Self::FuelType => "fuelType",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "brand" => Ok(Self::Brand),
            // Older links use the misspelled column key.
            "licensePlate" | "licensePlace" => Ok(Self::LicensePlate),
            "year" => Ok(Self::Year),
            "driverName" => Ok(Self::DriverName),
            "fuelType" => Ok(Self::FuelType),
            other => Err(FilterError::UnknownSortKey(other.to_owned())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// The query parameter value for this direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(FilterError::UnknownSortDirection(other.to_owned())),
        }
    }
}

/// Column and direction to sort the listing by. Defaults to ascending ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Filter and sort parameters of a car listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarListParams {
    pub criteria: FilterCriteria,
    pub sort: SortSpec,
}

impl CarListParams {
    /// Parse listing parameters from decoded query string pairs.
    ///
    /// Single-valued parameters keep their first occurrence, even when it is
    /// empty, so `brand=&brand=Volvo` leaves the brand unconstrained.
    /// `fuelType` collects every non-empty occurrence. Unknown parameters
    /// are ignored. An empty `sortKey` or `sortDirection` falls back to the
    /// default.
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if the sort key or direction is not recognized.
    /// The year is validated later, when the query is built.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = FilterCriteria::default();
        let mut sort_key: Option<String> = None;
        let mut sort_direction: Option<String> = None;

        for (key, value) in pairs {
            let value = value.as_ref();
            let slot = match key.as_ref() {
                "search" => &mut criteria.search,
                "brand" => &mut criteria.brand,
                "licensePlate" => &mut criteria.license_plate,
                "year" => &mut criteria.year,
                "driverName" => &mut criteria.driver_name,
                "sortKey" => &mut sort_key,
                "sortDirection" => &mut sort_direction,
                "fuelType" => {
                    if !value.is_empty() {
                        criteria.fuel_types.push(value.to_owned());
                    }
                    continue;
                }
                _ => continue,
            };

            if slot.is_none() {
                *slot = Some(value.to_owned());
            }
        }

        let sort = SortSpec {
            key: non_empty(sort_key.as_deref()).map_or(Ok(SortKey::default()), str::parse)?,
            direction: non_empty(sort_direction.as_deref())
                .map_or(Ok(SortDirection::default()), str::parse)?,
        };

        Ok(Self { criteria, sort })
    }
}
