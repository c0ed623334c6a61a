//! Storage-agnostic query descriptors for the car listing.
//!
//! [`build_query`] turns [`FilterCriteria`] and a [`SortSpec`] into a
//! [`QueryDescriptor`]: a conjunctive list of typed conditions plus an
//! ordering. The admin store compiles descriptors to SQL; [`QueryDescriptor::apply`]
//! evaluates them in memory with the same semantics:
//!
//! - text comparisons are case-sensitive and compare bytes
//! - a missing driver name never equals or contains anything
//! - ordering puts missing driver names last when ascending, first when descending
//! - rows that tie on the sort column are ordered by ascending ID

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::filter::{FilterCriteria, FilterError, SortDirection, SortKey, SortSpec, non_empty};
use super::record::CarRecord;

/// A car column a condition can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Id,
    Brand,
    LicensePlate,
    Year,
    DriverName,
    /// Name of the referenced fuel type.
    FuelTypeName,
}

/// Fields covered by free-text search.
pub const SEARCH_FIELDS: [Field; 3] = [Field::Brand, Field::LicensePlate, Field::DriverName];

/// The value a field holds on a particular car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldValue<'a> {
    Text(Option<&'a str>),
    Integer(i32),
}

impl Field {
    fn read(self, car: &CarRecord) -> FieldValue<'_> {
        match self {
            Self::Id => FieldValue::Integer(car.id.as_i32()),
            Self::Brand => FieldValue::Text(Some(&car.brand)),
            Self::LicensePlate => FieldValue::Text(Some(&car.license_plate)),
            Self::Year => FieldValue::Integer(car.year),
            Self::DriverName => FieldValue::Text(car.driver_name.as_deref()),
            Self::FuelTypeName => FieldValue::Text(Some(&car.fuel_type.name)),
        }
    }

    fn text(self, car: &CarRecord) -> Option<&str> {
        match self.read(car) {
            FieldValue::Text(text) => text,
            FieldValue::Integer(_) => None,
        }
    }
}

impl From<SortKey> for Field {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Id => Self::Id,
            SortKey::Brand => Self::Brand,
            SortKey::LicensePlate => Self::LicensePlate,
            SortKey::Year => Self::Year,
            SortKey::DriverName => Self::DriverName,
            SortKey::FuelType => Self::FuelTypeName,
        }
    }
}

/// A literal compared against a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i32),
    Text(String),
}

/// A single condition of a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Condition {
    /// The field equals the value.
    Equals { field: Field, value: Value },
    /// At least one of the fields contains `needle` as a substring.
    Contains { fields: Vec<Field>, needle: String },
    /// The field equals one of the values.
    ContainsAny { field: Field, values: Vec<String> },
}

impl Condition {
    /// Evaluate the condition against a car.
    #[must_use]
    pub fn matches(&self, car: &CarRecord) -> bool {
        match self {
            Self::Equals { field, value } => match (field.read(car), value) {
                (FieldValue::Integer(actual), Value::Integer(expected)) => actual == *expected,
                (FieldValue::Text(Some(actual)), Value::Text(expected)) => actual == expected,
                _ => false,
            },
            Self::Contains { fields, needle } => fields
                .iter()
                .filter_map(|field| field.text(car))
                .any(|text| text.contains(needle.as_str())),
            Self::ContainsAny { field, values } => field
                .text(car)
                .is_some_and(|text| values.iter().any(|value| value == text)),
        }
    }
}

/// A conjunction of conditions. An empty predicate matches every car.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub conditions: Vec<Condition>,
}

impl Predicate {
    /// Returns `true` if the predicate places no constraint on the listing.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate every condition against a car.
    #[must_use]
    pub fn matches(&self, car: &CarRecord) -> bool {
        self.conditions.iter().all(|condition| condition.matches(car))
    }
}

/// Ordering of the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: Field,
    pub direction: SortDirection,
}

impl Default for OrderBy {
    fn default() -> Self {
        SortSpec::default().into()
    }
}

impl From<SortSpec> for OrderBy {
    fn from(sort: SortSpec) -> Self {
        Self {
            field: sort.key.into(),
            direction: sort.direction,
        }
    }
}

impl OrderBy {
    /// Compare two cars by this ordering, breaking ties by ascending ID.
    #[must_use]
    pub fn compare(&self, a: &CarRecord, b: &CarRecord) -> Ordering {
        let primary = match (self.field.read(a), self.field.read(b)) {
            (FieldValue::Integer(x), FieldValue::Integer(y)) => x.cmp(&y),
            (FieldValue::Text(x), FieldValue::Text(y)) => compare_nulls_last(x, y),
            _ => Ordering::Equal,
        };

        let primary = match self.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };

        primary.then_with(|| a.id.cmp(&b.id))
    }
}

fn compare_nulls_last(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A predicate plus an ordering, ready for a store to execute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    pub predicate: Predicate,
    pub order: OrderBy,
}

impl QueryDescriptor {
    /// Execute the descriptor against an in-memory collection.
    #[must_use]
    pub fn apply<I>(&self, cars: I) -> Vec<CarRecord>
    where
        I: IntoIterator<Item = CarRecord>,
    {
        let mut matched: Vec<CarRecord> = cars
            .into_iter()
            .filter(|car| self.predicate.matches(car))
            .collect();
        matched.sort_by(|a, b| self.order.compare(a, b));
        matched
    }
}

/// Build a query descriptor from filter criteria and a sort specification.
///
/// Each non-empty criterion adds one condition. Search adds a single
/// [`Condition::Contains`] over [`SEARCH_FIELDS`]; a non-empty fuel type
/// list adds a single [`Condition::ContainsAny`] on the fuel type name.
///
/// # Errors
///
/// Returns [`FilterError::MalformedYear`] if the year criterion is not a
/// whole number, or [`FilterError::NulCharacter`] if a text criterion
/// contains a NUL character.
pub fn build_query(criteria: &FilterCriteria, sort: SortSpec) -> Result<QueryDescriptor, FilterError> {
    let mut conditions = Vec::new();

    if let Some(search) = non_empty(criteria.search.as_deref()) {
        conditions.push(Condition::Contains {
            fields: SEARCH_FIELDS.to_vec(),
            needle: reject_nul("search", search)?.to_owned(),
        });
    }

    if let Some(brand) = non_empty(criteria.brand.as_deref()) {
        conditions.push(equals_text(Field::Brand, reject_nul("brand", brand)?));
    }

    if let Some(plate) = non_empty(criteria.license_plate.as_deref()) {
        conditions.push(equals_text(Field::LicensePlate, reject_nul("licensePlate", plate)?));
    }

    if let Some(year) = non_empty(criteria.year.as_deref()) {
        let year = year
            .trim()
            .parse::<i32>()
            .map_err(|_| FilterError::MalformedYear(year.to_owned()))?;
        conditions.push(Condition::Equals {
            field: Field::Year,
            value: Value::Integer(year),
        });
    }

    if let Some(driver) = non_empty(criteria.driver_name.as_deref()) {
        conditions.push(equals_text(Field::DriverName, reject_nul("driverName", driver)?));
    }

    if !criteria.fuel_types.is_empty() {
        for name in &criteria.fuel_types {
            reject_nul("fuelType", name)?;
        }
        conditions.push(Condition::ContainsAny {
            field: Field::FuelTypeName,
            values: criteria.fuel_types.clone(),
        });
    }

    Ok(QueryDescriptor {
        predicate: Predicate { conditions },
        order: sort.into(),
    })
}

/// Postgres text cannot hold NUL, so such a value could never be compared.
fn reject_nul<'a>(name: &'static str, value: &'a str) -> Result<&'a str, FilterError> {
    if value.contains('\0') {
        return Err(FilterError::NulCharacter(name));
    }
    Ok(value)
}

fn equals_text(field: Field, value: &str) -> Condition {
    Condition::Equals {
        field,
        value: Value::Text(value.to_owned()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cars::record::FuelType;
    use crate::types::{CarId, FuelTypeId};

    fn fuel(id: i32, name: &str) -> FuelType {
        FuelType {
            id: FuelTypeId::new(id),
            name: name.to_owned(),
        }
    }

    fn car(id: i32, brand: &str, plate: &str, year: i32, driver: Option<&str>, fuel_type: FuelType) -> CarRecord {
        CarRecord {
            id: CarId::new(id),
            brand: brand.to_owned(),
            license_plate: plate.to_owned(),
            year,
            driver_name: driver.map(str::to_owned),
            fuel_type,
        }
    }

    fn fleet() -> Vec<CarRecord> {
        vec![
            car(1, "Volvo", "ABC-123", 2019, Some("Anna"), fuel(2, "Petrol")),
            car(2, "Tesla", "EV-0042", 2022, None, fuel(3, "Electric")),
            car(3, "Scania", "TRK-900", 2020, Some("Bo"), fuel(1, "Diesel")),
            car(4, "Volvo", "XYZ-777", 2022, Some("Cleo"), fuel(1, "Diesel")),
            car(5, "Toyota", "HYB-555", 2021, Some("Anna"), fuel(4, "Hybrid")),
        ]
    }

    fn ids(cars: &[CarRecord]) -> Vec<i32> {
        cars.iter().map(|c| c.id.as_i32()).collect()
    }

    fn run(criteria: &FilterCriteria, sort: SortSpec) -> Vec<i32> {
        ids(&build_query(criteria, sort).unwrap().apply(fleet()))
    }

    #[test]
    fn test_empty_criteria_is_identity_filter() {
        let query = build_query(&FilterCriteria::default(), SortSpec::default()).unwrap();
        assert!(query.predicate.is_identity());
        assert!(fleet().iter().all(|c| query.predicate.matches(c)));
        assert_eq!(ids(&query.apply(fleet())), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_blank_criteria_add_no_conditions() {
        let criteria = FilterCriteria {
            search: Some(String::new()),
            brand: Some(String::new()),
            year: Some(String::new()),
            ..FilterCriteria::default()
        };
        let query = build_query(&criteria, SortSpec::default()).unwrap();
        assert!(query.predicate.is_identity());
    }

    #[test]
    fn test_search_is_a_single_or_group() {
        let criteria = FilterCriteria {
            search: Some("An".to_owned()),
            ..FilterCriteria::default()
        };
        let query = build_query(&criteria, SortSpec::default()).unwrap();
        assert_eq!(
            query.predicate.conditions,
            vec![Condition::Contains {
                fields: SEARCH_FIELDS.to_vec(),
                needle: "An".to_owned(),
            }]
        );
    }

    #[test]
    fn test_search_matches_any_searchable_field() {
        let search = |needle: &str| FilterCriteria {
            search: Some(needle.to_owned()),
            ..FilterCriteria::default()
        };

        // brand
        assert_eq!(run(&search("Volvo"), SortSpec::default()), vec![1, 4]);
        // license plate
        assert_eq!(run(&search("EV-"), SortSpec::default()), vec![2]);
        // driver name
        assert_eq!(run(&search("Anna"), SortSpec::default()), vec![1, 5]);
        // fuel type and year are not searched
        assert!(run(&search("Diesel"), SortSpec::default()).is_empty());
        assert!(run(&search("2022"), SortSpec::default()).is_empty());
    }

    #[test]
    fn test_search_is_case_sensitive() {
        let criteria = FilterCriteria {
            search: Some("volvo".to_owned()),
            ..FilterCriteria::default()
        };
        assert!(run(&criteria, SortSpec::default()).is_empty());
    }

    #[test]
    fn test_search_agrees_with_substring_check() {
        for needle in ["o", "V", "-", "12", "Bo", "nope", "EV-0042"] {
            let criteria = FilterCriteria {
                search: Some(needle.to_owned()),
                ..FilterCriteria::default()
            };
            let query = build_query(&criteria, SortSpec::default()).unwrap();
            for car in fleet() {
                let expected = car.brand.contains(needle)
                    || car.license_plate.contains(needle)
                    || car.driver_name.as_deref().is_some_and(|d| d.contains(needle));
                assert_eq!(query.predicate.matches(&car), expected, "needle {needle:?}");
            }
        }
    }

    #[test]
    fn test_exact_filters_are_conjunctive() {
        let criteria = FilterCriteria {
            brand: Some("Volvo".to_owned()),
            year: Some("2022".to_owned()),
            ..FilterCriteria::default()
        };
        assert_eq!(run(&criteria, SortSpec::default()), vec![4]);

        let criteria = FilterCriteria {
            license_plate: Some("ABC-123".to_owned()),
            driver_name: Some("Anna".to_owned()),
            ..FilterCriteria::default()
        };
        assert_eq!(run(&criteria, SortSpec::default()), vec![1]);
    }

    #[test]
    fn test_brand_filter_is_exact_not_substring() {
        let criteria = FilterCriteria {
            brand: Some("Volv".to_owned()),
            ..FilterCriteria::default()
        };
        assert!(run(&criteria, SortSpec::default()).is_empty());
    }

    #[test]
    fn test_driver_filter_never_matches_missing_driver() {
        let criteria = FilterCriteria {
            driver_name: Some("Anna".to_owned()),
            ..FilterCriteria::default()
        };
        assert_eq!(run(&criteria, SortSpec::default()), vec![1, 5]);
    }

    #[test]
    fn test_fuel_type_set_matches_members_only() {
        let criteria = FilterCriteria {
            fuel_types: vec!["Diesel".to_owned(), "Electric".to_owned()],
            ..FilterCriteria::default()
        };
        let query = build_query(&criteria, SortSpec::default()).unwrap();
        for car in fleet() {
            let expected = car.fuel_type.name == "Diesel" || car.fuel_type.name == "Electric";
            assert_eq!(query.predicate.matches(&car), expected);
        }
        assert_eq!(ids(&query.apply(fleet())), vec![2, 3, 4]);
    }

    #[test]
    fn test_fuel_type_set_combines_with_other_criteria() {
        let criteria = FilterCriteria {
            brand: Some("Volvo".to_owned()),
            fuel_types: vec!["Diesel".to_owned(), "Electric".to_owned()],
            ..FilterCriteria::default()
        };
        assert_eq!(run(&criteria, SortSpec::default()), vec![4]);
    }

    #[test]
    fn test_year_is_parsed_to_integer_condition() {
        let criteria = FilterCriteria {
            year: Some(" 2020 ".to_owned()),
            ..FilterCriteria::default()
        };
        let query = build_query(&criteria, SortSpec::default()).unwrap();
        assert_eq!(
            query.predicate.conditions,
            vec![Condition::Equals {
                field: Field::Year,
                value: Value::Integer(2020),
            }]
        );
        assert_eq!(ids(&query.apply(fleet())), vec![3]);
    }

    #[test]
    fn test_non_numeric_year_is_rejected() {
        for bad in ["twenty", "2020abc", "20.5"] {
            let criteria = FilterCriteria {
                year: Some(bad.to_owned()),
                ..FilterCriteria::default()
            };
            let err = build_query(&criteria, SortSpec::default()).unwrap_err();
            assert_eq!(err, FilterError::MalformedYear(bad.to_owned()));
        }
    }

    #[test]
    fn test_nul_character_in_text_filter_is_rejected() {
        let cases = [
            (
                FilterCriteria {
                    search: Some("Vol\0vo".to_owned()),
                    ..FilterCriteria::default()
                },
                "search",
            ),
            (
                FilterCriteria {
                    driver_name: Some("\0".to_owned()),
                    ..FilterCriteria::default()
                },
                "driverName",
            ),
            (
                FilterCriteria {
                    fuel_types: vec!["Diesel".to_owned(), "Elec\0tric".to_owned()],
                    ..FilterCriteria::default()
                },
                "fuelType",
            ),
        ];

        for (criteria, name) in cases {
            let err = build_query(&criteria, SortSpec::default()).unwrap_err();
            assert_eq!(err, FilterError::NulCharacter(name));
        }
    }

    #[test]
    fn test_sort_by_fuel_type_uses_name_then_id() {
        let sort = SortSpec {
            key: SortKey::FuelType,
            direction: SortDirection::Ascending,
        };
        // Diesel(3,4), Electric(2), Hybrid(5), Petrol(1)
        assert_eq!(run(&FilterCriteria::default(), sort), vec![3, 4, 2, 5, 1]);
    }

    #[test]
    fn test_sort_descending_keeps_id_tiebreak_ascending() {
        let sort = SortSpec {
            key: SortKey::Year,
            direction: SortDirection::Descending,
        };
        assert_eq!(run(&FilterCriteria::default(), sort), vec![2, 4, 5, 3, 1]);
    }

    #[test]
    fn test_sort_by_brand() {
        let sort = SortSpec {
            key: SortKey::Brand,
            direction: SortDirection::Ascending,
        };
        assert_eq!(run(&FilterCriteria::default(), sort), vec![3, 2, 5, 1, 4]);
    }

    #[test]
    fn test_sort_by_driver_puts_missing_last_when_ascending() {
        let asc = SortSpec {
            key: SortKey::DriverName,
            direction: SortDirection::Ascending,
        };
        assert_eq!(run(&FilterCriteria::default(), asc), vec![1, 5, 3, 4, 2]);

        let desc = SortSpec {
            key: SortKey::DriverName,
            direction: SortDirection::Descending,
        };
        assert_eq!(run(&FilterCriteria::default(), desc), vec![2, 4, 3, 1, 5]);
    }

    #[test]
    fn test_default_order_is_id_ascending() {
        let mut shuffled = fleet();
        shuffled.reverse();
        let query = QueryDescriptor::default();
        assert_eq!(ids(&query.apply(shuffled)), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_descriptor_serializes_with_tagged_conditions() {
        let criteria = FilterCriteria {
            fuel_types: vec!["Diesel".to_owned()],
            ..FilterCriteria::default()
        };
        let query = build_query(&criteria, SortSpec::default()).unwrap();
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["predicate"]["conditions"][0]["op"], "containsAny");
        assert_eq!(json["predicate"]["conditions"][0]["field"], "fuelTypeName");
        assert_eq!(json["order"]["direction"], "ascending");
    }
}
