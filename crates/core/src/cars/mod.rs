//! The car inventory: records, listing queries, filter options and input
//! validation.

pub mod filter;
pub mod input;
pub mod options;
pub mod query;
pub mod record;

pub use filter::{CarListParams, FilterCriteria, FilterError, SortDirection, SortKey, SortSpec};
pub use input::{CarInput, CarValidationError, NewCar};
pub use options::{FilterOptions, fuel_type_options};
pub use query::{Condition, Field, OrderBy, Predicate, QueryDescriptor, Value, build_query};
pub use record::{CarRecord, FuelType};
