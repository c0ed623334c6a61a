//! Car inventory handlers.

use axum::{
    Form, Json,
    extract::{Path, RawQuery, State},
    response::Redirect,
};
use serde::Serialize;
use tracing::instrument;

use fleetdesk_core::CarId;
use fleetdesk_core::cars::{
    CarInput, CarListParams, CarRecord, CarValidationError, FilterOptions, FuelType, NewCar,
    build_query, fuel_type_options,
};

use crate::db::{CarRepository, FuelTypeRepository, RepositoryError};
use crate::error::AppError;
use crate::state::AppState;

/// Car listing payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarListResponse {
    /// Cars matching the filters, in the requested order.
    pub cars: Vec<CarRecord>,
    /// Fuel types for filter and form selects.
    pub fuel_types: Vec<FuelType>,
    /// Distinct values across the whole inventory for the filter selects.
    pub options: FilterOptions,
}

/// Parse listing parameters from the raw query string.
///
/// `fuelType` may repeat, so the string is decoded as pairs rather than
/// through a struct extractor.
///
/// # Errors
///
/// Returns `AppError::Filter` for an unknown sort key or direction.
pub fn parse_list_params(raw: Option<&str>) -> Result<CarListParams, AppError> {
    let pairs = url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes());
    Ok(CarListParams::from_pairs(pairs)?)
}

/// List cars handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<CarListResponse>, AppError> {
    let params = parse_list_params(query.as_deref())?;
    let descriptor = build_query(&params.criteria, params.sort)?;

    let repo = CarRepository::new(state.pool());
    let cars = repo.list(&descriptor).await?;
    let all_cars = if descriptor.predicate.is_identity() {
        cars.clone()
    } else {
        repo.list_all().await?
    };

    let fuel_types = FuelTypeRepository::new(state.pool()).list().await?;

    Ok(Json(CarListResponse {
        cars,
        fuel_types: fuel_type_options(&fuel_types),
        options: FilterOptions::from_records(&all_cars),
    }))
}

/// Create car handler.
#[instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    Form(input): Form<CarInput>,
) -> Result<Redirect, AppError> {
    let car = validate(&state, &input, None).await?;

    let id = CarRepository::new(state.pool())
        .create(&car)
        .await
        .map_err(plate_conflict)?;

    tracing::info!(car_id = %id, license_plate = %car.license_plate, "Car created");
    Ok(Redirect::to("/cars"))
}

/// Update car handler.
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(input): Form<CarInput>,
) -> Result<Redirect, AppError> {
    let id = CarId::new(id);
    let car = validate(&state, &input, Some(id)).await?;

    CarRepository::new(state.pool())
        .update(id, &car)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => car_not_found(id),
            other => plate_conflict(other),
        })?;

    tracing::info!(car_id = %id, "Car updated");
    Ok(Redirect::to("/cars"))
}

/// Delete car handler.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    let id = CarId::new(id);

    CarRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => car_not_found(id),
            other => other.into(),
        })?;

    tracing::info!(car_id = %id, "Car deleted");
    Ok(Redirect::to("/cars"))
}

/// Validate form input against the store.
///
/// `existing` is the car being updated, whose own plate does not count as
/// taken.
async fn validate(
    state: &AppState,
    input: &CarInput,
    existing: Option<CarId>,
) -> Result<NewCar, AppError> {
    let car = input.validate()?;

    if !FuelTypeRepository::new(state.pool())
        .exists(car.fuel_type_id)
        .await?
    {
        return Err(CarValidationError::UnknownFuelType(car.fuel_type_id).into());
    }

    if CarRepository::new(state.pool())
        .license_plate_in_use(&car.license_plate, existing)
        .await?
    {
        return Err(CarValidationError::LicensePlateTaken.into());
    }

    Ok(car)
}

/// A unique violation that slipped past the pre-check is still a taken plate.
fn plate_conflict(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::Conflict(_) => CarValidationError::LicensePlateTaken.into(),
        other => other.into(),
    }
}

fn car_not_found(id: CarId) -> AppError {
    AppError::NotFound(format!("car {id}"))
}
