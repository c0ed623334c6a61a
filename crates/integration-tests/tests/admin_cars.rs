//! Live tests for car management.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database with fuel types seeded
//!   (`fleetdesk migrate && fleetdesk seed fuel-types`)
//! - The admin server running (cargo run -p fleetdesk-admin)
//!
//! Run with: cargo test -p fleetdesk-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::expect_used)]

use reqwest::{Client, StatusCode, redirect::Policy};
use serde_json::Value;
use uuid::Uuid;

use fleetdesk_integration_tests::admin_base_url;

/// Client that reports redirects instead of following them.
fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// A license plate no other test run uses.
fn unique_plate() -> String {
    format!("IT-{}", &Uuid::new_v4().simple().to_string()[..8])
}

async fn list(client: &Client, query: &str) -> Value {
    let resp = client
        .get(format!("{}/cars?{query}", admin_base_url()))
        .send()
        .await
        .expect("Failed to list cars");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Listing is not JSON")
}

async fn first_fuel_type_id(client: &Client) -> String {
    let body = list(client, "").await;
    body["fuelTypes"][0]["id"]
        .as_i64()
        .expect("no fuel types seeded")
        .to_string()
}

async fn create_car(client: &Client, plate: &str, fuel_type_id: &str) -> reqwest::Response {
    client
        .post(format!("{}/cars", admin_base_url()))
        .form(&[
            ("brand", "IntegrationTest"),
            ("licensePlate", plate),
            ("year", "2021"),
            ("driverName", ""),
            ("fuelTypeId", fuel_type_id),
        ])
        .send()
        .await
        .expect("Failed to create car")
}

async fn find_car_id(client: &Client, plate: &str) -> Option<i64> {
    let body = list(client, &format!("licensePlate={plate}")).await;
    body["cars"][0]["id"].as_i64()
}

async fn delete_car(client: &Client, id: i64) -> StatusCode {
    client
        .post(format!("{}/cars/{id}/delete", admin_base_url()))
        .send()
        .await
        .expect("Failed to delete car")
        .status()
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_car_lifecycle() {
    let client = client();
    let fuel_type_id = first_fuel_type_id(&client).await;
    let plate = unique_plate();

    let resp = create_car(&client, &plate, &fuel_type_id).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/cars");

    let id = find_car_id(&client, &plate).await.expect("created car not listed");

    // Search is a substring match on the plate
    let body = list(&client, &format!("search={}", &plate[3..])).await;
    assert!(
        body["cars"]
            .as_array()
            .unwrap()
            .iter()
            .any(|car| car["licensePlate"] == plate.as_str())
    );
    assert!(
        body["options"]["licensePlates"]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p == plate.as_str())
    );

    // Updating with its own plate is allowed
    let resp = client
        .post(format!("{}/cars/{id}", admin_base_url()))
        .form(&[
            ("brand", "IntegrationTest"),
            ("licensePlate", plate.as_str()),
            ("year", "2023"),
            ("driverName", "Dana"),
            ("fuelTypeId", fuel_type_id.as_str()),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let body = list(&client, &format!("licensePlate={plate}")).await;
    assert_eq!(body["cars"][0]["year"], 2023);
    assert_eq!(body["cars"][0]["driverName"], "Dana");

    assert_eq!(delete_car(&client, id).await, StatusCode::SEE_OTHER);
    assert!(find_car_id(&client, &plate).await.is_none());
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_duplicate_plate_is_rejected() {
    let client = client();
    let fuel_type_id = first_fuel_type_id(&client).await;
    let plate = unique_plate();

    let resp = create_car(&client, &plate, &fuel_type_id).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = create_car(&client, &plate, &fuel_type_id).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "License plate already exists");

    let id = find_car_id(&client, &plate).await.unwrap();
    delete_car(&client, id).await;
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_unknown_fuel_type_is_rejected() {
    let client = client();
    let resp = create_car(&client, &unique_plate(), "999999").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_missing_car_returns_not_found() {
    let client = client();
    assert_eq!(delete_car(&client, i64::from(i32::MAX)).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_listing_sorted_by_fuel_type() {
    let client = client();
    let body = list(&client, "sortKey=fuelType&sortDirection=asc").await;

    let names: Vec<&str> = body["cars"]
        .as_array()
        .unwrap()
        .iter()
        .map(|car| car["fuelType"]["name"].as_str().unwrap())
        .collect();
    assert!(names.windows(2).all(|w| w[0] <= w[1]));
}
