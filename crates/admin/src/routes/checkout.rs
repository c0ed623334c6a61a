//! Checkout extension API.
//!
//! The checkout UI extension posts the buyer's cart lines together with the
//! app metafields it can read, and renders the returned notice.

use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use fleetdesk_core::checkout::{AppMetafieldEntry, CartLine, DeliveryNotice};

/// Request body for the long-delivery check.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LongDeliveryRequest {
    pub cart_lines: Vec<CartLine>,
    pub metafields: Vec<AppMetafieldEntry>,
}

/// Response for the long-delivery check. `notice` is `null` when nothing
/// should be shown.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LongDeliveryResponse {
    pub has_long_delivery: bool,
    pub notice: Option<DeliveryNotice>,
}

/// Long-delivery check handler.
#[instrument(skip(request), fields(lines = request.cart_lines.len(), metafields = request.metafields.len()))]
pub async fn long_delivery(Json(request): Json<LongDeliveryRequest>) -> Json<LongDeliveryResponse> {
    let notice = DeliveryNotice::for_cart(&request.cart_lines, &request.metafields);
    if notice.is_some() {
        tracing::debug!("Cart contains long-delivery products");
    }

    Json(LongDeliveryResponse {
        has_long_delivery: notice.is_some(),
        notice,
    })
}
