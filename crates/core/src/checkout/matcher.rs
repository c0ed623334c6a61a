//! Long-delivery detection for checkout.

use serde_json::Value;

use super::cart::{AppMetafieldEntry, CartLine};
use crate::types::NumericId;

/// Metafield namespace carrying the long-delivery flag.
pub const LONG_DELIVERY_NAMESPACE: &str = "custom";
/// Metafield key carrying the long-delivery flag.
pub const LONG_DELIVERY_KEY: &str = "long_delivery";

/// Returns `true` if any product in the cart is flagged for long delivery.
///
/// Product and target IDs are normalized with [`NumericId`] before they are
/// compared, so global IDs and bare numeric IDs match each other. For each
/// line the first metafield targeting its product decides; lines without a
/// product are skipped. Stops at the first flagged line.
///
/// Entries whose metafield names a namespace or key other than
/// [`LONG_DELIVERY_NAMESPACE`]/[`LONG_DELIVERY_KEY`] are ignored.
#[must_use]
pub fn has_long_delivery(cart_lines: &[CartLine], metafields: &[AppMetafieldEntry]) -> bool {
    let targets: Vec<(Option<NumericId>, &AppMetafieldEntry)> = metafields
        .iter()
        .filter(|entry| is_long_delivery_field(entry))
        .map(|entry| (entry.target_id(), entry))
        .collect();

    cart_lines
        .iter()
        .filter_map(CartLine::product_id)
        .any(|product_id| {
            targets
                .iter()
                .find(|(target_id, _)| target_id.as_ref() == Some(&product_id))
                .is_some_and(|(_, entry)| is_truthy(entry.value()))
        })
}

/// Whether a metafield value means "true".
///
/// Only the boolean `true` and strings equal to `"true"` in any ASCII case
/// qualify.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn is_long_delivery_field(entry: &AppMetafieldEntry) -> bool {
    entry.metafield.as_ref().is_none_or(|m| {
        m.namespace.as_deref().is_none_or(|ns| ns == LONG_DELIVERY_NAMESPACE)
            && m.key.as_deref().is_none_or(|key| key == LONG_DELIVERY_KEY)
    })
}
