//! The delivery-delay banner shown at checkout.

use serde::{Deserialize, Serialize};

use super::cart::{AppMetafieldEntry, CartLine};
use super::matcher::has_long_delivery;

/// Banner tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeStatus {
    Info,
    Warning,
    Critical,
}

/// Banner content for the checkout extension to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryNotice {
    pub status: NoticeStatus,
    pub title: String,
    pub message: String,
}

impl DeliveryNotice {
    pub const TITLE: &'static str = "Some items in your order have long delivery times.";
    pub const MESSAGE: &'static str =
        "Please check estimated delivery time before placing the order.";

    /// The long-delivery banner.
    #[must_use]
    pub fn long_delivery() -> Self {
        Self {
            status: NoticeStatus::Critical,
            title: Self::TITLE.to_owned(),
            message: Self::MESSAGE.to_owned(),
        }
    }

    /// The banner to show for a cart, if any.
    #[must_use]
    pub fn for_cart(cart_lines: &[CartLine], metafields: &[AppMetafieldEntry]) -> Option<Self> {
        has_long_delivery(cart_lines, metafields).then(Self::long_delivery)
    }
}
