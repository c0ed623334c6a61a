//! Checkout-side logic: deciding whether to warn the buyer about long
//! delivery times.

pub mod cart;
pub mod matcher;
pub mod notice;

pub use cart::{AppMetafieldEntry, CartLine, Merchandise, Metafield, MetafieldTarget, ProductRef};
pub use matcher::{LONG_DELIVERY_KEY, LONG_DELIVERY_NAMESPACE, has_long_delivery, is_truthy};
pub use notice::{DeliveryNotice, NoticeStatus};
