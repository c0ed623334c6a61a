//! Cart lines and app metafields as delivered by checkout extension APIs.
//!
//! Every field is optional: shapes vary between API versions and the
//! matcher treats anything it cannot read as "no match".

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::NumericId;

/// A line in the buyer's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CartLine {
    /// Line ID (e.g. `gid://shopify/CartLine/1`).
    pub id: Option<String>,
    pub merchandise: Option<Merchandise>,
}

impl CartLine {
    /// Normalized ID of the product behind this line, if any.
    #[must_use]
    pub fn product_id(&self) -> Option<NumericId> {
        let product = self.merchandise.as_ref()?.product.as_ref()?;
        NumericId::normalize(product.id.as_deref()?)
    }
}

/// The variant a cart line refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Merchandise {
    /// Variant ID.
    pub id: Option<String>,
    pub product: Option<ProductRef>,
}

/// Reference to a product, by global or bare numeric ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductRef {
    pub id: Option<String>,
}

/// An app metafield together with the resource it is attached to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetafieldEntry {
    pub target: Option<MetafieldTarget>,
    pub metafield: Option<Metafield>,
}

impl AppMetafieldEntry {
    /// Normalized ID of the resource the metafield is attached to.
    #[must_use]
    pub fn target_id(&self) -> Option<NumericId> {
        NumericId::from_json(self.target.as_ref()?.id.as_ref()?)
    }

    /// The metafield's value, `null` if absent.
    #[must_use]
    pub fn value(&self) -> &Value {
        self.metafield
            .as_ref()
            .and_then(|m| m.value.as_ref())
            .unwrap_or(&Value::Null)
    }
}

/// The resource a metafield belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetafieldTarget {
    /// Global ID string, bare numeric string, or number.
    pub id: Option<Value>,
    /// Resource type (e.g. `product`).
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// A namespaced key/value annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metafield {
    pub namespace: Option<String>,
    pub key: Option<String>,
    /// Boolean, string, or anything else the API returns.
    pub value: Option<Value>,
}
