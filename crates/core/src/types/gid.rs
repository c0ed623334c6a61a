//! Shopify identifier normalization.
//!
//! Checkout APIs hand out product identifiers in two shapes: the composite
//! global ID (`gid://shopify/Product/123`) and, occasionally, the bare
//! numeric ID (`"123"` or `123`). [`NumericId`] reduces both to the trailing
//! segment so identifiers from different sources can be compared directly.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical numeric form of a Shopify identifier.
///
/// ## Examples
///
/// ```
/// use fleetdesk_core::NumericId;
///
/// let gid = NumericId::normalize("gid://shopify/Product/123").unwrap();
/// let bare = NumericId::normalize("123").unwrap();
/// assert_eq!(gid, bare);
/// assert_eq!(gid.as_str(), "123");
///
/// // A trailing separator leaves nothing to compare.
/// assert!(NumericId::normalize("gid://shopify/Product/").is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct NumericId(String);

impl NumericId {
    /// Separator between the segments of a global ID.
    pub const SEPARATOR: char = '/';

    /// Normalize an identifier string.
    ///
    /// Returns the segment after the last [`Self::SEPARATOR`], or the whole
    /// value when there is no separator. Returns `None` when that segment is
    /// empty.
    #[must_use]
    pub fn normalize(raw: &str) -> Option<Self> {
        let segment = raw.rsplit(Self::SEPARATOR).next().unwrap_or(raw);
        if segment.is_empty() {
            return None;
        }
        Some(Self(segment.to_owned()))
    }

    /// Normalize an identifier carried as an arbitrary JSON value.
    ///
    /// Strings are normalized with [`Self::normalize`], numbers are rendered
    /// in decimal first. An integral float such as `456.0` renders as `456`.
    /// Any other JSON type has no identifier.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::normalize(s),
            Value::Number(n) => Self::normalize(&render_number(n)),
            _ => None,
        }
    }

    /// Returns the normalized identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Largest magnitude below which every integer is exactly representable as `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
fn render_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

impl fmt::Display for NumericId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NumericId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
