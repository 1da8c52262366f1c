//! Raw response types for the catalog endpoint.
//!
//! The endpoint is an external collaborator and any field may be absent,
//! `null`, or of an unexpected JSON type. Every field is therefore kept as an
//! untyped [`serde_json::Value`] and coerced in `normalize.rs`.
//!
//! ### Envelope
//! `{ "products": [ ... ], "total": 194, "skip": 0, "limit": 100 }`. Only
//! `products` is read. A payload without a `products` array is treated as an
//! empty catalog rather than an error.
//!
//! ### Observed field shapes
//! - `id`: integer. Records without a usable id are dropped.
//! - `price`: number (`9.99`); some mirrors send numeric strings.
//! - `rating`: number in `0..=5`. `stock`: integer.
//! - `thumbnail`: URL string, occasionally missing.
//! - `images`: array of URL strings, occasionally empty.

use serde::Deserialize;
use serde_json::Value;

/// A single record from the `products` array, before coercion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProduct {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub brand: Option<Value>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub stock: Option<Value>,
    #[serde(default)]
    pub thumbnail: Option<Value>,
    #[serde(default)]
    pub images: Option<Value>,
}

/// Extracts the raw records from a decoded catalog payload.
///
/// Elements of `products` that are not JSON objects are skipped with a
/// warning; a missing or non-array `products` yields no records.
#[must_use]
pub fn records_from_payload(payload: Value) -> Vec<RawProduct> {
    let Value::Object(mut envelope) = payload else {
        tracing::warn!("catalog payload is not a JSON object; treating as empty");
        return Vec::new();
    };

    let Some(Value::Array(items)) = envelope.remove("products") else {
        tracing::warn!("catalog payload has no products array; treating as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value::<RawProduct>(item) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::warn!(index = idx, error = %e, "skipping catalog record: not an object");
                None
            }
        })
        .collect()
}
