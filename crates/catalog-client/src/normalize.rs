//! Normalization from raw catalog records to [`catalog_core::Product`].
//!
//! Coercion is lenient: a wrong-typed or missing optional field falls back to
//! its default instead of rejecting the record. Only a missing or unusable
//! `id` rejects a record, since every product needs a unique id.

use std::collections::HashSet;
use std::str::FromStr;

use catalog_core::{placeholder_image, Product, DEFAULT_CATEGORY, MAX_PRODUCT_ID};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::ClientError;
use crate::types::RawProduct;

/// Title given to records that arrive without one.
pub const UNTITLED: &str = "Untitled";

/// [`MAX_PRODUCT_ID`] as a float, for ids sent as `7.0`.
const MAX_PRODUCT_ID_F64: f64 = 9_007_199_254_740_991.0;

/// Normalizes a raw record into a [`Product`].
///
/// # Errors
///
/// Returns [`ClientError::Normalization`] if the record has no integer id in
/// `1..=MAX_PRODUCT_ID`.
pub fn normalize_product(raw: RawProduct) -> Result<Product, ClientError> {
    let id = raw.id.as_ref().and_then(coerce_id).ok_or_else(|| {
        ClientError::Normalization {
            record: raw
                .id
                .as_ref()
                .map_or_else(|| "<missing id>".to_owned(), Value::to_string),
            reason: format!("id is not an integer in 1..={MAX_PRODUCT_ID}"),
        }
    })?;

    let title = raw
        .title
        .as_ref()
        .and_then(coerce_text)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| UNTITLED.to_owned());

    let description = raw
        .description
        .as_ref()
        .and_then(coerce_text)
        .unwrap_or_default();

    let price = raw
        .price
        .as_ref()
        .and_then(coerce_decimal)
        .unwrap_or(Decimal::ZERO);

    let category = raw
        .category
        .as_ref()
        .and_then(coerce_text)
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned());

    let brand = raw
        .brand
        .as_ref()
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_owned);

    // Only JSON numbers count; numeric strings are not ratings or stock levels.
    let rating = raw
        .rating
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|r| r.is_finite());
    let stock = raw.stock.as_ref().and_then(Value::as_i64);

    let thumbnail = raw
        .thumbnail
        .as_ref()
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map_or_else(|| placeholder_image(&id.to_string()), str::to_owned);

    let mut images: Vec<String> = match raw.images {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.is_empty() => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    if images.is_empty() {
        images.push(thumbnail.clone());
    }

    Ok(Product {
        id,
        title,
        description,
        price,
        category,
        brand,
        rating,
        stock,
        thumbnail,
        images,
        is_user_created: false,
    })
}

/// Normalizes a whole catalog, preserving API order.
///
/// Records that fail normalization are logged and skipped, and a record whose
/// id was already seen is dropped so ids stay unique.
#[must_use]
pub fn normalize_catalog(records: Vec<RawProduct>) -> Vec<Product> {
    let mut seen = HashSet::new();
    let mut products = Vec::with_capacity(records.len());

    for raw in records {
        match normalize_product(raw) {
            Ok(product) => {
                if seen.insert(product.id) {
                    products.push(product);
                } else {
                    tracing::warn!(id = product.id, "skipping catalog record: duplicate id");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping catalog record: normalization failed");
            }
        }
    }

    products
}

/// Coerces an id into `1..=MAX_PRODUCT_ID`. Accepts integral numbers and
/// numeric strings.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_id(value: &Value) -> Option<u64> {
    let id = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= MAX_PRODUCT_ID_F64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    (1..=MAX_PRODUCT_ID).contains(&id).then_some(id)
}

/// Renders scalars as text the way a string conversion would, without
/// trimming; arrays, objects and `null` are treated as absent.
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn coerce_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_owned(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
