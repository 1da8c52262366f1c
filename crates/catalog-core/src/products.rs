use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category assigned to fetched records that arrive without one.
pub const DEFAULT_CATEGORY: &str = "misc";

/// Category assigned to locally created products submitted with a blank one.
pub const USER_CATEGORY: &str = "user";

/// Brand stamped on every locally created product.
pub const CUSTOM_BRAND: &str = "Custom product";

/// Largest product id: the biggest integer a JSON number holds exactly
/// (`2^53 - 1`). Fetched ids above it are rejected.
pub const MAX_PRODUCT_ID: u64 = 9_007_199_254_740_991;

/// Characters left unescaped in placeholder seeds: alphanumerics plus
/// `- _ . ! ~ * ' ( )`, the same set a browser's `encodeURIComponent` keeps.
const SEED_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A catalog entry, either fetched from the remote source or created locally
/// during the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique across the in-memory collection.
    pub id: u64,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub brand: Option<String>,
    /// Average review score, `0.0..=5.0` when present.
    pub rating: Option<f64>,
    pub stock: Option<i64>,
    /// Primary image URL or data URI. Never empty.
    pub thumbnail: String,
    /// Gallery, never empty. Falls back to `[thumbnail]`.
    pub images: Vec<String>,
    /// `true` only for products created through the store during this session.
    pub is_user_created: bool,
}

/// Input for creating a product locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial edit of an existing product. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl From<ProductDraft> for ProductUpdate {
    fn from(draft: ProductDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: Some(draft.description),
            price: Some(draft.price),
            category: Some(draft.category),
            image_url: draft.image_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("price must be positive, got {price}")]
    NonPositivePrice { price: Decimal },
}

/// Builds the deterministic placeholder image URL for `seed`.
///
/// Fetched records key the placeholder by their id; locally created products
/// key it by `"{title}-{id}"`.
#[must_use]
pub fn placeholder_image(seed: &str) -> String {
    format!(
        "https://picsum.photos/seed/{}/400/300",
        utf8_percent_encode(seed, SEED_ESCAPE)
    )
}

/// Checks a draft the way the product form does before submitting it.
///
/// `title`, `description` and `category` must be non-blank once trimmed, and
/// `price` must be strictly positive. The first failing rule is reported.
///
/// # Errors
///
/// Returns [`DraftError::MissingField`] for a blank required field and
/// [`DraftError::NonPositivePrice`] for a zero or negative price.
pub fn validate_draft(draft: &ProductDraft) -> Result<(), DraftError> {
    let required = [
        ("title", draft.title.as_str()),
        ("description", draft.description.as_str()),
        ("category", draft.category.as_str()),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(DraftError::MissingField { field });
        }
    }

    if draft.price <= Decimal::ZERO {
        return Err(DraftError::NonPositivePrice { price: draft.price });
    }

    Ok(())
}
