mod app_config;
mod config;
mod drafts;
mod products;
pub mod query;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_API_URL};
pub use drafts::{load_drafts, parse_drafts, DraftsFile};
pub use products::{
    placeholder_image, validate_draft, DraftError, Product, ProductDraft, ProductUpdate,
    CUSTOM_BRAND, DEFAULT_CATEGORY, MAX_PRODUCT_ID, USER_CATEGORY,
};
pub use query::{categories, filter_products, find_product, CatalogPage, CatalogQuery, FilterMode};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read drafts file {path}: {source}")]
    DraftsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse drafts file: {0}")]
    DraftsFileParse(#[source] serde_yaml::Error),

    #[error("drafts file validation failed: {0}")]
    Validation(String),
}
