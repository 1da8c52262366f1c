use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::query::PAGE_SIZE_OPTIONS;
use crate::ConfigError;

/// Endpoint used when `CATALOG_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "https://dummyjson.com/products?limit=100";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let api_url = or_default("CATALOG_API_URL", DEFAULT_API_URL);
    if api_url.trim().is_empty() {
        return Err(invalid("CATALOG_API_URL", "must not be empty".to_string()));
    }

    let log_level = or_default("CATALOG_LOG_LEVEL", "info");
    let user_agent = or_default("CATALOG_USER_AGENT", "catalog/0.1 (catalog-browser)");

    let request_timeout_secs = match lookup("CATALOG_REQUEST_TIMEOUT_SECS") {
        Ok(raw) => {
            let secs = raw
                .parse::<u64>()
                .map_err(|e| invalid("CATALOG_REQUEST_TIMEOUT_SECS", e.to_string()))?;
            if secs == 0 {
                return Err(invalid(
                    "CATALOG_REQUEST_TIMEOUT_SECS",
                    "must be at least 1; unset it to disable the timeout".to_string(),
                ));
            }
            Some(secs)
        }
        Err(_) => None,
    };

    let max_retries = parse_u32("CATALOG_MAX_RETRIES", "0")?;
    let retry_backoff_base_secs = parse_u64("CATALOG_RETRY_BACKOFF_BASE_SECS", "1")?;

    let page_size = or_default("CATALOG_PAGE_SIZE", "20")
        .parse::<usize>()
        .map_err(|e| invalid("CATALOG_PAGE_SIZE", e.to_string()))?;
    if !PAGE_SIZE_OPTIONS.contains(&page_size) {
        return Err(invalid(
            "CATALOG_PAGE_SIZE",
            format!("{page_size} is not one of {PAGE_SIZE_OPTIONS:?}"),
        ));
    }

    let drafts_path = lookup("CATALOG_DRAFTS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        api_url,
        log_level,
        user_agent,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_secs,
        page_size,
        drafts_path,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
