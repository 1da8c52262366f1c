use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Catalog endpoint fetched once per session.
    pub api_url: String,
    pub log_level: String,
    pub user_agent: String,
    /// Whole-request timeout. `None` leaves a hung request loading forever.
    pub request_timeout_secs: Option<u64>,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    /// Default list page size; one of [`crate::query::PAGE_SIZE_OPTIONS`].
    pub page_size: usize,
    /// Optional YAML file of drafts created when a session starts.
    pub drafts_path: Option<PathBuf>,
}
