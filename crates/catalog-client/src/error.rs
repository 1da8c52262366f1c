use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by catalog API (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("failed to load products: unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid catalog endpoint \"{url}\": {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("normalization error for record {record}: {reason}")]
    Normalization { record: String, reason: String },
}
