//! Network collaborator error types.

/// Errors from fetching network data.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The requested route or stop is unknown to the provider
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limited by the API
    #[error("rate limited by network API")]
    RateLimited,

    /// Invalid API key or unauthorized
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// Local network data could not be read
    #[error("network data error: {0}")]
    Data(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_ref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}

impl NetworkError {
    /// Whether retrying the same request later might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            NetworkError::Http(_) | NetworkError::RateLimited => true,
            NetworkError::Api { status, .. } => *status >= 500,
            NetworkError::Json { .. }
            | NetworkError::NotFound(_)
            | NetworkError::Unauthorized
            | NetworkError::Data(_) => false,
        }
    }
}
