use thiserror::Error;

/// Coarse failure classes the load pipeline reacts to.
///
/// Both kinds are recovered by substituting the fallback dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network failure, timeout, or non-success status.
    RemoteUnavailable,
    /// The body was not the JSON shape the interpreter promises.
    MalformedResponse,
}

#[derive(Debug, Error)]
pub enum OverpassError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Overpass request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("rate limited by Overpass (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("malformed Overpass response from {url}: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid Overpass endpoint \"{url}\": {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

impl OverpassError {
    #[must_use]
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            OverpassError::MalformedResponse { .. } => FailureKind::MalformedResponse,
            OverpassError::Http(_)
            | OverpassError::Timeout { .. }
            | OverpassError::RateLimited { .. }
            | OverpassError::UnexpectedStatus { .. }
            | OverpassError::InvalidEndpoint { .. } => FailureKind::RemoteUnavailable,
        }
    }
}

/// Errors reading the packaged fallback dataset.
#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("failed to read fallback dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("fallback dataset {origin} is not valid JSON: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("fallback dataset {origin} must be a JSON array of locations")]
    NotAnArray { origin: String },
}
