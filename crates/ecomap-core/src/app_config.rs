use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Overpass interpreter endpoint receiving the aggregated POST query.
    pub overpass_url: String,
    /// ISO 3166-1 alpha-2 code of the country whose boundary scopes the query.
    pub country_code: String,
    /// Address placeholder for records without any address tags.
    pub country_name: String,
    /// Replacement for the embedded fallback dataset, if set.
    pub fallback_path: Option<PathBuf>,
    pub user_agent: String,
    pub fetch_timeout_secs: u64,
    pub fetch_max_retries: u32,
    pub fetch_retry_backoff_base_secs: u64,
    /// Markers placed per render batch.
    pub render_chunk_size: usize,
}
