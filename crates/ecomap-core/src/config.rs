use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_USER_AGENT: &str = "ecomap/0.1 (environmental-awareness)";

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
/// Every variable has a default, so an empty environment is valid.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("ECOMAP_ENV", "development"))?;

    let bind_addr = or_default("ECOMAP_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("ECOMAP_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("ECOMAP_LOG_LEVEL", "info");

    let overpass_url = or_default("ECOMAP_OVERPASS_URL", DEFAULT_OVERPASS_URL);
    if !overpass_url.starts_with("http://") && !overpass_url.starts_with("https://") {
        return Err(invalid(
            "ECOMAP_OVERPASS_URL",
            format!("\"{overpass_url}\" is not an http(s) URL"),
        ));
    }

    let country_code = or_default("ECOMAP_COUNTRY_CODE", "MY").to_ascii_uppercase();
    if country_code.len() != 2 || !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid(
            "ECOMAP_COUNTRY_CODE",
            format!("\"{country_code}\" is not an ISO 3166-1 alpha-2 code"),
        ));
    }
    let country_name = or_default("ECOMAP_COUNTRY_NAME", "Malaysia");

    let fallback_path = lookup("ECOMAP_FALLBACK_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let user_agent = or_default("ECOMAP_USER_AGENT", DEFAULT_USER_AGENT);

    let fetch_timeout_secs = parse_u64("ECOMAP_FETCH_TIMEOUT_SECS", "10")?;
    if fetch_timeout_secs == 0 {
        return Err(invalid(
            "ECOMAP_FETCH_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let fetch_max_retries = parse_u32("ECOMAP_FETCH_MAX_RETRIES", "1")?;
    let fetch_retry_backoff_base_secs = parse_u64("ECOMAP_FETCH_RETRY_BACKOFF_BASE_SECS", "1")?;

    let render_chunk_size = parse_usize("ECOMAP_RENDER_CHUNK_SIZE", "300")?;
    if render_chunk_size == 0 {
        return Err(invalid(
            "ECOMAP_RENDER_CHUNK_SIZE",
            "must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        overpass_url,
        country_code,
        country_name,
        fallback_path,
        user_agent,
        fetch_timeout_secs,
        fetch_max_retries,
        fetch_retry_backoff_base_secs,
        render_chunk_size,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ECOMAP_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
