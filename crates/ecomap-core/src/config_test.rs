use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn env_with<'a>(pairs: &[(&'a str, &'a str)]) -> HashMap<&'a str, &'a str> {
    pairs.iter().copied().collect()
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "ECOMAP_ENV"));
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.overpass_url, "https://overpass-api.de/api/interpreter");
    assert_eq!(cfg.country_code, "MY");
    assert_eq!(cfg.country_name, "Malaysia");
    assert!(cfg.fallback_path.is_none());
    assert_eq!(cfg.user_agent, "ecomap/0.1 (environmental-awareness)");
    assert_eq!(cfg.fetch_timeout_secs, 10);
    assert_eq!(cfg.fetch_max_retries, 1);
    assert_eq!(cfg.fetch_retry_backoff_base_secs, 1);
    assert_eq!(cfg.render_chunk_size, 300);
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let map = env_with(&[("ECOMAP_BIND_ADDR", "not-a-socket-addr")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ECOMAP_BIND_ADDR"),
        "expected InvalidEnvVar(ECOMAP_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_on_invalid_ecomap_env() {
    let map = env_with(&[("ECOMAP_ENV", "producton")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ECOMAP_ENV"),
        "expected InvalidEnvVar(ECOMAP_ENV), got: {result:?}"
    );
}

#[test]
fn overpass_url_override() {
    let map = env_with(&[("ECOMAP_OVERPASS_URL", "http://127.0.0.1:9000/api/interpreter")]);
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.overpass_url, "http://127.0.0.1:9000/api/interpreter");
}

#[test]
fn overpass_url_must_be_http() {
    let map = env_with(&[("ECOMAP_OVERPASS_URL", "ftp://overpass.example")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ECOMAP_OVERPASS_URL"),
        "expected InvalidEnvVar(ECOMAP_OVERPASS_URL), got: {result:?}"
    );
}

#[test]
fn country_code_is_uppercased() {
    let map = env_with(&[("ECOMAP_COUNTRY_CODE", "sg"), ("ECOMAP_COUNTRY_NAME", "Singapore")]);
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.country_code, "SG");
    assert_eq!(cfg.country_name, "Singapore");
}

#[test]
fn country_code_must_be_two_letters() {
    let map = env_with(&[("ECOMAP_COUNTRY_CODE", "MYS")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ECOMAP_COUNTRY_CODE"),
        "expected InvalidEnvVar(ECOMAP_COUNTRY_CODE), got: {result:?}"
    );
}

#[test]
fn fallback_path_override() {
    let map = env_with(&[("ECOMAP_FALLBACK_PATH", "/srv/ecomap/locations.json")]);
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.fallback_path.as_deref(),
        Some(std::path::Path::new("/srv/ecomap/locations.json"))
    );
}

#[test]
fn blank_fallback_path_is_ignored() {
    let map = env_with(&[("ECOMAP_FALLBACK_PATH", "  ")]);
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.fallback_path.is_none());
}

#[test]
fn fetch_timeout_secs_override() {
    let map = env_with(&[("ECOMAP_FETCH_TIMEOUT_SECS", "4")]);
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.fetch_timeout_secs, 4);
}

#[test]
fn fetch_timeout_secs_invalid() {
    let map = env_with(&[("ECOMAP_FETCH_TIMEOUT_SECS", "not-a-number")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ECOMAP_FETCH_TIMEOUT_SECS"),
        "expected InvalidEnvVar(ECOMAP_FETCH_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn fetch_timeout_secs_zero_rejected() {
    let map = env_with(&[("ECOMAP_FETCH_TIMEOUT_SECS", "0")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ECOMAP_FETCH_TIMEOUT_SECS"),
        "expected InvalidEnvVar(ECOMAP_FETCH_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn fetch_max_retries_override() {
    let map = env_with(&[("ECOMAP_FETCH_MAX_RETRIES", "0")]);
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.fetch_max_retries, 0);
}

#[test]
fn fetch_max_retries_invalid() {
    let map = env_with(&[("ECOMAP_FETCH_MAX_RETRIES", "-1")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ECOMAP_FETCH_MAX_RETRIES"),
        "expected InvalidEnvVar(ECOMAP_FETCH_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn fetch_retry_backoff_base_secs_override() {
    let map = env_with(&[("ECOMAP_FETCH_RETRY_BACKOFF_BASE_SECS", "3")]);
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.fetch_retry_backoff_base_secs, 3);
}

#[test]
fn render_chunk_size_override() {
    let map = env_with(&[("ECOMAP_RENDER_CHUNK_SIZE", "150")]);
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.render_chunk_size, 150);
}

#[test]
fn render_chunk_size_zero_rejected() {
    let map = env_with(&[("ECOMAP_RENDER_CHUNK_SIZE", "0")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ECOMAP_RENDER_CHUNK_SIZE"),
        "expected InvalidEnvVar(ECOMAP_RENDER_CHUNK_SIZE), got: {result:?}"
    );
}
