use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
/// Parsing and validation are decoupled from the real environment so tests
/// can drive them with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_positive_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("must be a positive number, got {raw}"),
            });
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("HEERO_ENV", "development"));
    let log_level = or_default("HEERO_LOG_LEVEL", "info");
    let sources_path = PathBuf::from(or_default("HEERO_SOURCES_PATH", "./config/sources.yaml"));
    let cache_dir = PathBuf::from(or_default("HEERO_CACHE_DIR", "./.heero-cache"));

    let cache_ttl_secs = parse_u64("HEERO_CACHE_TTL_SECS", "1800")?;
    let refresh_interval_secs = parse_u64("HEERO_REFRESH_INTERVAL_SECS", "300")?;
    if refresh_interval_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "HEERO_REFRESH_INTERVAL_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let request_timeout_secs = parse_u64("HEERO_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("HEERO_USER_AGENT", "heero-locator/0.1 (service-map)");

    let map_access_token = lookup("HEERO_MAP_ACCESS_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());
    let map_style_url = or_default("HEERO_MAP_STYLE_URL", "mapbox://styles/mapbox/streets-v12");

    let marker_min_distance_px = parse_positive_f64("HEERO_MARKER_MIN_DISTANCE_PX", "40")?;
    let cluster_radius_px = parse_positive_f64("HEERO_CLUSTER_RADIUS_PX", "50")?;
    let click_tolerance_deg = parse_positive_f64("HEERO_CLICK_TOLERANCE_DEG", "0.001")?;
    let select_zoom = parse_positive_f64("HEERO_SELECT_ZOOM", "12")?;
    let fly_duration_ms = parse_u64("HEERO_FLY_DURATION_MS", "1000")?;

    Ok(AppConfig {
        env,
        log_level,
        sources_path,
        cache_dir,
        cache_ttl_secs,
        refresh_interval_secs,
        request_timeout_secs,
        user_agent,
        map_access_token,
        map_style_url,
        marker_min_distance_px,
        cluster_radius_px,
        click_tolerance_deg,
        select_zoom,
        fly_duration_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
