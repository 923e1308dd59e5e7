use crate::app_config::{AppConfig, Environment};
use crate::platform::Platform;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parsing and validation, decoupled from the process environment so tests
/// can feed a plain map.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("HOTBOARD_ENV", "development"))?;

    let bind_addr = parse_as::<SocketAddr>(&or_default("HOTBOARD_BIND_ADDR", "0.0.0.0:3002"))
        .map_err(|e| invalid("HOTBOARD_BIND_ADDR", e))?;
    let log_level = or_default("HOTBOARD_LOG_LEVEL", "info");

    let db_max_connections = parse_as::<u32>(&or_default("HOTBOARD_DB_MAX_CONNECTIONS", "10"))
        .map_err(|e| invalid("HOTBOARD_DB_MAX_CONNECTIONS", e))?;
    let db_min_connections = parse_as::<u32>(&or_default("HOTBOARD_DB_MIN_CONNECTIONS", "1"))
        .map_err(|e| invalid("HOTBOARD_DB_MIN_CONNECTIONS", e))?;
    let db_acquire_timeout_secs =
        parse_as::<u64>(&or_default("HOTBOARD_DB_ACQUIRE_TIMEOUT_SECS", "10"))
            .map_err(|e| invalid("HOTBOARD_DB_ACQUIRE_TIMEOUT_SECS", e))?;
    let db_idle_timeout_secs = parse_as::<u64>(&or_default("HOTBOARD_DB_IDLE_TIMEOUT_SECS", "20"))
        .map_err(|e| invalid("HOTBOARD_DB_IDLE_TIMEOUT_SECS", e))?;

    if db_min_connections > db_max_connections {
        return Err(invalid(
            "HOTBOARD_DB_MIN_CONNECTIONS",
            format!("must not exceed HOTBOARD_DB_MAX_CONNECTIONS ({db_max_connections})"),
        ));
    }

    let live_platforms = parse_platform_list(&or_default("HOTBOARD_LIVE_PLATFORMS", "weibo"))
        .map_err(|e| invalid("HOTBOARD_LIVE_PLATFORMS", e))?;
    let synthetic_items = parse_as::<usize>(&or_default("HOTBOARD_SYNTHETIC_ITEMS", "10"))
        .map_err(|e| invalid("HOTBOARD_SYNTHETIC_ITEMS", e))?;
    let rng_seed = match lookup("HOTBOARD_RNG_SEED") {
        Ok(raw) => Some(parse_as::<u64>(&raw).map_err(|e| invalid("HOTBOARD_RNG_SEED", e))?),
        Err(_) => None,
    };

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        db_idle_timeout_secs,
        live_platforms,
        synthetic_items,
        rng_seed,
    })
}

fn parse_as<T>(raw: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| e.to_string())
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "HOTBOARD_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

/// Parse a comma-separated platform list. Blank entries are ignored and
/// duplicates collapse.
fn parse_platform_list(raw: &str) -> Result<Vec<Platform>, String> {
    let mut platforms = Vec::new();
    for key in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let platform = key.parse::<Platform>().map_err(|e| e.to_string())?;
        if !platforms.contains(&platform) {
            platforms.push(platform);
        }
    }
    Ok(platforms)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
