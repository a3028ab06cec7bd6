use std::env::VarError;
use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Reads [`AppConfig`] from the process environment, after loading a `.env`
/// file if one exists.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Reads [`AppConfig`] from the process environment only; `.env` files are
/// ignored.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|var| std::env::var(var))
}

/// Builds [`AppConfig`] from `lookup`, which stands in for `std::env::var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let var_or = |var: &str, fallback: &str| lookup(var).unwrap_or_else(|_| fallback.to_string());

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match lookup(var) {
            Err(_) => Ok(default),
            Ok(raw) => parse_flag(&raw).ok_or_else(|| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got \"{raw}\""),
            }),
        }
    };

    let env = parse_environment(&var_or("FEEDGEN_ENV", "development"));
    let log_level = var_or("FEEDGEN_LOG_LEVEL", "info");
    let config_path = PathBuf::from(var_or("FEEDGEN_CONFIG_PATH", "./config/feed.yaml"));
    let output_dir = PathBuf::from(var_or("FEEDGEN_OUTPUT_DIR", "./var/feeds"));
    let fail_fast = parse_bool("FEEDGEN_FAIL_FAST", false)?;

    Ok(AppConfig {
        env,
        log_level,
        config_path,
        output_dir,
        fail_fast,
    })
}

/// Anything unrecognised is treated as development.
fn parse_environment(raw: &str) -> Environment {
    match raw.trim().to_ascii_lowercase().as_str() {
        "production" | "prod" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
