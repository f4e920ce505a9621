use crate::app_config::{AgodaCredentials, AppConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but malformed.
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
/// Returns `ConfigError` if a value is present but malformed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let non_empty = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let credentials = match (non_empty("AGODA_SITE_ID"), non_empty("AGODA_API_KEY")) {
        (Some(site_id), Some(api_key)) => Some(AgodaCredentials { site_id, api_key }),
        _ => None,
    };

    let default_currency = parse_currency(&or_default("STAYCHECK_CURRENCY", "USD"))
        .map_err(|reason| invalid("STAYCHECK_CURRENCY", reason))?;
    let default_language = or_default("STAYCHECK_LANGUAGE", "en-us");

    let default_adults = parse_u32("STAYCHECK_ADULTS", "2")?;
    if default_adults == 0 {
        return Err(invalid(
            "STAYCHECK_ADULTS",
            "at least one adult is required".to_string(),
        ));
    }
    let default_children = parse_u32("STAYCHECK_CHILDREN", "0")?;

    let verbose = parse_bool(&or_default("STAYCHECK_VERBOSE", "false"))
        .map_err(|reason| invalid("STAYCHECK_VERBOSE", reason))?;
    let log_level = or_default("STAYCHECK_LOG_LEVEL", "info");

    Ok(AppConfig {
        credentials,
        default_currency,
        default_language,
        default_adults,
        default_children,
        verbose,
        log_level,
    })
}

fn parse_currency(raw: &str) -> Result<String, String> {
    let code = raw.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(format!("expected a three-letter currency code, got '{code}'"))
    }
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(format!("expected true/false, got '{other}'")),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
