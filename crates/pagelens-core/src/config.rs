use crate::app_config::{
    AppConfig, Environment, FailurePolicy, ReadabilityMethod, DEFAULT_USER_AGENT,
};
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
/// Parsing and validation are decoupled from the real environment so they can
/// be exercised with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
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

    let positive_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let value = parse_u64(var, default)?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = parse_usize(var, default)?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("PAGELENS_ENV", "development"))?;
    let bind_addr = parse_addr("PAGELENS_BIND_ADDR", "0.0.0.0:8080")?;
    let log_level = or_default("PAGELENS_LOG_LEVEL", "info");
    let user_agent = or_default("PAGELENS_USER_AGENT", DEFAULT_USER_AGENT);

    let fetch_timeout_secs = positive_u64("PAGELENS_FETCH_TIMEOUT_SECS", "30")?;
    let probe_timeout_secs = positive_u64("PAGELENS_PROBE_TIMEOUT_SECS", "30")?;
    let cache_ttl_secs = positive_u64("PAGELENS_CACHE_TTL_SECS", "3600")?;
    let cache_max_entries = positive_usize("PAGELENS_CACHE_MAX_ENTRIES", "100")?;
    let keyword_top_n = parse_usize("PAGELENS_KEYWORD_TOP_N", "15")?;
    let rate_limit_per_minute = positive_usize("PAGELENS_RATE_LIMIT_PER_MINUTE", "60")?;

    let readability_method =
        parse_readability_method(&or_default("PAGELENS_READABILITY_METHOD", "standard"))?;
    let failure_policy = parse_failure_policy(&or_default("PAGELENS_FAILURE_POLICY", "abort"))?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        user_agent,
        fetch_timeout_secs,
        probe_timeout_secs,
        cache_ttl_secs,
        cache_max_entries,
        keyword_top_n,
        readability_method,
        failure_policy,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PAGELENS_ENV".to_string(),
            reason: format!(
                "unknown environment \"{other}\"; expected development, test, or production"
            ),
        }),
    }
}

fn parse_readability_method(s: &str) -> Result<ReadabilityMethod, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "standard" => Ok(ReadabilityMethod::Standard),
        "basic" | "manual" => Ok(ReadabilityMethod::Basic),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PAGELENS_READABILITY_METHOD".to_string(),
            reason: format!("unknown method \"{other}\"; expected standard or basic"),
        }),
    }
}

fn parse_failure_policy(s: &str) -> Result<FailurePolicy, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "abort" => Ok(FailurePolicy::AbortRemaining),
        "isolate" => Ok(FailurePolicy::IsolateStages),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PAGELENS_FAILURE_POLICY".to_string(),
            reason: format!("unknown policy \"{other}\"; expected abort or isolate"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
