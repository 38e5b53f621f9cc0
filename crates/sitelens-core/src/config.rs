use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_PAGESPEED_BASE_URL: &str =
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";
pub const DEFAULT_SCREENSHOT_BASE_URL: &str = "https://api.microlink.io";

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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup. Every variable is optional; credentials that are absent
/// (or blank) simply push the pipeline into its fallback paths.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
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

    let parse_flag = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match optional(var) {
            None => Ok(default),
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                invalid(var, format!("expected a boolean (true/false/1/0/yes/no), got '{raw}'"))
            }),
        }
    };

    let env = parse_environment(&or_default("SITELENS_ENV", "development"));
    let bind_addr = parse_addr("SITELENS_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SITELENS_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("SITELENS_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SITELENS_USER_AGENT", DEFAULT_USER_AGENT);

    let max_urls_per_request = parse_usize("SITELENS_MAX_URLS", "10")?;
    if max_urls_per_request == 0 {
        return Err(ConfigError::Validation(
            "SITELENS_MAX_URLS must be at least 1".to_string(),
        ));
    }

    let llm_api_key = optional("OPENAI_API_KEY");
    let llm_base_url = or_default("SITELENS_LLM_BASE_URL", DEFAULT_LLM_BASE_URL);
    let llm_model = or_default("SITELENS_LLM_MODEL", DEFAULT_LLM_MODEL);

    let pagespeed_api_key = optional("PAGESPEED_API_KEY");
    let pagespeed_base_url = or_default("SITELENS_PAGESPEED_BASE_URL", DEFAULT_PAGESPEED_BASE_URL);
    let use_mock_performance = parse_flag("SITELENS_USE_MOCK_PERFORMANCE", false)?;

    let screenshots_enabled = parse_flag("SITELENS_SCREENSHOTS_ENABLED", true)?;
    let screenshot_base_url =
        or_default("SITELENS_SCREENSHOT_BASE_URL", DEFAULT_SCREENSHOT_BASE_URL);
    let known_domains_path = optional("SITELENS_KNOWN_DOMAINS_PATH").map(PathBuf::from);
    let api_keys = optional("SITELENS_API_KEYS")
        .map(|raw| parse_key_list(&raw))
        .unwrap_or_default();

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        request_timeout_secs,
        user_agent,
        max_urls_per_request,
        llm_api_key,
        llm_base_url,
        llm_model,
        pagespeed_api_key,
        pagespeed_base_url,
        use_mock_performance,
        screenshots_enabled,
        screenshot_base_url,
        known_domains_path,
        api_keys,
    })
}

/// Splits a comma-separated key list, dropping blanks and duplicates.
fn parse_key_list(raw: &str) -> Vec<String> {
    let mut keys: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    keys.sort();
    keys.dedup();
    keys
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

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
