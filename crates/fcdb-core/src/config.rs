use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load crawl configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable has an unparseable value. Every
/// variable is optional; unset variables take their defaults.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load crawl configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable has an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_opt_u64 = |var: &str| -> Result<Option<u64>, ConfigError> {
        match lookup(var) {
            Err(_) => Ok(None),
            Ok(raw) => raw
                .parse::<u64>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
        }
    };

    let log_level = or_default("FCDB_LOG_LEVEL", "info");
    let output_path = PathBuf::from(or_default("FCDB_OUTPUT_PATH", "./products.yaml"));
    let user_agent = or_default("FCDB_USER_AGENT", "fcdb/0.1 (catalog-crawler)");
    let nav_timeout_secs = parse_u64("FCDB_NAV_TIMEOUT_SECS", "60")?;
    let settle_delay_ms = parse_u64("FCDB_SETTLE_DELAY_MS", "2000")?;
    let max_concurrent_categories = parse_usize("FCDB_MAX_CONCURRENT_CATEGORIES", "1")?;
    let run_timeout_secs = parse_opt_u64("FCDB_RUN_TIMEOUT_SECS")?;

    Ok(AppConfig {
        log_level,
        output_path,
        user_agent,
        nav_timeout_secs,
        settle_delay_ms,
        max_concurrent_categories,
        run_timeout_secs,
    })
}
