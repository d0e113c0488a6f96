use std::path::PathBuf;

/// Runtime configuration for a crawl, sourced from environment variables.
/// Every field has a default; see [`crate::config::load_app_config`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Destination for the catalog artifact.
    pub output_path: PathBuf,
    pub user_agent: String,
    /// Per-navigation timeout.
    pub nav_timeout_secs: u64,
    /// Fixed delay after each navigation, letting client-side rendering
    /// finish before the page is snapshotted.
    pub settle_delay_ms: u64,
    /// `1` = strictly sequential (the default); higher values walk
    /// categories concurrently while preserving output order.
    pub max_concurrent_categories: usize,
    /// Optional whole-run deadline, checked between categories.
    pub run_timeout_secs: Option<u64>,
}
