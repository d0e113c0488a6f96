//! The crawl run: all categories, one catalog file, exactly one write.
//!
//! Categories are independent failure domains; a category that cannot be
//! walked still appears in the catalog with an empty product list. The only
//! fatal errors are serialization and the final file write.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::ValueEnum;
use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use fcdb_core::{AppConfig, Catalog, Category, CategoryGroup, CATEGORIES};
use fcdb_scraper::{walk_category, ExtractionRules, HttpNavigator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Walks all categories and writes the catalog to `output` (or the
/// configured path). Returns an error only when the artifact cannot be
/// produced.
pub async fn run_crawl(
    config: &AppConfig,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let rules = ExtractionRules::default();
    let deadline = config
        .run_timeout_secs
        .map(|secs| Instant::now() + Duration::from_secs(secs));
    let max_concurrent = config.max_concurrent_categories.max(1);

    info!(
        categories = CATEGORIES.len(),
        max_concurrent, "starting crawl"
    );

    // `buffered` (not `buffer_unordered`) keeps results in input order, so
    // the catalog's category order is fixed regardless of concurrency.
    let groups: Vec<CategoryGroup> = stream::iter(CATEGORIES.iter())
        .map(|category| crawl_one(config, &rules, deadline, category))
        .buffered(max_concurrent)
        .collect()
        .await;

    for group in &groups {
        info!(
            category = %group.name,
            products = group.products.len(),
            "category complete"
        );
    }

    let catalog = Catalog::from_groups(groups);
    info!(products = catalog.product_count(), "crawl finished");

    let contents = match format {
        OutputFormat::Yaml => catalog.to_yaml().context("failed to serialize catalog")?,
        OutputFormat::Json => catalog.to_json().context("failed to serialize catalog")?,
    };

    let path = output.unwrap_or_else(|| config.output_path.clone());
    write_atomic(&path, &contents)
        .with_context(|| format!("failed to write catalog to {}", path.display()))?;
    info!(path = %path.display(), "catalog written");
    Ok(())
}

/// One category, one fresh navigator session. Never fails the run.
async fn crawl_one(
    config: &AppConfig,
    rules: &ExtractionRules,
    deadline: Option<Instant>,
    category: &Category,
) -> CategoryGroup {
    if let Some(deadline) = deadline {
        if Instant::now() >= deadline {
            warn!(
                category = category.name,
                "run deadline reached, skipping category"
            );
            return empty_group(category);
        }
    }

    let mut navigator = match HttpNavigator::new(
        &config.user_agent,
        Duration::from_secs(config.nav_timeout_secs),
        Duration::from_millis(config.settle_delay_ms),
    ) {
        Ok(navigator) => navigator,
        Err(err) => {
            error!(
                category = category.name,
                error = %err,
                "failed to open a session for category"
            );
            return empty_group(category);
        }
    };

    walk_category(&mut navigator, category, rules).await
}

fn empty_group(category: &Category) -> CategoryGroup {
    CategoryGroup {
        name: category.name.to_string(),
        url: category.url.to_string(),
        products: Vec::new(),
    }
}

/// Writes via a sibling temp file and rename, so a crash mid-write never
/// leaves a truncated catalog at the destination.
fn write_atomic(path: &Path, contents: &str) -> anyhow::Result<()> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("catalog");
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
