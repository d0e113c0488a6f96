pub mod app_config;
pub mod catalog;
pub mod categories;
pub mod config;
mod error;

pub use app_config::AppConfig;
pub use catalog::{Catalog, CategoryGroup, ProductDetail, ProductImage, ProductOption};
pub use categories::{category_for_path, match_category_name, Category, CATEGORIES};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
