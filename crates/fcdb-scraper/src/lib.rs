pub mod detail;
pub mod dom;
mod error;
pub mod list;
pub mod navigator;
pub mod rules;
pub mod walker;

pub use detail::{extract_detail, DetailFields};
pub use dom::{Dom, NodeId, Page};
pub use error::ScraperError;
pub use list::{extract_list_entries, ProductListEntry};
pub use navigator::{HttpNavigator, Navigator};
pub use rules::ExtractionRules;
pub use walker::walk_category;
