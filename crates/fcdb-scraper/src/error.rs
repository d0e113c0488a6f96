use thiserror::Error;

/// Collaborator-level failures only: extraction itself never errors — every
/// missing field has a defined empty/default fallback.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}
