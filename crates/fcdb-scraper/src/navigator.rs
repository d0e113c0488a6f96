//! Page navigation.
//!
//! One navigator instance is one browsing session; the orchestrator opens
//! a fresh session per category so categories never share connection state.

use std::time::Duration;

use crate::dom::Page;
use crate::error::ScraperError;

/// Opens URLs and returns parsed pages. Implemented over HTTP in
/// production and scripted in tests.
#[allow(async_fn_in_trait)]
pub trait Navigator {
    async fn open(&mut self, url: &str) -> Result<Page, ScraperError>;
}

/// HTTP-backed navigator. Applies a bounded navigation timeout and a fixed
/// settle delay after each successful fetch, pacing consecutive page loads
/// within a session.
pub struct HttpNavigator {
    client: reqwest::Client,
    settle_delay: Duration,
}

impl HttpNavigator {
    /// Builds a session with the given identity and timing parameters.
    pub fn new(
        user_agent: &str,
        nav_timeout: Duration,
        settle_delay: Duration,
    ) -> Result<Self, ScraperError> {
        let client = reqwest::Client::builder()
            .timeout(nav_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            settle_delay,
        })
    }
}

impl Navigator for HttpNavigator {
    async fn open(&mut self, url: &str) -> Result<Page, ScraperError> {
        tracing::debug!(url, "navigating");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
        Ok(Page::parse(url, &body))
    }
}
