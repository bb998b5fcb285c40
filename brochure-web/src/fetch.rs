use std::time::Duration;

use async_trait::async_trait;
use brochure_common::{BrochureError, Result};
use brochure_http::{HttpClient, HttpError, RequestOpts};
use url::Url;

/// Desktop browser identification; some sites refuse unknown agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Retrieves raw page HTML.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fails with `BrochureError::Network` on timeout or a non-2xx status.
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// [`PageFetcher`] over plain HTTP GET. Never retries.
pub struct HttpPageFetcher {
    client: HttpClient,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        // Pages are always requested by absolute URL; the base is never joined.
        let client = HttpClient::new("about:blank")
            .and_then(|c| c.with_user_agent(BROWSER_USER_AGENT))
            .map_err(|e| BrochureError::Configuration(e.to_string()))?
            .with_timeout(timeout)
            .with_retries(0);
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        tracing::debug!(url = %url, "fetch.page.start");
        let html = self
            .client
            .get_text(
                url.as_str(),
                RequestOpts {
                    allow_absolute: true,
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| match e {
                HttpError::Url(_) => BrochureError::Validation(e.to_string()),
                other => BrochureError::Network(format!("{url}: {other}")),
            })?;
        tracing::debug!(url = %url, bytes = html.len(), "fetch.page.done");
        Ok(html)
    }
}
