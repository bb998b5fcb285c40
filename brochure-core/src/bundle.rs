use std::sync::Arc;

use brochure_common::{BrochureError, Result};
use brochure_web::{PageFetcher, clean_text, extract_links, truncate_chars, validate_http_url};
use url::Url;

use crate::PipelineLimits;
use crate::selector::RelevanceSelector;

/// One fetched page, text already capped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBundle {
    /// Landing page first, then sub-pages in selection order.
    pub pages: Vec<Page>,
    /// The text handed to the brochure prompt.
    pub document: String,
    pub sources: Vec<String>,
}

impl SourceBundle {
    fn assemble(company_name: &str, pages: Vec<Page>) -> Self {
        let mut parts: Vec<String> = vec![format!("# Company: {company_name}\n")];
        for (i, page) in pages.iter().enumerate() {
            if i == 0 {
                parts.push(format!("## Landing page: {}\n", page.url));
            } else {
                parts.push(format!("\n\n## Page: {}\n", page.url));
            }
            parts.push(page.text.clone());
        }
        let sources = pages.iter().map(|p| p.url.clone()).collect();
        Self {
            document: parts.join("\n"),
            sources,
            pages,
        }
    }
}

/// Landing page + model-selected sub-pages as one document.
#[derive(Clone)]
pub struct SourceBundler {
    fetcher: Arc<dyn PageFetcher>,
    selector: RelevanceSelector,
    limits: PipelineLimits,
}

impl SourceBundler {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        selector: RelevanceSelector,
        limits: PipelineLimits,
    ) -> Self {
        Self {
            fetcher,
            selector,
            limits,
        }
    }

    /// Fetches 1 + |selected| pages sequentially; any failure aborts the bundle.
    pub async fn build(&self, company_name: &str, website_url: &str) -> Result<SourceBundle> {
        let website_url = website_url.trim();
        let landing = validate_http_url(website_url)?;
        let landing_html = self.fetcher.fetch(&landing).await?;
        let links = extract_links(&landing, &landing_html);

        let selected = self.selector.select(website_url, &links).await?;

        let mut pages = Vec::with_capacity(selected.len() + 1);
        pages.push(Page {
            url: website_url.to_string(),
            text: self.capped_text(&landing_html),
        });
        for raw in selected {
            let url = Url::parse(&raw)
                .map_err(|e| BrochureError::Validation(format!("invalid page URL {raw:?}: {e}")))?;
            let html = self.fetcher.fetch(&url).await?;
            pages.push(Page {
                text: self.capped_text(&html),
                url: raw,
            });
        }

        let bundle = SourceBundle::assemble(company_name, pages);
        tracing::info!(
            company = company_name,
            pages = bundle.pages.len(),
            chars = bundle.document.chars().count(),
            "bundle.built"
        );
        Ok(bundle)
    }

    fn capped_text(&self, html: &str) -> String {
        truncate_chars(&clean_text(html), self.limits.max_chars_per_page)
    }
}
