use std::collections::HashSet;
use std::sync::Arc;

use brochure_common::Result;
use brochure_llm::SELECTION_TEMPERATURE;
use brochure_llm::traits::ChatClient;
use brochure_web::same_domain;
use serde_json::Value;
use url::Url;

use crate::PipelineLimits;
use crate::prompts::{LINK_SELECTOR_SYSTEM, selection_prompt};

/// Advisory tag the model attaches to a selected link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkCategory {
    About,
    Products,
    Pricing,
    Careers,
    Contact,
    Blog,
    Other,
}

impl LinkCategory {
    /// Unknown or missing tags read as [`LinkCategory::Other`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "about" => Self::About,
            "products" => Self::Products,
            "pricing" => Self::Pricing,
            "careers" => Self::Careers,
            "contact" => Self::Contact,
            "blog" => Self::Blog,
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Products => "products",
            Self::Pricing => "pricing",
            Self::Careers => "careers",
            Self::Contact => "contact",
            Self::Blog => "blog",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLink {
    pub category: LinkCategory,
    pub url: String,
}

/// Read `{"links": [{"type": .., "url": ..}]}` leniently.
///
/// Anything not shaped like that is skipped: a non-object root, a missing
/// or non-array `links`, entries without a non-empty string `url`.
pub fn parse_selection(value: &Value) -> Vec<ClassifiedLink> {
    let Some(items) = value.get("links").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let url = item.get("url")?.as_str()?.trim();
            if url.is_empty() {
                return None;
            }
            let category = item
                .get("type")
                .and_then(Value::as_str)
                .map(LinkCategory::from_tag)
                .unwrap_or(LinkCategory::Other);
            Some(ClassifiedLink {
                category,
                url: url.to_string(),
            })
        })
        .collect()
}

/// Keep fetchable URLs on the base URL's network location, dedupe in order,
/// then cap at `max`.
pub fn filter_same_domain(base_url: &str, links: &[ClassifiedLink], max: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    links
        .iter()
        .filter(|link| is_fetchable(&link.url) && same_domain(base_url, &link.url))
        .filter(|link| seen.insert(link.url.as_str()))
        .map(|link| link.url.clone())
        .take(max)
        .collect()
}

fn is_fetchable(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

/// Asks the model which of a site's links are worth bundling.
#[derive(Clone)]
pub struct RelevanceSelector {
    llm: Arc<dyn ChatClient>,
    limits: PipelineLimits,
}

impl RelevanceSelector {
    pub fn new(llm: Arc<dyn ChatClient>, limits: PipelineLimits) -> Self {
        Self { llm, limits }
    }

    /// At most `max_pages` same-domain URLs, in the model's order.
    ///
    /// Fails with `BrochureError::Parse` when neither the strict nor the
    /// relaxed attempt yields JSON; provider and network errors propagate.
    pub async fn select(&self, base_url: &str, links: &[String]) -> Result<Vec<String>> {
        let candidates = &links[..links.len().min(self.limits.max_candidate_links)];
        tracing::info!(
            base = base_url,
            candidates = candidates.len(),
            total = links.len(),
            model = self.llm.model_name(),
            "selector.attempt"
        );

        let value = self
            .llm
            .chat_json(
                LINK_SELECTOR_SYSTEM,
                &selection_prompt(base_url, candidates),
                SELECTION_TEMPERATURE,
            )
            .await?;

        let classified = parse_selection(&value);
        let selected = filter_same_domain(base_url, &classified, self.limits.max_pages);
        tracing::info!(
            returned = classified.len(),
            selected = selected.len(),
            categories = ?classified.iter().map(|l| l.category.as_str()).collect::<Vec<_>>(),
            "selector.done"
        );
        Ok(selected)
    }
}
