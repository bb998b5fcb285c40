use std::sync::Arc;

use brochure_common::Result;
use brochure_llm::GENERATION_TEMPERATURE;
use brochure_llm::traits::ChatClient;
use brochure_web::PageFetcher;

use crate::PipelineLimits;
use crate::bundle::{SourceBundle, SourceBundler};
use crate::prompts::{BROCHURE_SYSTEM, brochure_prompt};
use crate::request::{BrochureRequest, BrochureResult};
use crate::selector::RelevanceSelector;

/// Bundle the site, then have the model write the brochure.
#[derive(Clone)]
pub struct BrochureGenerator {
    bundler: SourceBundler,
    llm: Arc<dyn ChatClient>,
}

impl BrochureGenerator {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        llm: Arc<dyn ChatClient>,
        limits: PipelineLimits,
    ) -> Self {
        let selector = RelevanceSelector::new(llm.clone(), limits);
        Self {
            bundler: SourceBundler::new(fetcher, selector, limits),
            llm,
        }
    }

    pub async fn bundle(&self, request: &BrochureRequest) -> Result<SourceBundle> {
        request.validate()?;
        self.bundler
            .build(&request.company_name, &request.website_url)
            .await
    }

    /// Two model calls per request: link selection, then the brochure.
    pub async fn generate(&self, request: &BrochureRequest) -> Result<BrochureResult> {
        let bundle = self.bundle(request).await?;
        let markdown = self
            .llm
            .chat_markdown(
                BROCHURE_SYSTEM,
                &brochure_prompt(&request.company_name, request.tone(), &bundle.document),
                GENERATION_TEMPERATURE,
            )
            .await?;
        let brochure_markdown = markdown.trim().to_string();

        tracing::info!(
            company = %request.company_name,
            sources = bundle.sources.len(),
            chars = brochure_markdown.chars().count(),
            "brochure.generated"
        );
        Ok(BrochureResult {
            brochure_markdown,
            sources: bundle.sources,
        })
    }
}
