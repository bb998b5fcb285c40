//! The brochure pipeline: fetch the landing page, let the model pick
//! sub-pages, bundle their cleaned text, then ask the model for a brochure.
//!
//! Every collaborator arrives behind a trait object
//! ([`brochure_web::PageFetcher`], [`brochure_llm::traits::ChatClient`]) so
//! the pipeline can be driven by in-memory doubles in tests.

pub mod bundle;
pub mod generator;
pub mod prompts;
pub mod request;
pub mod selector;

use brochure_config::Settings;

pub use bundle::{Page, SourceBundle, SourceBundler};
pub use generator::BrochureGenerator;
pub use request::{BrochureRequest, BrochureResult, DEFAULT_TONE};
pub use selector::{ClassifiedLink, LinkCategory, RelevanceSelector};

/// Per-request caps, read once from [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineLimits {
    /// Sub-pages per bundle, landing page excluded.
    pub max_pages: usize,
    pub max_chars_per_page: usize,
    /// Links shown to the selector model.
    pub max_candidate_links: usize,
}

impl PipelineLimits {
    pub const MAX_CANDIDATE_LINKS: usize = 200;

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_pages: settings.max_pages,
            max_chars_per_page: settings.max_chars_per_page,
            max_candidate_links: Self::MAX_CANDIDATE_LINKS,
        }
    }
}

impl Default for PipelineLimits {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
