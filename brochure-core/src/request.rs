use brochure_common::{BrochureError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TONE: &str = "professional";

/// Shortest website URL accepted before scheme checks run.
pub const MIN_WEBSITE_URL_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrochureRequest {
    pub company_name: String,
    pub website_url: String,
    #[serde(default = "default_tone")]
    pub tone: String,
}

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

impl BrochureRequest {
    pub fn new(
        company_name: impl Into<String>,
        website_url: impl Into<String>,
        tone: Option<&str>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            website_url: website_url.into(),
            tone: tone.unwrap_or(DEFAULT_TONE).to_string(),
        }
    }

    /// Shape checks only; the URL scheme is checked by the bundler.
    ///
    /// ```
    /// use brochure_core::BrochureRequest;
    ///
    /// assert!(BrochureRequest::new("Acme", "https://acme.test", None).validate().is_ok());
    /// assert!(BrochureRequest::new("", "https://acme.test", None).validate().is_err());
    /// assert!(BrochureRequest::new("Acme", "a.io", None).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.company_name.trim().is_empty() {
            return Err(BrochureError::Validation(
                "company_name must not be empty".into(),
            ));
        }
        if self.website_url.trim().chars().count() < MIN_WEBSITE_URL_LEN {
            return Err(BrochureError::Validation(format!(
                "website_url must be at least {MIN_WEBSITE_URL_LEN} characters"
            )));
        }
        Ok(())
    }

    /// The requested tone, or the default when blank.
    pub fn tone(&self) -> &str {
        match self.tone.trim() {
            "" => DEFAULT_TONE,
            tone => tone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrochureResult {
    pub brochure_markdown: String,
    /// Landing page first, then the selected sub-pages.
    pub sources: Vec<String>,
}
