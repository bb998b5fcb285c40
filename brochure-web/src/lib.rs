//! Web collaborators for the brochure pipeline.
//!
//! - Page retrieval behind the [`fetch::PageFetcher`] seam (`fetch`)
//! - Anchor harvesting and visible-text cleaning with `scraper` (`extract`)
//! - URL checks shared by the pipeline and the handlers (`urls`)

pub mod extract;
pub mod fetch;
pub mod urls;

pub use extract::{clean_text, extract_links};
pub use fetch::{BROWSER_USER_AGENT, HttpPageFetcher, PageFetcher};
pub use urls::{network_location, same_domain, truncate_chars, validate_http_url};
