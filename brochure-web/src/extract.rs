use std::collections::HashSet;

use scraper::{Html, Selector};
use url::Url;

/// Hrefs with these prefixes never name a page worth fetching.
const SKIPPED_HREF_PREFIXES: [&str; 3] = ["mailto:", "tel:", "#"];

/// Elements whose text never reaches the bundle.
const STRIPPED_TAGS: [&str; 6] = ["script", "style", "img", "input", "svg", "noscript"];

/// Absolute URLs of every anchor in `html`, resolved against `base`.
///
/// - Skips missing/empty hrefs and `mailto:`, `tel:` and in-page `#` links.
/// - Deduplicates by exact string, keeping first-seen order.
/// - No cap; the selector truncates later.
pub fn extract_links(base: &Url, html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let sel = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for el in doc.select(&sel) {
        let href = match el.value().attr("href") {
            Some(h) => h.trim(),
            None => continue,
        };
        if href.is_empty() || SKIPPED_HREF_PREFIXES.iter().any(|p| href.starts_with(p)) {
            continue;
        }
        let Ok(abs) = base.join(href) else {
            continue;
        };
        let abs = abs.to_string();
        if seen.insert(abs.clone()) {
            out.push(abs);
        }
    }

    tracing::debug!(base = %base, links = out.len(), "links.extracted");
    out
}

/// Visible text of the document body, one trimmed text run per line.
///
/// Script, style, image, input, svg and noscript subtrees are skipped.
/// Falls back to the whole document when there is no body element.
pub fn clean_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let body = Selector::parse("body")
        .ok()
        .and_then(|sel| doc.select(&sel).next());
    let root = match body {
        Some(el) => *el,
        None => doc.tree.root(),
    };

    let mut lines: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| STRIPPED_TAGS.contains(&e.name()))
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed);
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Url {
        Url::parse("https://acme.test").unwrap()
    }

    #[test]
    fn skips_pseudo_schemes_and_dedupes() {
        let html = r#"<a href="/about">About</a><a href="mailto:x@y.com">Mail</a><a href="/about">dup</a>"#;
        assert_eq!(extract_links(&acme(), html), vec!["https://acme.test/about"]);
    }

    #[test]
    fn keeps_first_seen_order_and_resolves_relative_paths() {
        let base = Url::parse("https://acme.test/company/").unwrap();
        let html = r##"
            <a href="team">Team</a>
            <a href="tel:+15550100">Call</a>
            <a href="#top">Top</a>
            <a href="https://acme.test/pricing">Pricing</a>
            <a>no href</a>
            <a href="">empty</a>
            <a href="../careers">Careers</a>
            <a href="team">Team again</a>
        "##;
        assert_eq!(
            extract_links(&base, html),
            vec![
                "https://acme.test/company/team",
                "https://acme.test/pricing",
                "https://acme.test/careers",
            ]
        );
    }

    #[test]
    fn extraction_is_deterministic() {
        let html = r#"<a href="/b">b</a><a href="/a">a</a><a href="https://other.test/">o</a>"#;
        assert_eq!(extract_links(&acme(), html), extract_links(&acme(), html));
    }

    #[test]
    fn malformed_html_still_yields_anchors() {
        let html = r#"<div><a href="/about">About<p><a href="/contact">Contact</div"#;
        assert_eq!(
            extract_links(&acme(), html),
            vec!["https://acme.test/about", "https://acme.test/contact"]
        );
    }

    #[test]
    fn clean_text_drops_non_content_elements() {
        let html = r#"<html><head><title>Acme</title><style>p{}</style></head>
            <body>
              <h1>Acme Widgets</h1>
              <script>var tracking = 1;</script>
              <p>We build   widgets.</p>
              <noscript>Enable JS</noscript>
              <svg><text>logo</text></svg>
              <img alt="hero"><input value="q">
              <ul><li>Fast</li><li>Cheap</li></ul>
            </body></html>"#;
        assert_eq!(
            clean_text(html),
            "Acme Widgets\nWe build   widgets.\nFast\nCheap"
        );
    }

    #[test]
    fn clean_text_of_empty_document_is_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("<body>   </body>"), "");
    }
}
