//! Server-rendered HTML for the form workflow.

use brochure_core::{BrochureRequest, BrochureResult, DEFAULT_TONE};

use crate::render::escape;

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:860px;margin:2rem auto;padding:0 1rem;line-height:1.5}\
label{display:block;margin-top:1rem;font-weight:600}\
input{width:100%;padding:.5rem;margin-top:.25rem}\
button{margin-top:1.5rem;padding:.6rem 1.2rem}\
pre{white-space:pre-wrap;background:#f5f5f5;padding:1rem}\
.error{color:#a00}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape(title),
    )
}

pub fn index_page() -> String {
    let body = format!(
        "<h1>AI Brochure Generator</h1>\n\
         <p>Enter a company website; the landing page and a few relevant sub-pages are summarised into a brochure.</p>\n\
         <form method=\"post\" action=\"/generate\">\n\
         <label for=\"company_name\">Company name</label>\n\
         <input id=\"company_name\" name=\"company_name\" required>\n\
         <label for=\"website_url\">Website URL</label>\n\
         <input id=\"website_url\" name=\"website_url\" type=\"url\" placeholder=\"https://example.com\" required>\n\
         <label for=\"tone\">Tone</label>\n\
         <input id=\"tone\" name=\"tone\" value=\"{DEFAULT_TONE}\">\n\
         <button type=\"submit\">Generate brochure</button>\n\
         </form>"
    );
    layout("AI Brochure Generator", &body)
}

pub fn result_page(request: &BrochureRequest, result: &BrochureResult, brochure_html: &str) -> String {
    let sources: String = result
        .sources
        .iter()
        .map(|u| {
            let u = escape(u);
            format!("<li><a href=\"{u}\" rel=\"noopener\">{u}</a></li>\n")
        })
        .collect();
    let body = format!(
        "<h1>Brochure: {company}</h1>\n\
         <p>Website: {website} &middot; Tone: {tone}</p>\n\
         <article>\n{brochure_html}\n</article>\n\
         <h2>Sources</h2>\n<ul>\n{sources}</ul>\n\
         <h2>Markdown</h2>\n<pre>{markdown}</pre>\n\
         <p><a href=\"/\">Generate another</a></p>",
        company = escape(&request.company_name),
        website = escape(&request.website_url),
        tone = escape(request.tone()),
        markdown = escape(&result.brochure_markdown),
    );
    layout(&format!("Brochure: {}", request.company_name), &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        "<h1>Something went wrong</h1>\n<p class=\"error\">{}</p>\n<p><a href=\"/\">Back</a></p>",
        escape(message)
    );
    layout("Error", &body)
}
