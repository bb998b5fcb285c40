//! Fixed instructions sent to the chat model.

pub const LINK_SELECTOR_SYSTEM: &str = r#"You will see URLs collected from a company's website.

Answer with one JSON object shaped like this:
{
  "links": [
    {"type": "about|products|pricing|careers|contact|blog|other", "url": "https://..."}
  ]
}

Guidelines:
- Favour pages that help describe the company in a brochure: about, products or services, pricing, customers or case studies, careers, contact.
- Leave out privacy, terms, legal and cookie pages, login or sign-up pages, and tracking URLs.
- Only pick URLs on the SAME DOMAIN as the website given.
- Pick no more than 5 links.
- Reply with valid JSON and nothing else.
"#;

pub const BROCHURE_SYSTEM: &str = r#"You write short company brochures.

The input holds the company name, the tone to write in, and cleaned text from the website's landing page and a handful of relevant sub-pages.

Produce a Markdown brochure (no code fences) with these sections:
- Headline (one line)
- About
- What we do (offerings / products)
- Who it's for (customers / use cases), if known
- Why choose us (differentiators)
- Culture & Careers (only when the site covers it)
- Contact / Next steps (call to action)

Guidelines:
- Aim for roughly 400-900 words.
- Never make facts up. When something is unclear, write "Not stated on the site".
- Keep the formatting clean and easy to read.
"#;

/// User turn for link selection; one `- url` line per candidate.
pub fn selection_prompt(base_url: &str, links: &[String]) -> String {
    let listed = links
        .iter()
        .map(|u| format!("- {u}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Website: {base_url}\n\nHere are links found on the site:\n{listed}\n")
}

pub fn brochure_prompt(company_name: &str, tone: &str, document: &str) -> String {
    format!("Company name: {company_name}\nDesired tone: {tone}\n\nWebsite content:\n{document}\n")
}
