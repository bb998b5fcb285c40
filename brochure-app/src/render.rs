use pulldown_cmark::{Options, Parser, html};

/// Markdown to sanitized HTML. Raw HTML in the model output is stripped of
/// scripts, handlers and other unsafe markup.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, options));
    ammonia::clean(&out)
}

/// Escape untrusted text for HTML bodies and attribute values.
pub fn escape(text: &str) -> String {
    ammonia::clean_text(text)
}
