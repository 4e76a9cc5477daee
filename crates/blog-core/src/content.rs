//! Content rendering - author markdown to safe HTML.
//!
//! Two stages: markdown is turned into HTML, then the HTML goes through an
//! allow-list sanitizer tuned for user-generated content. The raw markdown
//! stays the source of truth; this runs on the way out.

use ammonia::Builder;
use pulldown_cmark::{Options, Parser, html};

/// `rel` forced onto every link in rendered posts.
const LINK_REL: &str = "nofollow noopener noreferrer";

/// Render author markup into HTML without sanitizing it.
pub fn markdown_to_html(raw: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(raw, options);
    let mut out = String::with_capacity(raw.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Strip script-capable markup, keeping the user-generated-content subset.
pub fn sanitize_html(html: &str) -> String {
    Builder::default()
        .link_rel(Some(LINK_REL))
        .clean(html)
        .to_string()
}

/// Full pipeline: markdown, then sanitize.
///
/// Rendering output that already went through this pipeline leaves its
/// visible text unchanged.
pub fn render(raw: &str) -> String {
    sanitize_html(&markdown_to_html(raw))
}
