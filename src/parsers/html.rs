use crate::results::HtmlHints;
use regex::Regex;

/// Id of the script tag Next.js hydrates the client from
pub const NEXT_DATA_MARKER: &str = "__NEXT_DATA__";

/// Global Nuxt sets when it inlines its state
pub const NUXT_MARKER: &str = "__NUXT__";

/// First `<script id="__NEXT_DATA__">` block, content may span lines
pub const NEXT_DATA_PATTERN: &str = r#"(?s)<script[^>]*id="__NEXT_DATA__"[^>]*>(.*?)</script>"#;

/// First `<title>` on a single line, any case
pub const TITLE_PATTERN: &str = r"(?i)<title>(.*?)</title>";

/// Computes page hints. These don't depend on whether extraction succeeded.
pub fn hints(html: &str, title_re: &Regex) -> HtmlHints {
    let title = title_re
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    ::log::debug!("HTML page is {} bytes, title {:?}", html.len(), title);

    HtmlHints {
        length: html.len(),
        has_next_data_tag: html.contains(NEXT_DATA_MARKER),
        has_nuxt: html.contains(NUXT_MARKER),
        title,
    }
}
