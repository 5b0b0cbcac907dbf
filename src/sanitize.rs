//! Output sanitization for free-text bookmark fields.
//!
//! Stored records keep exactly what the client sent; `title` and
//! `description` go through [`sanitize`] on the way out. The result never
//! contains a raw `<`, `>`, `"` or `'`, and every `&` starts a character
//! reference, so running it twice changes nothing.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A tag runs from `<` to the next `>`. A stray `<` or end of text also
/// closes it, so no match ever scans past the following tag.
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>?").expect("valid tag pattern"));

/// Inside a tag: a quoted value (kept) or an `on<name>` attribute with its
/// optional value (dropped). An unclosed quote runs to the end of the tag.
static TAG_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)"[^"]*(?:"|$)|'[^']*(?:'|$)|[\s/]+on[a-z][a-z0-9_-]*(?:\s*=\s*(?:"[^"]*(?:"|$)|'[^']*(?:'|$)|[^\s>]*))?"#,
    )
    .expect("valid tag token pattern")
});

/// A character reference, or a single character that needs escaping
static ESCAPABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"&(?:[A-Za-z][A-Za-z0-9]{0,31}|#[0-9]{1,31}|#[xX][0-9A-Fa-f]{1,30});|[<>"'&]"#)
        .expect("valid escape pattern")
});

/// Neutralize markup in `text`: drop inline event-handler attributes from
/// tags, then HTML-escape what is left.
pub fn sanitize(text: &str) -> String {
    escape_html(&strip_event_handlers(text))
}

/// Escape HTML-significant characters, leaving existing character
/// references (`&amp;`, `&#39;`, `&#x27;`, ...) untouched.
pub fn escape_html(text: &str) -> String {
    ESCAPABLE
        .replace_all(text, |caps: &Captures| match &caps[0] {
            "<" => "&lt;".to_string(),
            ">" => "&gt;".to_string(),
            "\"" => "&quot;".to_string(),
            "'" => "&#x27;".to_string(),
            "&" => "&amp;".to_string(),
            reference => reference.to_string(),
        })
        .into_owned()
}

/// Remove `on*` attributes from every tag in `text`. Text outside tags is
/// copied as-is.
fn strip_event_handlers(text: &str) -> String {
    TAG.replace_all(text, |caps: &Captures| strip_tag_handlers(&caps[0]))
        .into_owned()
}

fn strip_tag_handlers(tag: &str) -> String {
    TAG_TOKEN
        .replace_all(tag, |caps: &Captures| {
            let token = &caps[0];
            if token.starts_with('"') || token.starts_with('\'') {
                token.to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}
