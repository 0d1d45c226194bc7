use html2text::from_read;

use once_cell::sync::Lazy;
use regex::Regex;

static IMG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img\s+[^>]*alt=["']([^"']*)["'][^>]*>"#).unwrap());

static SCRIPT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").unwrap()
});

/// Convert an item's HTML body into plain text wrapped at `width` columns.
///
/// Script and style blocks are dropped entirely, images become
/// `[Image: alt]` placeholders, tags are stripped and entities decoded.
/// Trailing blank lines are removed.
pub fn html_to_text(html: &str, width: usize) -> String {
    let without_scripts = SCRIPT_REGEX.replace_all(html, "");
    let with_placeholders = IMG_REGEX.replace_all(&without_scripts, "[Image: $1]");

    let mut bytes = with_placeholders.as_bytes();
    let text = from_read(&mut bytes, width.max(1)).unwrap_or_default();
    text.trim_end().to_string()
}
