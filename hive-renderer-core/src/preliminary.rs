use once_cell::sync::Lazy;
use regex::Regex;

/// HTML comments, including one left open at the end of the input
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?(?:-->|$)").unwrap());

static PROCESSING_INSTRUCTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<\?.*?(?:\?>|$)").unwrap());

static DOCTYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<!doctype[^>]*>").unwrap());

/// Input cleanup ahead of format detection.
///
/// Normalizes line endings, drops control characters and a leading byte
/// order mark, and removes comments, processing instructions and doctype
/// declarations that would otherwise confuse the markdown and HTML parsers.
pub struct PreliminarySanitizer;

impl PreliminarySanitizer {
    pub fn sanitize(text: &str) -> String {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let text = text.trim_start_matches(['\u{feff}', '\u{200b}']);

        let text: String = text
            .chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect();

        let text = COMMENT.replace_all(&text, "");
        let text = PROCESSING_INSTRUCTION.replace_all(&text, "");
        DOCTYPE.replace_all(&text, "").into_owned()
    }
}
