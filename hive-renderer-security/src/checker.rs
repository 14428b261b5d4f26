use crate::error::{Result, SecurityError};
use once_cell::sync::Lazy;
use regex::Regex;

/// Options for a security gate run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecurityOptions {
    /// Let literal `<script` tags through
    pub allow_script_tag: bool,
}

impl SecurityOptions {
    pub fn new(allow_script_tag: bool) -> Self {
        Self { allow_script_tag }
    }
}

/// Final, allow-list independent verification of rendered HTML
pub struct SecurityChecker;

static SCRIPT_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*/?\s*script\b").unwrap());

/// A start tag with its attributes. Quoted values are consumed whole so a
/// `<` or `on...=` inside them is never read as markup.
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<[a-zA-Z][^\s/>]*(?:[\s/]+[^\s"'=<>/]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?)*[\s/]*>?"#,
    )
    .unwrap()
});

static ATTRIBUTE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[\s/]([^\s"'=<>/]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#).unwrap()
});

static EVENT_HANDLER_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^on[a-z]+$").unwrap());

const URL_ATTRIBUTES: &[&str] = &["href", "src", "action", "formaction", "data", "xlink:href"];

const SCRIPT_SCHEMES: &[&str] = &["javascript:", "vbscript:", "livescript:"];

const SCRIPT_URL: &str = "text contains a script URL in an attribute";
const EVENT_HANDLER: &str = "text contains an inline event handler";

impl SecurityChecker {
    /// Full rule set, run over sanitized output.
    pub fn check_security(text: &str, options: &SecurityOptions) -> Result<()> {
        Self::check_script_tags(text, options)?;

        let attributes = attributes(text);
        if attributes.iter().any(|(name, value)| is_script_url(name, value)) {
            return Err(Self::violation(SCRIPT_URL));
        }
        if attributes.iter().any(|(name, _)| EVENT_HANDLER_NAME.is_match(name)) {
            return Err(Self::violation(EVENT_HANDLER));
        }
        Ok(())
    }

    /// Script tag rule only.
    pub fn check_script_tags(text: &str, options: &SecurityOptions) -> Result<()> {
        if !options.allow_script_tag && SCRIPT_TAG_PATTERN.is_match(text) {
            return Err(Self::violation("text contains script tag"));
        }
        Ok(())
    }

    /// Name of the first rule `text` breaks, ignoring options
    pub fn detect_violation(text: &str) -> Option<&'static str> {
        if SCRIPT_TAG_PATTERN.is_match(text) {
            return Some("Script tag");
        }
        let attributes = attributes(text);
        if attributes.iter().any(|(name, value)| is_script_url(name, value)) {
            return Some("Script URL");
        }
        if attributes.iter().any(|(name, _)| EVENT_HANDLER_NAME.is_match(name)) {
            return Some("Event handler attribute");
        }
        None
    }

    fn violation(reason: &str) -> SecurityError {
        tracing::warn!(reason, "security gate rejected rendered output");
        SecurityError::SecurityViolation(reason.to_string())
    }
}

/// `(lowercased name, value)` of every attribute of every tag in `text`.
fn attributes(text: &str) -> Vec<(String, &str)> {
    TAG_PATTERN
        .find_iter(text)
        .flat_map(|tag| ATTRIBUTE_PATTERN.captures_iter(tag.as_str()))
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            Some((name, value))
        })
        .collect()
}

/// Browsers ignore whitespace and control characters inside the scheme.
fn is_script_url(name: &str, value: &str) -> bool {
    if !URL_ATTRIBUTES.contains(&name) {
        return false;
    }
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .flat_map(char::to_lowercase)
        .collect();
    SCRIPT_SCHEMES.iter().any(|scheme| compact.starts_with(scheme))
}
