//! Embed marker tokens.
//!
//! A recognized media URL is replaced by a plain-text token that passes
//! through the sanitizer untouched and is expanded into player markup at the
//! very end of a render:
//!
//! ```text
//! ~~~ embed:<nonce>:<kind>:<id> ~~~
//! ```
//!
//! The nonce is derived from the render input, so a token typed by a user
//! cannot carry the nonce of the render it appears in.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::fmt;

const NONCE_LEN: usize = 16;

static MARKER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"~~~ embed:([0-9a-f]{16}):([a-z0-9]+):([A-Za-z0-9_./=-]+) ~~~").unwrap()
});

static ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_./=-]+$").unwrap());

/// True if `id` only uses characters a marker can carry
pub fn is_valid_marker_id(id: &str) -> bool {
    ID_PATTERN.is_match(id)
}

/// Per-render namespace for marker tokens
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerNamespace(String);

impl MarkerNamespace {
    /// Namespace for the render of `input`
    pub fn for_input(input: &str) -> Self {
        let digest = Sha256::digest(input.as_bytes());
        let mut nonce = hex::encode(digest);
        nonce.truncate(NONCE_LEN);
        Self(nonce)
    }

    pub fn nonce(&self) -> &str {
        &self.0
    }

    /// Token for `(kind, id)`. Returns `None` for ids a token cannot carry.
    pub fn token(&self, kind: &str, id: &str) -> Option<String> {
        if !is_valid_marker_id(id) || kind.is_empty() || !kind.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()) {
            return None;
        }
        Some(EmbedMarker::new(self.0.clone(), kind, id).to_string())
    }
}

/// Decoded marker token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedMarker {
    pub nonce: String,
    pub kind: String,
    pub id: String,
}

impl EmbedMarker {
    pub fn new(nonce: impl Into<String>, kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            nonce: nonce.into(),
            kind: kind.into(),
            id: id.into(),
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        let caps = MARKER_PATTERN.captures(token)?;
        let whole = caps.get(0)?;
        if whole.start() != 0 || whole.end() != token.len() {
            return None;
        }
        Some(Self::new(&caps[1], &caps[2], &caps[3]))
    }
}

impl fmt::Display for EmbedMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~~~ embed:{}:{}:{} ~~~", self.nonce, self.kind, self.id)
    }
}

/// Replace every marker-shaped token in `text` with `expand(marker)`.
pub fn replace_markers<F>(text: &str, mut expand: F) -> String
where
    F: FnMut(&EmbedMarker) -> String,
{
    MARKER_PATTERN
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let marker = EmbedMarker::new(&caps[1], &caps[2], &caps[3]);
            expand(&marker)
        })
        .into_owned()
}

/// True if `text` still holds anything that looks like a marker
pub fn contains_marker(text: &str) -> bool {
    MARKER_PATTERN.is_match(text)
}
