use crate::embedder::{video_iframe, EmbedMetadata, EmbedSize, Embedder};
use once_cell::sync::Lazy;
use regex::Regex;

static THREE_SPEAK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)https?://(?:www\.)?3speak\.(?:tv|online|co)/(?:watch|embed)\?v=([a-z0-9.-]{3,16}/[A-Za-z0-9_-]+)(?:[&#][^\s<>"']*)?"#,
    )
    .unwrap()
});

/// 3Speak videos, addressed as `author/permlink`
#[derive(Debug, Default)]
pub struct ThreeSpeakEmbedder;

impl ThreeSpeakEmbedder {
    pub fn new() -> Self {
        Self
    }
}

impl Embedder for ThreeSpeakEmbedder {
    fn kind(&self) -> &'static str {
        "threespeak"
    }

    fn match_url(&self, candidate: &str) -> Option<EmbedMetadata> {
        let caps = THREE_SPEAK_PATTERN.captures(candidate)?;
        let id = caps.get(1)?.as_str();
        Some(
            EmbedMetadata::new(caps.get(0)?.as_str(), id)
                .with_link(format!("https://3speak.tv/watch?v={}", id)),
        )
    }

    fn embed(&self, id: &str, size: EmbedSize) -> Option<String> {
        Some(video_iframe(&format!("https://3speak.tv/embed?v={}", id), size))
    }
}
