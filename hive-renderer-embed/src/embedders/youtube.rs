use crate::embedder::{video_iframe, EmbedMetadata, EmbedSize, Embedder};
use once_cell::sync::Lazy;
use regex::Regex;

static YOUTUBE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)https?://(?:www\.|m\.)?(?:youtube\.com/(?:watch\?(?:[^\s<>"'#]*?&(?:amp;)?)?v=|embed/|shorts/|live/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[?&#][^\s<>"']*)?"#,
    )
    .unwrap()
});

/// youtube.com / youtu.be videos
#[derive(Debug, Default)]
pub struct YoutubeEmbedder;

impl YoutubeEmbedder {
    pub fn new() -> Self {
        Self
    }
}

impl Embedder for YoutubeEmbedder {
    fn kind(&self) -> &'static str {
        "youtube"
    }

    fn match_url(&self, candidate: &str) -> Option<EmbedMetadata> {
        let caps = YOUTUBE_PATTERN.captures(candidate)?;
        let id = caps.get(1)?.as_str();
        Some(
            EmbedMetadata::new(caps.get(0)?.as_str(), id)
                .with_image(format!("https://img.youtube.com/vi/{}/0.jpg", id))
                .with_link(format!("https://www.youtube.com/watch?v={}", id)),
        )
    }

    fn embed(&self, id: &str, size: EmbedSize) -> Option<String> {
        Some(video_iframe(&format!("https://www.youtube.com/embed/{}", id), size))
    }
}
