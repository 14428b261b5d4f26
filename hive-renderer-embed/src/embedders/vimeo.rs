use crate::embedder::{video_iframe, EmbedMetadata, EmbedSize, Embedder};
use once_cell::sync::Lazy;
use regex::Regex;

static VIMEO_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)https?://(?:www\.|player\.)?vimeo\.com/(?:video/)?(\d+)(?:[?#][^\s<>"']*)?"#).unwrap()
});

#[derive(Debug, Default)]
pub struct VimeoEmbedder;

impl VimeoEmbedder {
    pub fn new() -> Self {
        Self
    }
}

impl Embedder for VimeoEmbedder {
    fn kind(&self) -> &'static str {
        "vimeo"
    }

    fn match_url(&self, candidate: &str) -> Option<EmbedMetadata> {
        let caps = VIMEO_PATTERN.captures(candidate)?;
        let id = caps.get(1)?.as_str();
        Some(
            EmbedMetadata::new(caps.get(0)?.as_str(), id)
                .with_link(format!("https://vimeo.com/{}", id)),
        )
    }

    fn embed(&self, id: &str, size: EmbedSize) -> Option<String> {
        if !id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(video_iframe(&format!("https://player.vimeo.com/video/{}", id), size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match() {
        let e = VimeoEmbedder::new();
        assert_eq!(e.match_url("https://vimeo.com/76979871").unwrap().id, "76979871");
        assert_eq!(e.match_url("https://player.vimeo.com/video/76979871?h=1").unwrap().id, "76979871");
        assert!(e.match_url("https://vimeo.com/channels").is_none());
    }
}
