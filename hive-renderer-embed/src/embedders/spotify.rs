use crate::embedder::{EmbedMetadata, EmbedSize, Embedder};
use hive_renderer_security::HtmlEncoder;
use once_cell::sync::Lazy;
use regex::Regex;

static SPOTIFY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)https?://open\.spotify\.com/(?:embed/)?(playlist|episode|show|track|album|artist)/([A-Za-z0-9]{10,32})(?:[?#][^\s<>"']*)?"#,
    )
    .unwrap()
});

/// Player heights, capped by the configured box.
const COMPACT_HEIGHT: u32 = 152;
const FULL_HEIGHT: u32 = 380;

#[derive(Debug, Default)]
pub struct SpotifyEmbedder;

impl SpotifyEmbedder {
    pub fn new() -> Self {
        Self
    }
}

impl Embedder for SpotifyEmbedder {
    fn kind(&self) -> &'static str {
        "spotify"
    }

    fn match_url(&self, candidate: &str) -> Option<EmbedMetadata> {
        let caps = SPOTIFY_PATTERN.captures(candidate)?;
        let id = format!("{}/{}", caps.get(1)?.as_str().to_lowercase(), caps.get(2)?.as_str());
        let link = format!("https://open.spotify.com/{}", id);
        Some(EmbedMetadata::new(caps.get(0)?.as_str(), id).with_link(link))
    }

    fn embed(&self, id: &str, size: EmbedSize) -> Option<String> {
        let (media, _) = id.split_once('/')?;
        let height = match media {
            "track" | "episode" => COMPACT_HEIGHT,
            _ => FULL_HEIGHT,
        };
        Some(format!(
            r#"<iframe src="https://open.spotify.com/embed/{}" width="{}" height="{}" frameborder="0" allowtransparency="true" allow="encrypted-media"></iframe>"#,
            HtmlEncoder::encode_html_attribute(id),
            size.width,
            height.min(size.height)
        ))
    }
}
