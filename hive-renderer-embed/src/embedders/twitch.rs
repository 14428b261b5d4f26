use crate::embedder::{video_iframe, EmbedMetadata, EmbedSize, Embedder};
use crate::error::{EmbedError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static TWITCH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)https?://(?:www\.|player\.)?twitch\.tv/(?:\?channel=([A-Za-z0-9_]{3,25})|\?video=v?(\d+)|videos/(\d+)|([A-Za-z0-9_]{3,25}))(?:[?&#][^\s<>"']*)?"#,
    )
    .unwrap()
});

/// Twitch channels and VODs.
///
/// The Twitch player refuses to load unless the embedding host is passed as
/// `parent`, so the embedder is bound to the site's base URL.
#[derive(Debug)]
pub struct TwitchEmbedder {
    parent_domain: String,
}

impl TwitchEmbedder {
    pub fn new(base_url: &str) -> Result<Self> {
        let parent_domain = Url::parse(base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .ok_or_else(|| {
                EmbedError::Configuration(format!("cannot derive twitch parent from '{}'", base_url))
            })?;
        Ok(Self { parent_domain })
    }

    pub fn parent_domain(&self) -> &str {
        &self.parent_domain
    }
}

impl Embedder for TwitchEmbedder {
    fn kind(&self) -> &'static str {
        "twitch"
    }

    fn match_url(&self, candidate: &str) -> Option<EmbedMetadata> {
        let caps = TWITCH_PATTERN.captures(candidate)?;
        let url = caps.get(0)?.as_str();

        let (id, link) = if let Some(channel) = caps.get(1).or_else(|| caps.get(4)) {
            let channel = channel.as_str().to_lowercase();
            if matches!(channel.as_str(), "directory" | "videos" | "search" | "settings" | "downloads") {
                return None;
            }
            (format!("channel={}", channel), format!("https://www.twitch.tv/{}", channel))
        } else {
            let video = caps.get(2).or_else(|| caps.get(3))?.as_str();
            (format!("video=v{}", video), format!("https://www.twitch.tv/videos/{}", video))
        };

        Some(EmbedMetadata::new(url, id).with_link(link))
    }

    fn embed(&self, id: &str, size: EmbedSize) -> Option<String> {
        if !(id.starts_with("channel=") || id.starts_with("video=")) {
            return None;
        }
        let src = format!("https://player.twitch.tv/?{}&parent={}", id, self.parent_domain);
        Some(video_iframe(&src, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_and_video() {
        let e = TwitchEmbedder::new("https://hive.blog").unwrap();
        assert_eq!(e.match_url("https://www.twitch.tv/Shroud").unwrap().id, "channel=shroud");
        assert_eq!(e.match_url("https://www.twitch.tv/videos/1234567").unwrap().id, "video=v1234567");
        assert_eq!(
            e.match_url("https://player.twitch.tv/?channel=shroud&parent=x.com").unwrap().id,
            "channel=shroud"
        );
        assert!(e.match_url("https://www.twitch.tv/directory").is_none());
    }

    #[test]
    fn test_parent_in_embed() {
        let e = TwitchEmbedder::new("https://hive.blog/trending").unwrap();
        let html = e.embed("channel=shroud", EmbedSize::new(640, 360)).unwrap();
        assert!(html.contains("parent=hive.blog"));
        assert!(html.contains("channel=shroud"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(TwitchEmbedder::new("not a url").is_err());
    }
}
