use crate::embedder::{EmbedMetadata, EmbedSize, Embedder};
use hive_renderer_security::HtmlEncoder;
use once_cell::sync::Lazy;
use regex::Regex;

static TWITTER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)https?://(?:www\.|mobile\.)?(?:twitter|x)\.com/([A-Za-z0-9_]{1,15})/status(?:es)?/(\d+)(?:[?#][^\s<>"']*)?"#,
    )
    .unwrap()
});

/// Tweets, rendered as the blockquote the Twitter widget script upgrades
#[derive(Debug, Default)]
pub struct TwitterEmbedder;

impl TwitterEmbedder {
    pub fn new() -> Self {
        Self
    }
}

impl Embedder for TwitterEmbedder {
    fn kind(&self) -> &'static str {
        "twitter"
    }

    fn match_url(&self, candidate: &str) -> Option<EmbedMetadata> {
        let caps = TWITTER_PATTERN.captures(candidate)?;
        let id = format!("{}/{}", caps.get(1)?.as_str(), caps.get(2)?.as_str());
        let link = format!("https://twitter.com/{}/status/{}", caps.get(1)?.as_str(), caps.get(2)?.as_str());
        Some(EmbedMetadata::new(caps.get(0)?.as_str(), id).with_link(link))
    }

    fn embed(&self, id: &str, _size: EmbedSize) -> Option<String> {
        let (author, status) = id.split_once('/')?;
        if !status.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let href = format!("https://twitter.com/{}/status/{}", author, status);
        Some(format!(
            r#"<blockquote class="twitter-tweet"><p>Tweet by @{}</p><a href="{}">{}</a></blockquote>"#,
            HtmlEncoder::encode_html(author),
            HtmlEncoder::encode_html_attribute(&href),
            HtmlEncoder::encode_html(&href)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twitter_and_x_hosts() {
        let e = TwitterEmbedder::new();
        assert_eq!(
            e.match_url("https://twitter.com/hiveblocks/status/1234567890").unwrap().id,
            "hiveblocks/1234567890"
        );
        assert_eq!(e.match_url("https://x.com/hiveblocks/status/42?s=20").unwrap().id, "hiveblocks/42");
        assert!(e.embed("hiveblocks/abc", EmbedSize::new(1, 1)).is_none());
    }
}
