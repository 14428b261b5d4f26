use crate::embedder::{EmbedMetadata, EmbedSize, Embedder};
use crate::embedders::{
    SpotifyEmbedder, ThreeSpeakEmbedder, TwitchEmbedder, TwitterEmbedder, VimeoEmbedder,
    YoutubeEmbedder,
};
use crate::error::{EmbedError, Result};
use crate::marker::{replace_markers, EmbedMarker, MarkerNamespace};
use std::collections::HashMap;
use std::sync::Arc;

/// Construction options for [`AssetEmbedder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEmbedderOptions {
    pub width: u32,
    pub height: u32,
    pub base_url: String,
}

impl AssetEmbedderOptions {
    pub fn new(width: u32, height: u32, base_url: impl Into<String>) -> Self {
        Self {
            width,
            height,
            base_url: base_url.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EmbedError::Configuration(format!(
                "embed size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.base_url.trim().is_empty() {
            return Err(EmbedError::Configuration("baseUrl must be a non-empty string".to_string()));
        }
        Ok(())
    }
}

/// Links and images discovered while marking embeds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedLinks {
    pub links: Vec<String>,
    pub images: Vec<String>,
}

impl EmbedLinks {
    fn record(&mut self, metadata: &EmbedMetadata) {
        if let Some(image) = &metadata.image {
            self.images.push(image.clone());
        }
        if let Some(link) = &metadata.link {
            self.links.push(link.clone());
        }
    }

    pub fn extend(&mut self, other: EmbedLinks) {
        self.links.extend(other.links);
        self.images.extend(other.images);
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.images.is_empty()
    }
}

/// Markers issued during one render call.
///
/// Created per render and dropped with it; only tokens issued here are
/// expanded.
#[derive(Debug, Clone)]
pub struct EmbedArena {
    namespace: MarkerNamespace,
    issued: HashMap<String, EmbedMetadata>,
    collected: EmbedLinks,
}

impl EmbedArena {
    pub fn new(namespace: MarkerNamespace) -> Self {
        Self {
            namespace,
            issued: HashMap::new(),
            collected: EmbedLinks::default(),
        }
    }

    pub fn namespace(&self) -> &MarkerNamespace {
        &self.namespace
    }

    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    pub fn metadata(&self, token: &str) -> Option<&EmbedMetadata> {
        self.issued.get(token)
    }

    /// Links and images of every embed marked so far
    pub fn collected(&self) -> &EmbedLinks {
        &self.collected
    }

    fn issue(&mut self, kind: &str, metadata: EmbedMetadata) -> Option<String> {
        let token = self.namespace.token(kind, &metadata.id)?;
        if !self.issued.contains_key(&token) {
            self.collected.record(&metadata);
            self.issued.insert(token.clone(), metadata);
        }
        Some(token)
    }
}

/// Recognizes media URLs and expands them into players
#[derive(Debug, Clone)]
pub struct AssetEmbedder {
    options: AssetEmbedderOptions,
    embedders: Arc<Vec<Box<dyn Embedder>>>,
}

impl AssetEmbedder {
    /// Embedder with the built-in platform set
    pub fn new(options: AssetEmbedderOptions) -> Result<Self> {
        options.validate()?;
        let embedders: Vec<Box<dyn Embedder>> = vec![
            Box::new(YoutubeEmbedder::new()),
            Box::new(VimeoEmbedder::new()),
            Box::new(TwitchEmbedder::new(&options.base_url)?),
            Box::new(SpotifyEmbedder::new()),
            Box::new(ThreeSpeakEmbedder::new()),
            Box::new(TwitterEmbedder::new()),
        ];
        Self::with_embedders(options, embedders)
    }

    /// Embedder with a caller supplied platform set
    pub fn with_embedders(options: AssetEmbedderOptions, embedders: Vec<Box<dyn Embedder>>) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            embedders: Arc::new(embedders),
        })
    }

    pub fn options(&self) -> &AssetEmbedderOptions {
        &self.options
    }

    pub fn size(&self) -> EmbedSize {
        EmbedSize::new(self.options.width, self.options.height)
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.embedders.iter().map(|e| e.kind()).collect()
    }

    /// Fresh arena for rendering `input`
    pub fn new_arena(&self, input: &str) -> EmbedArena {
        EmbedArena::new(MarkerNamespace::for_input(input))
    }

    /// Recognition pass: replace every recognized URL in `text` with its marker.
    pub fn mark_text(&self, text: &str, arena: &mut EmbedArena) -> String {
        self.mark_text_with_links(text, arena).0
    }

    /// Recognition pass that also returns the links and images of what it found.
    pub fn mark_text_with_links(&self, text: &str, arena: &mut EmbedArena) -> (String, EmbedLinks) {
        let mut out = text.to_string();
        let mut found = EmbedLinks::default();

        for embedder in self.embedders.iter() {
            let mut cursor = 0;
            while cursor < out.len() {
                let Some(metadata) = embedder.match_url(&out[cursor..]) else {
                    break;
                };
                let Some(offset) = out[cursor..].find(&metadata.url) else {
                    break;
                };
                let start = cursor + offset;
                let end = start + metadata.url.len();

                match arena.issue(embedder.kind(), metadata.clone()) {
                    Some(token) => {
                        tracing::trace!(kind = embedder.kind(), id = %metadata.id, "embed marker inserted");
                        found.record(&metadata);
                        out.replace_range(start..end, &token);
                        cursor = start + token.len();
                    }
                    None => cursor = end,
                }
            }
        }

        (out, found)
    }

    /// Marker for `url` when some embedder recognizes the whole of it.
    ///
    /// Used for `iframe`/`embed`/`object` sources, where a partial match must
    /// not leave the rest of the element behind.
    pub fn mark_url(&self, url: &str, arena: &mut EmbedArena) -> Option<(String, EmbedLinks)> {
        let url = url.trim();
        for embedder in self.embedders.iter() {
            let Some(metadata) = embedder.match_url(url) else {
                continue;
            };
            if metadata.url != url {
                continue;
            }
            let mut found = EmbedLinks::default();
            found.record(&metadata);
            let token = arena.issue(embedder.kind(), metadata)?;
            return Some((token, found));
        }
        None
    }

    /// Expansion pass at the configured size.
    pub fn insert_assets(&self, text: &str, arena: &EmbedArena) -> String {
        self.insert_marked_embeds(text, arena, self.size())
    }

    /// Expansion pass: every marker becomes player markup, unknown markers
    /// become empty text.
    pub fn insert_marked_embeds(&self, text: &str, arena: &EmbedArena, size: EmbedSize) -> String {
        replace_markers(text, |marker| self.expand_marker(marker, arena, size).unwrap_or_default())
    }

    fn expand_marker(&self, marker: &EmbedMarker, arena: &EmbedArena, size: EmbedSize) -> Option<String> {
        if marker.nonce != arena.namespace().nonce() || arena.metadata(&marker.to_string()).is_none() {
            tracing::debug!(kind = %marker.kind, "dropping orphaned embed marker");
            return None;
        }
        let embedder = self.embedders.iter().find(|e| e.kind() == marker.kind)?;
        tracing::trace!(kind = %marker.kind, id = %marker.id, "embed marker expanded");
        embedder.embed(&marker.id, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedder() -> AssetEmbedder {
        AssetEmbedder::new(AssetEmbedderOptions::new(640, 480, "https://hive.blog")).unwrap()
    }

    #[test]
    fn test_invalid_options() {
        assert!(AssetEmbedder::new(AssetEmbedderOptions::new(0, 480, "https://hive.blog")).is_err());
        assert!(AssetEmbedder::new(AssetEmbedderOptions::new(640, 0, "https://hive.blog")).is_err());
        assert!(AssetEmbedder::new(AssetEmbedderOptions::new(640, 480, "")).is_err());
    }

    #[test]
    fn test_same_url_same_marker() {
        let e = embedder();
        let mut arena = e.new_arena("input");
        let text = "https://youtu.be/dQw4w9WgXcQ and again https://youtu.be/dQw4w9WgXcQ";
        let marked = e.mark_text(text, &mut arena);

        let token = arena.namespace().token("youtube", "dQw4w9WgXcQ").unwrap();
        assert_eq!(marked, format!("{} and again {}", token, token));
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.collected().images.len(), 1);
    }

    #[test]
    fn test_marking_is_rerunnable() {
        let e = embedder();
        let mut arena = e.new_arena("input");
        let once = e.mark_text("see https://vimeo.com/76979871", &mut arena);
        let twice = e.mark_text(&once, &mut arena);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_mark_then_expand() {
        let e = embedder();
        let mut arena = e.new_arena("input");
        let marked = e.mark_text("<p>https://www.youtube.com/watch?v=dQw4w9WgXcQ</p>", &mut arena);
        let html = e.insert_assets(&marked, &arena);

        assert!(html.contains(r#"src="https://www.youtube.com/embed/dQw4w9WgXcQ""#));
        assert!(html.contains(r#"width="640""#));
        assert!(!crate::marker::contains_marker(&html));
    }

    #[test]
    fn test_foreign_markers_expand_to_nothing() {
        let e = embedder();
        let arena = e.new_arena("input");
        let forged = MarkerNamespace::for_input("other").token("youtube", "dQw4w9WgXcQ").unwrap();
        let out = e.insert_assets(&format!("<p>a{}b</p>", forged), &arena);
        assert_eq!(out, "<p>ab</p>");
    }

    #[test]
    fn test_mark_whole_url() {
        let e = embedder();
        let mut arena = e.new_arena("input");

        let (token, _) = e.mark_url(" https://www.youtube.com/embed/dQw4w9WgXcQ ", &mut arena).unwrap();
        assert_eq!(token, arena.namespace().token("youtube", "dQw4w9WgXcQ").unwrap());

        assert!(e.mark_url("https://evil.test/?u=https://youtu.be/dQw4w9WgXcQ", &mut arena).is_none());
    }

    #[test]
    fn test_side_channel_links() {
        let e = embedder();
        let mut arena = e.new_arena("input");
        let (_, links) = e.mark_text_with_links("https://open.spotify.com/album/1DFixLWuPkv3KT3TnV35m3", &mut arena);
        assert_eq!(links.links, vec!["https://open.spotify.com/album/1DFixLWuPkv3KT3TnV35m3".to_string()]);
        assert!(links.images.is_empty());
    }
}
