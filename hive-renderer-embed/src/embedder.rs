use std::fmt::Debug;

/// Bounding box for expanded embeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedSize {
    pub width: u32,
    pub height: u32,
}

impl EmbedSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// What a recognizer found for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedMetadata {
    /// Exact substring that was recognized
    pub url: String,
    /// Platform id carried by the marker
    pub id: String,
    /// Preview image, if the platform has one
    pub image: Option<String>,
    /// Canonical outbound link
    pub link: Option<String>,
}

impl EmbedMetadata {
    pub fn new(url: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            id: id.into(),
            image: None,
            link: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// A media platform recognizer.
///
/// Implementations are stateless: anything they need (base URL, sizes) is
/// captured at construction.
pub trait Embedder: Send + Sync + Debug {
    /// Short lowercase platform name used in marker tokens
    fn kind(&self) -> &'static str;

    /// Recognize the first embeddable URL inside `candidate`.
    fn match_url(&self, candidate: &str) -> Option<EmbedMetadata>;

    /// Player markup for `id`, bounded by `size`.
    fn embed(&self, id: &str, size: EmbedSize) -> Option<String>;
}

/// Standard responsive iframe wrapper used by the video platforms
pub(crate) fn video_iframe(src: &str, size: EmbedSize) -> String {
    format!(
        r#"<div class="videoWrapper"><iframe width="{}" height="{}" src="{}" frameborder="0" allowfullscreen="allowfullscreen" webkitallowfullscreen="webkitallowfullscreen" mozallowfullscreen="mozallowfullscreen"></iframe></div>"#,
        size.width,
        size.height,
        hive_renderer_security::HtmlEncoder::encode_html_attribute(src)
    )
}
