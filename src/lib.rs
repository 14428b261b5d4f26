// Hive Renderer - safe HTML from untrusted Hive markdown and HTML
//
// This library converts user-authored posts into HTML that can be inserted
// into a page: markdown conversion, allow-list sanitization, phishing link
// detection, media embeds and a final security gate.

// Re-export the rendering pipeline
pub use hive_renderer_core::*;

// Re-export supporting crates
pub use hive_renderer_embed;
pub use hive_renderer_security;

/// Prelude for common imports.
///
/// ```
/// use hive_renderer::prelude::*;
///
/// let renderer = DefaultRenderer::new(RendererOptions::new("https://hive.blog")).unwrap();
/// let html = renderer.render("Hello @alice").unwrap();
/// assert!(html.contains(r#"<a href="/@alice">@alice</a>"#));
/// ```
pub mod prelude {
    pub use hive_renderer_core::{
        DefaultRenderer, LocalizationOptions, RenderError, RenderedDocument, RendererOptions,
        Result, validate_account_name,
    };

    pub use hive_renderer_embed::{
        AssetEmbedder, AssetEmbedderOptions, EmbedMetadata, EmbedSize, Embedder,
    };

    pub use hive_renderer_security::{
        LinkSanitizer, PhishingEntries, PhishingList, SecurityChecker, SecurityOptions,
    };
}
