use crate::dom_parser::{HtmlDomParser, RenderedDocument};
use crate::error::RenderError;
use crate::localization::LocalizationOptions;
use crate::markdown::MarkdownRenderer;
use crate::options::RendererOptions;
use crate::preliminary::PreliminarySanitizer;
use crate::sanitizer::TagTransformingSanitizer;
use crate::Result;
use hive_renderer_security::{PhishingList, SecurityChecker, SecurityOptions};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static HTML_DOCUMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<html>(?s:.*)</html>$").unwrap());

static HTML_PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<p>(?s:.*)</p>").unwrap());

/// Markdown/HTML to safe HTML.
///
/// Immutable after construction; `render` may be called concurrently from
/// any number of threads.
#[derive(Clone)]
pub struct DefaultRenderer {
    options: RendererOptions,
    markdown: MarkdownRenderer,
    dom_parser: HtmlDomParser,
    sanitizer: TagTransformingSanitizer,
    security: SecurityOptions,
}

impl std::fmt::Debug for DefaultRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultRenderer")
            .field("options", &self.options)
            .field("security", &self.security)
            .finish_non_exhaustive()
    }
}

impl DefaultRenderer {
    /// Renderer with default localization and the built-in phishing list.
    pub fn new(options: RendererOptions) -> Result<Self> {
        Self::with_localization(options, LocalizationOptions::default())
    }

    pub fn with_localization(options: RendererOptions, localization: LocalizationOptions) -> Result<Self> {
        Self::with_phishing_list(options, localization, Arc::new(PhishingList::with_defaults()))
    }

    /// Renderer sharing `phishing` with its owner, who may replace the list
    /// while renders are in flight.
    pub fn with_phishing_list(
        options: RendererOptions,
        localization: LocalizationOptions,
        phishing: Arc<PhishingList>,
    ) -> Result<Self> {
        options.validate()?;
        localization.validate()?;

        let dom_parser = HtmlDomParser::new(&options, localization.clone())?;
        let sanitizer = TagTransformingSanitizer::new(&options, localization, phishing)?;
        tracing::debug!(base_url = %options.base_url, "renderer created");

        Ok(Self {
            markdown: MarkdownRenderer::new(options.breaks),
            security: SecurityOptions::new(options.allow_insecure_script_tags),
            options,
            dom_parser,
            sanitizer,
        })
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    /// Render untrusted markdown or HTML into safe HTML.
    pub fn render(&self, input: &str) -> Result<String> {
        self.render_document(input).map(|doc| doc.html)
    }

    /// Render and also report the links, images, hashtags and mentions found.
    pub fn render_document(&self, input: &str) -> Result<RenderedDocument> {
        if input.trim().is_empty() {
            return Err(RenderError::InvalidInput(
                "input must be a non-empty string".to_string(),
            ));
        }

        let embedder = self.dom_parser.embedder();
        let mut arena = embedder.new_arena(input);

        let text = PreliminarySanitizer::sanitize(input);
        let text = if Self::is_html(&text) {
            tracing::debug!("input detected as HTML");
            text
        } else {
            tracing::debug!("input detected as markdown");
            self.markdown.render(&text)
        };
        let text = Self::wrap_render_result(&text);

        // The allow-list drops script elements, so the script rule looks at
        // the converted document first
        SecurityChecker::check_script_tags(&text, &self.security)?;

        let mut doc = self.dom_parser.parse(&text, &mut arena);

        let sanitized = if self.options.skip_sanitization {
            tracing::debug!("sanitization skipped");
            doc.html.clone()
        } else {
            self.sanitizer.sanitize(&doc.html)
        };
        SecurityChecker::check_security(&sanitized, &self.security)?;

        doc.html = embedder.insert_assets(&sanitized, &arena);
        tracing::debug!(
            input_len = input.len(),
            output_len = doc.html.len(),
            embeds = arena.len(),
            "render complete"
        );
        Ok(doc)
    }

    /// Input is treated as HTML when wrapped in `<html>` or starting with a paragraph.
    pub fn is_html(text: &str) -> bool {
        HTML_DOCUMENT.is_match(text) || HTML_PARAGRAPH.is_match(text)
    }

    fn wrap_render_result(text: &str) -> String {
        if text.starts_with("<html>") {
            text.to_string()
        } else {
            format!("<html>{}</html>", text)
        }
    }
}
