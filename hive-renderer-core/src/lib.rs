//! # Hive Renderer Core
//!
//! Turns untrusted user content (markdown or HTML) into HTML that is safe to
//! insert into a web page.
//!
//! ## Pipeline
//!
//! 1. Preliminary cleanup of control characters and comments
//! 2. Format detection, markdown conversion when needed
//! 3. Tree pass: embed markers, auto-links, hashtags, mentions
//! 4. Allow-list sanitization with link and image rewriting
//! 5. Security gate
//! 6. Embed marker expansion into media players
//!
//! ## Quick Start
//!
//! ```rust
//! use hive_renderer_core::{DefaultRenderer, RendererOptions};
//!
//! let renderer = DefaultRenderer::new(
//!     RendererOptions::new("https://hive.blog").with_assets_size(640, 480),
//! ).unwrap();
//!
//! let html = renderer.render("Hello **world**").unwrap();
//! assert_eq!(html, "<html><p>Hello <strong>world</strong></p>\n</html>");
//! ```
//!
//! ## Configuration Files
//!
//! Plain options load from TOML or JSON; callables are attached afterwards:
//!
//! ```rust
//! use hive_renderer_core::RendererOptions;
//!
//! let options = RendererOptions::from_toml_str(r#"
//! baseUrl = "https://hive.blog"
//! addTargetBlankToLinks = true
//! "#)
//! .unwrap()
//! .with_image_proxy_fn(|url| format!("https://images.hive.blog/0x0/{}", url));
//!
//! assert!(options.add_target_blank_to_links);
//! ```

pub mod account;
mod dom;
pub mod dom_parser;
pub mod error;
pub mod localization;
pub mod markdown;
pub mod options;
pub mod preliminary;
pub mod renderer;
pub mod sanitizer;

pub use account::validate_account_name;
pub use dom_parser::{HtmlDomParser, RenderedDocument};
pub use error::RenderError;
pub use localization::LocalizationOptions;
pub use markdown::MarkdownRenderer;
pub use options::{RendererOptions, UrlPredicateFn, UrlRewriteFn};
pub use preliminary::PreliminarySanitizer;
pub use renderer::DefaultRenderer;
pub use sanitizer::TagTransformingSanitizer;

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, RenderError>;
