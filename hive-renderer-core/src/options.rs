//! Renderer configuration
//!
//! Plain fields deserialize from TOML or JSON with camelCase keys. Callables
//! cannot be serialized and are attached with the `with_*` builders.

use crate::error::RenderError;
use crate::Result;
use hive_renderer_security::HtmlEncoder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Rewrites a URL or tag into a URL
pub type UrlRewriteFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Classifies a URL
pub type UrlPredicateFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

fn default_true() -> bool {
    true
}

fn default_assets_width() -> u32 {
    640
}

fn default_assets_height() -> u32 {
    480
}

fn default_image_proxy_fn() -> UrlRewriteFn {
    Arc::new(|url: &str| url.to_string())
}

fn default_hashtag_url_fn() -> UrlRewriteFn {
    Arc::new(|tag: &str| format!("/trending/{}", HtmlEncoder::encode_url_component(tag)))
}

fn default_usertag_url_fn() -> UrlRewriteFn {
    Arc::new(|account: &str| format!("/@{}", HtmlEncoder::encode_url_component(account)))
}

/// Construction options for [`DefaultRenderer`](crate::DefaultRenderer)
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererOptions {
    /// Site URL; its top level domain decides what counts as internal
    pub base_url: String,

    /// Single newlines become `<br>`
    #[serde(default)]
    pub breaks: bool,

    /// Skip the allow-list sanitizer. The security gate still runs.
    #[serde(default)]
    pub skip_sanitization: bool,

    /// Disable the security gate's script tag rule
    #[serde(default)]
    pub allow_insecure_script_tags: bool,

    #[serde(default = "default_true")]
    pub add_nofollow_to_links: bool,

    #[serde(default)]
    pub add_target_blank_to_links: bool,

    #[serde(default)]
    pub css_class_for_internal_links: Option<String>,

    #[serde(default)]
    pub css_class_for_external_links: Option<String>,

    /// Replace every image with the localized placeholder
    #[serde(default)]
    pub do_not_show_images: bool,

    /// Gateway used to resolve `ipfs://` image sources
    #[serde(default)]
    pub ipfs_prefix: Option<String>,

    #[serde(default = "default_assets_width")]
    pub assets_width: u32,

    #[serde(default = "default_assets_height")]
    pub assets_height: u32,

    #[serde(skip, default = "default_image_proxy_fn")]
    pub image_proxy_fn: UrlRewriteFn,

    #[serde(skip, default = "default_hashtag_url_fn")]
    pub hashtag_url_fn: UrlRewriteFn,

    #[serde(skip, default = "default_usertag_url_fn")]
    pub usertag_url_fn: UrlRewriteFn,

    /// Defaults to "relative or on our top level domain"
    #[serde(skip)]
    pub is_link_safe_fn: Option<UrlPredicateFn>,

    /// Defaults to the negation of the link safety check
    #[serde(skip)]
    pub add_external_css_class_to_matching_links_fn: Option<UrlPredicateFn>,
}

impl RendererOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            breaks: false,
            skip_sanitization: false,
            allow_insecure_script_tags: false,
            add_nofollow_to_links: true,
            add_target_blank_to_links: false,
            css_class_for_internal_links: None,
            css_class_for_external_links: None,
            do_not_show_images: false,
            ipfs_prefix: None,
            assets_width: default_assets_width(),
            assets_height: default_assets_height(),
            image_proxy_fn: default_image_proxy_fn(),
            hashtag_url_fn: default_hashtag_url_fn(),
            usertag_url_fn: default_usertag_url_fn(),
            is_link_safe_fn: None,
            add_external_css_class_to_matching_links_fn: None,
        }
    }

    /// Parse and validate options from TOML.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let options: Self = toml::from_str(toml)
            .map_err(|e| RenderError::Configuration(format!("TOML parse error: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Parse and validate options from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| RenderError::Configuration(format!("JSON parse error: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(RenderError::Configuration(
                "baseUrl must be a non-empty string".to_string(),
            ));
        }
        Url::parse(&self.base_url).map_err(|e| {
            RenderError::Configuration(format!("baseUrl {:?} is not a valid URL: {}", self.base_url, e))
        })?;

        if self.assets_width == 0 || self.assets_height == 0 {
            return Err(RenderError::Configuration(format!(
                "assetsWidth and assetsHeight must be positive, got {}x{}",
                self.assets_width, self.assets_height
            )));
        }

        for (name, class) in [
            ("cssClassForInternalLinks", &self.css_class_for_internal_links),
            ("cssClassForExternalLinks", &self.css_class_for_external_links),
        ] {
            if matches!(class, Some(c) if c.trim().is_empty()) {
                return Err(RenderError::Configuration(format!(
                    "{} must not be empty when set",
                    name
                )));
            }
        }

        if let Some(prefix) = &self.ipfs_prefix {
            let valid = Url::parse(prefix)
                .map(|u| matches!(u.scheme(), "http" | "https"))
                .unwrap_or(false);
            if !valid {
                return Err(RenderError::Configuration(format!(
                    "ipfsPrefix {:?} must be an http(s) URL",
                    prefix
                )));
            }
        }

        Ok(())
    }

    pub fn with_breaks(mut self, breaks: bool) -> Self {
        self.breaks = breaks;
        self
    }

    pub fn with_skip_sanitization(mut self, skip: bool) -> Self {
        self.skip_sanitization = skip;
        self
    }

    pub fn with_allow_insecure_script_tags(mut self, allow: bool) -> Self {
        self.allow_insecure_script_tags = allow;
        self
    }

    pub fn with_nofollow(mut self, enabled: bool) -> Self {
        self.add_nofollow_to_links = enabled;
        self
    }

    pub fn with_target_blank(mut self, enabled: bool) -> Self {
        self.add_target_blank_to_links = enabled;
        self
    }

    pub fn with_internal_link_class(mut self, class: impl Into<String>) -> Self {
        self.css_class_for_internal_links = Some(class.into());
        self
    }

    pub fn with_external_link_class(mut self, class: impl Into<String>) -> Self {
        self.css_class_for_external_links = Some(class.into());
        self
    }

    pub fn with_images_hidden(mut self, hidden: bool) -> Self {
        self.do_not_show_images = hidden;
        self
    }

    pub fn with_ipfs_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ipfs_prefix = Some(prefix.into());
        self
    }

    pub fn with_assets_size(mut self, width: u32, height: u32) -> Self {
        self.assets_width = width;
        self.assets_height = height;
        self
    }

    pub fn with_image_proxy_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.image_proxy_fn = Arc::new(f);
        self
    }

    pub fn with_hashtag_url_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.hashtag_url_fn = Arc::new(f);
        self
    }

    pub fn with_usertag_url_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.usertag_url_fn = Arc::new(f);
        self
    }

    pub fn with_link_safe_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.is_link_safe_fn = Some(Arc::new(f));
        self
    }

    pub fn with_external_css_class_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.add_external_css_class_to_matching_links_fn = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for RendererOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererOptions")
            .field("base_url", &self.base_url)
            .field("breaks", &self.breaks)
            .field("skip_sanitization", &self.skip_sanitization)
            .field("allow_insecure_script_tags", &self.allow_insecure_script_tags)
            .field("add_nofollow_to_links", &self.add_nofollow_to_links)
            .field("add_target_blank_to_links", &self.add_target_blank_to_links)
            .field("css_class_for_internal_links", &self.css_class_for_internal_links)
            .field("css_class_for_external_links", &self.css_class_for_external_links)
            .field("do_not_show_images", &self.do_not_show_images)
            .field("ipfs_prefix", &self.ipfs_prefix)
            .field("assets_width", &self.assets_width)
            .field("assets_height", &self.assets_height)
            .field("is_link_safe_fn", &self.is_link_safe_fn.is_some())
            .field(
                "add_external_css_class_to_matching_links_fn",
                &self.add_external_css_class_to_matching_links_fn.is_some(),
            )
            .finish_non_exhaustive()
    }
}
