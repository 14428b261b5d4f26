use crate::dom;
use crate::localization::LocalizationOptions;
use crate::options::{RendererOptions, UrlPredicateFn, UrlRewriteFn};
use crate::Result;
use ammonia::Builder;
use hive_renderer_security::{LinkSanitizer, LinkSanitizerOptions, LinkVerdict, PhishingList};
use markup5ever_rcdom::Handle;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Elements that survive sanitization
pub const ALLOWED_TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "center", "code", "del", "div", "em", "h1", "h2", "h3", "h4",
    "h5", "h6", "hr", "i", "img", "li", "ol", "p", "pre", "q", "span", "strike", "strong", "sub",
    "sup", "table", "tbody", "td", "th", "thead", "tr", "ul",
];

/// Layout classes authors may put on `div`
pub const DIV_CLASSES: &[&str] = &[
    "pull-right",
    "pull-left",
    "text-justify",
    "text-rtl",
    "text-center",
    "text-right",
    "videoWrapper",
];

pub const URL_SCHEMES: &[&str] = &["http", "https", "hive"];

static TEXT_ALIGN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*text-align\s*:\s*(?:left|right|center)\s*;?\s*$").unwrap());

/// Allow-list sanitizer that also rewrites links and images.
///
/// Runs in two steps: `ammonia` drops everything outside the allow-list,
/// then a tree pass evaluates each link against the phishing rules,
/// decorates external links and routes image sources through the proxy.
/// Sanitizing already sanitized output returns it unchanged as long as the
/// image proxy is idempotent.
#[derive(Clone)]
pub struct TagTransformingSanitizer {
    links: LinkSanitizer,
    localization: LocalizationOptions,
    internal_class: Option<String>,
    external_class: Option<String>,
    add_nofollow: bool,
    add_target_blank: bool,
    hide_images: bool,
    image_proxy_fn: UrlRewriteFn,
    is_link_safe_fn: Option<UrlPredicateFn>,
    add_external_css_class_to_matching_links_fn: Option<UrlPredicateFn>,
}

impl TagTransformingSanitizer {
    pub fn new(
        options: &RendererOptions,
        localization: LocalizationOptions,
        phishing: Arc<PhishingList>,
    ) -> Result<Self> {
        let links = LinkSanitizer::new(&LinkSanitizerOptions::new(options.base_url.clone()), phishing)?;

        Ok(Self {
            links,
            localization,
            internal_class: options.css_class_for_internal_links.clone(),
            external_class: options.css_class_for_external_links.clone(),
            add_nofollow: options.add_nofollow_to_links,
            add_target_blank: options.add_target_blank_to_links,
            hide_images: options.do_not_show_images,
            image_proxy_fn: options.image_proxy_fn.clone(),
            is_link_safe_fn: options.is_link_safe_fn.clone(),
            add_external_css_class_to_matching_links_fn: options
                .add_external_css_class_to_matching_links_fn
                .clone(),
        })
    }

    pub fn link_sanitizer(&self) -> &LinkSanitizer {
        &self.links
    }

    /// Sanitize HTML, keeping an `<html>...</html>` wrapper if present.
    pub fn sanitize(&self, html: &str) -> String {
        let (inner, wrapped) = match html.strip_prefix("<html>").and_then(|s| s.strip_suffix("</html>")) {
            Some(inner) => (inner, true),
            None => (html, false),
        };

        let cleaned = self.builder().clean(inner).to_string();
        let transformed = self.transform(&cleaned);
        tracing::debug!(input_len = html.len(), output_len = transformed.len(), "HTML sanitized");

        if wrapped {
            format!("<html>{}</html>", transformed)
        } else {
            transformed
        }
    }

    fn builder(&self) -> Builder<'_> {
        let mut tag_attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
        tag_attributes.insert("a", HashSet::from(["href", "rel", "title", "target"]));
        tag_attributes.insert("img", HashSet::from(["src", "alt"]));
        tag_attributes.insert("span", HashSet::from(["title"]));
        tag_attributes.insert("td", HashSet::from(["style"]));
        tag_attributes.insert("th", HashSet::from(["style"]));

        let mut classes: HashMap<&str, HashSet<&str>> = HashMap::new();
        classes.insert("div", DIV_CLASSES.iter().copied().collect());
        classes.insert("span", HashSet::from(["phishy"]));
        let link_classes: HashSet<&str> = [&self.internal_class, &self.external_class]
            .into_iter()
            .flatten()
            .flat_map(|class| class.split_whitespace())
            .collect();
        if !link_classes.is_empty() {
            classes.insert("a", link_classes);
        }

        let mut builder = Builder::default();
        builder
            .tags(ALLOWED_TAGS.iter().copied().collect())
            .clean_content_tags(HashSet::from(["script", "style"]))
            .generic_attributes(HashSet::new())
            .tag_attributes(tag_attributes)
            .allowed_classes(classes)
            .url_schemes(URL_SCHEMES.iter().copied().collect())
            .link_rel(None)
            .strip_comments(true)
            .attribute_filter(filter_attribute);
        builder
    }

    fn transform(&self, html: &str) -> String {
        let (_dom, root) = dom::parse_fragment_root(html);
        let Some(root) = root else {
            return html.to_string();
        };
        self.transform_children(&root);
        dom::serialize_children(&root)
    }

    fn transform_children(&self, node: &Handle) {
        for child in dom::children_of(node) {
            match dom::element_name(&child).as_deref() {
                Some("a") => self.transform_anchor(&child),
                Some("img") => self.transform_image(&child),
                Some(_) => self.transform_children(&child),
                None => {}
            }
        }
    }

    fn transform_anchor(&self, anchor: &Handle) {
        self.transform_children(anchor);

        let Some(href) = dom::get_attr(anchor, "href") else {
            return;
        };
        let text = dom::text_content(anchor);

        match self.links.evaluate(&href, &text) {
            LinkVerdict::Safe(url) => self.decorate_link(anchor, &url),
            LinkVerdict::Rejected(reason) => {
                tracing::warn!(url = %href, ?reason, "link expanded to plain text");
                let warning = &self.localization.phishing_warning;
                let span = dom::element("span", &[("class", "phishy"), ("title", warning)]);
                dom::append_child(&span, dom::text_node(&format!("{} / {} ({})", text, href, warning)));
                dom::replace_node(anchor, vec![span]);
            }
        }
    }

    fn decorate_link(&self, anchor: &Handle, url: &str) {
        dom::set_attr(anchor, "href", url);

        if self.is_link_safe(url) {
            dom::remove_attr(anchor, "rel");
            dom::remove_attr(anchor, "target");
        } else {
            let rel = if self.add_nofollow { "nofollow noopener" } else { "noopener" };
            dom::set_attr(anchor, "rel", rel);
            dom::set_attr(anchor, "title", &self.localization.external_link);
            if self.add_target_blank {
                dom::set_attr(anchor, "target", "_blank");
            } else {
                dom::remove_attr(anchor, "target");
            }
        }

        let class = if self.is_external(url) {
            &self.external_class
        } else {
            &self.internal_class
        };
        match class {
            Some(class) => dom::set_attr(anchor, "class", class),
            None => dom::remove_attr(anchor, "class"),
        }
    }

    fn transform_image(&self, image: &Handle) {
        if self.hide_images {
            dom::replace_node(image, vec![dom::text_node(&self.localization.no_image)]);
            return;
        }
        match dom::get_attr(image, "src") {
            Some(src) if !src.trim().is_empty() => {
                dom::set_attr(image, "src", &(self.image_proxy_fn)(src.trim()));
            }
            _ => dom::replace_node(image, Vec::new()),
        }
    }

    fn is_link_safe(&self, url: &str) -> bool {
        match &self.is_link_safe_fn {
            Some(f) => f(url),
            None => self.links.is_same_site(url),
        }
    }

    fn is_external(&self, url: &str) -> bool {
        match &self.add_external_css_class_to_matching_links_fn {
            Some(f) => f(url),
            None => !self.is_link_safe(url),
        }
    }
}

fn filter_attribute<'u>(element: &str, attribute: &str, value: &'u str) -> Option<Cow<'u, str>> {
    match (element, attribute) {
        ("td" | "th", "style") => TEXT_ALIGN.is_match(value).then_some(Cow::Borrowed(value)),
        _ => Some(Cow::Borrowed(value)),
    }
}
