//! Tree pass between format conversion and sanitization.
//!
//! Walks the document once and
//!
//! - replaces embeddable media URLs (in text, auto-linked anchors and
//!   `iframe`/`embed`/`object` sources) with embed markers,
//! - turns bare URLs, `#hashtags` and `@mentions` in text into links,
//! - resolves `ipfs://` image sources against the configured gateway,
//! - records every link, image, hashtag and mention it sees.
//!
//! Text inside `a`, `code`, `pre` and raw-text elements is never rewritten.

use crate::account::validate_account_name;
use crate::dom;
use crate::localization::LocalizationOptions;
use crate::options::{RendererOptions, UrlRewriteFn};
use crate::Result;
use hive_renderer_embed::{AssetEmbedder, AssetEmbedderOptions, EmbedArena, EmbedLinks};
use markup5ever_rcdom::{Handle, NodeData};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeSet;

static TEXT_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?P<url>(?i:https?://)[^\s<>"'`]+)|#(?P<tag>[A-Za-z][A-Za-z0-9-]{0,31})|@(?P<user>[a-z][a-z0-9.-]*[a-z0-9])"#,
    )
    .unwrap()
});

static IMAGE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[^?#]+\.(?:png|jpe?g|gif|webp)(?:[?#].*)?$").unwrap());

const UNTOUCHED_ELEMENTS: &[&str] = &["code", "pre", "script", "style", "textarea"];

/// Rendered HTML plus everything it references
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument {
    pub html: String,
    pub links: BTreeSet<String>,
    pub images: BTreeSet<String>,
    pub hashtags: BTreeSet<String>,
    pub usertags: BTreeSet<String>,
}

impl RenderedDocument {
    fn record_embeds(&mut self, found: EmbedLinks) {
        self.links.extend(found.links);
        self.images.extend(found.images);
    }
}

/// Tree pass over the converted document
#[derive(Clone)]
pub struct HtmlDomParser {
    embedder: AssetEmbedder,
    localization: LocalizationOptions,
    hashtag_url_fn: UrlRewriteFn,
    usertag_url_fn: UrlRewriteFn,
    ipfs_prefix: Option<String>,
    hide_images: bool,
}

impl HtmlDomParser {
    pub fn new(options: &RendererOptions, localization: LocalizationOptions) -> Result<Self> {
        let embedder = AssetEmbedder::new(AssetEmbedderOptions::new(
            options.assets_width,
            options.assets_height,
            options.base_url.clone(),
        ))?;

        Ok(Self {
            embedder,
            localization,
            hashtag_url_fn: options.hashtag_url_fn.clone(),
            usertag_url_fn: options.usertag_url_fn.clone(),
            ipfs_prefix: options
                .ipfs_prefix
                .as_ref()
                .map(|p| p.trim_end_matches('/').to_string()),
            hide_images: options.do_not_show_images,
        })
    }

    pub fn embedder(&self) -> &AssetEmbedder {
        &self.embedder
    }

    /// Run the pass over an `<html>`-wrapped document.
    pub fn parse(&self, html: &str, arena: &mut EmbedArena) -> RenderedDocument {
        let (_dom, root) = dom::parse_fragment_root(html);
        let Some(root) = root else {
            return RenderedDocument {
                html: html.to_string(),
                ..Default::default()
            };
        };

        let mut walk = Walk {
            parser: self,
            arena,
            doc: RenderedDocument::default(),
        };
        walk.visit(&root, false);

        let mut doc = walk.doc;
        doc.html = format!("<html>{}</html>", dom::serialize_children(&root));
        tracing::debug!(
            links = doc.links.len(),
            images = doc.images.len(),
            hashtags = doc.hashtags.len(),
            usertags = doc.usertags.len(),
            "document pass complete"
        );
        doc
    }

    fn resolve_image_src(&self, src: &str) -> Option<String> {
        let prefix = self.ipfs_prefix.as_ref()?;
        let cid = src
            .strip_prefix("ipfs://")
            .or_else(|| src.strip_prefix("/ipfs/"))?;
        Some(format!("{}/{}", prefix, cid))
    }
}

struct Walk<'a> {
    parser: &'a HtmlDomParser,
    arena: &'a mut EmbedArena,
    doc: RenderedDocument,
}

impl Walk<'_> {
    fn visit(&mut self, node: &Handle, in_link: bool) {
        for child in dom::children_of(node) {
            match dom::element_name(&child).as_deref() {
                Some("a") => self.visit_anchor(&child),
                Some("img") => self.visit_image(&child),
                Some("iframe") | Some("embed") => self.visit_embed_element(&child, "src"),
                Some("object") => self.visit_embed_element(&child, "data"),
                Some(name) if UNTOUCHED_ELEMENTS.contains(&name) => {}
                Some(_) => self.visit(&child, in_link),
                None if !in_link => self.visit_text(&child),
                None => {}
            }
        }
    }

    fn visit_anchor(&mut self, anchor: &Handle) {
        if let Some(href) = dom::get_attr(anchor, "href") {
            let href = href.trim();
            // Auto-linked media URL
            if dom::text_content(anchor).trim() == href
                && let Some((token, found)) = self.parser.embedder.mark_url(href, self.arena)
            {
                self.doc.record_embeds(found);
                dom::replace_node(anchor, vec![dom::text_node(&token)]);
                return;
            }
            if !href.is_empty() {
                self.doc.links.insert(href.to_string());
            }
        }
        self.visit(anchor, true);
    }

    fn visit_image(&mut self, image: &Handle) {
        let Some(src) = dom::get_attr(image, "src") else {
            return;
        };
        let src = match self.parser.resolve_image_src(src.trim()) {
            Some(resolved) => {
                dom::set_attr(image, "src", &resolved);
                resolved
            }
            None => src.trim().to_string(),
        };
        if !src.is_empty() && !self.parser.hide_images {
            self.doc.images.insert(src);
        }
    }

    fn visit_embed_element(&mut self, element: &Handle, attr: &str) {
        let Some(url) = dom::get_attr(element, attr) else {
            return;
        };
        if let Some((token, found)) = self.parser.embedder.mark_url(&url, self.arena) {
            self.doc.record_embeds(found);
            dom::replace_node(element, vec![dom::text_node(&token)]);
        }
    }

    fn visit_text(&mut self, node: &Handle) {
        let text = match &node.data {
            NodeData::Text { contents } => contents.borrow().to_string(),
            _ => return,
        };
        if text.trim().is_empty() {
            return;
        }

        match self.linkify(&text) {
            Some(nodes) => dom::replace_node(node, nodes),
            None => {
                let marked = self.mark_plain_text(&text);
                if marked != text
                    && let NodeData::Text { contents } = &node.data
                {
                    *contents.borrow_mut() = marked.as_str().into();
                }
            }
        }
    }

    /// Nodes for `text` with its links expanded, or `None` when nothing matched.
    ///
    /// Bare URLs are matched whole first, so a media URL nested inside
    /// another URL never splits it. Text between links is still scanned for
    /// embeds.
    fn linkify(&mut self, text: &str) -> Option<Vec<Handle>> {
        let mut nodes = Vec::new();
        let mut pending = String::new();
        let mut last = 0;

        for caps in TEXT_LINK.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let link = self.link_for(text, &caps);
            let Some((end, node)) = link else { continue };

            pending.push_str(&text[last..whole.start()]);
            match node {
                Some(node) => {
                    if !pending.is_empty() {
                        let marked = self.mark_plain_text(&pending);
                        nodes.push(dom::text_node(&marked));
                        pending.clear();
                    }
                    nodes.push(node);
                }
                None => pending.push_str(&text[whole.start()..end]),
            }
            last = end;
        }

        if nodes.is_empty() {
            return None;
        }
        pending.push_str(&text[last..]);
        if !pending.is_empty() {
            let marked = self.mark_plain_text(&pending);
            nodes.push(dom::text_node(&marked));
        }
        Some(nodes)
    }

    fn mark_plain_text(&mut self, text: &str) -> String {
        let (marked, found) = self.parser.embedder.mark_text_with_links(text, self.arena);
        self.doc.record_embeds(found);
        marked
    }

    /// End offset of the consumed text and the node replacing it.
    ///
    /// `None` leaves the match as plain text; `Some((end, None))` consumes
    /// the match without producing a link.
    fn link_for(&mut self, text: &str, caps: &Captures<'_>) -> Option<(usize, Option<Handle>)> {
        if let Some(url) = caps.name("url") {
            let trimmed = trim_url(url.as_str());
            let end = url.start() + trimmed.len();
            if let Some((token, found)) = self.parser.embedder.mark_url(trimmed, self.arena) {
                self.doc.record_embeds(found);
                return Some((end, Some(dom::text_node(&token))));
            }
            return Some((end, self.url_node(trimmed)));
        }

        let whole = caps.get(0)?;
        if !starts_word(text, whole.start()) || !ends_word(text, whole.end()) {
            return None;
        }

        if let Some(tag) = caps.name("tag") {
            let tag = tag.as_str().to_lowercase();
            let href = (self.parser.hashtag_url_fn)(&tag);
            let anchor = dom::element("a", &[("href", &href)]);
            dom::append_child(&anchor, dom::text_node(whole.as_str()));
            self.doc.hashtags.insert(tag);
            return Some((whole.end(), Some(anchor)));
        }

        let account = caps.name("user")?.as_str();
        if let Some(reason) = validate_account_name(account, &self.parser.localization) {
            tracing::trace!(account, reason, "mention left as text");
            return None;
        }
        let href = (self.parser.usertag_url_fn)(account);
        let anchor = dom::element("a", &[("href", &href)]);
        dom::append_child(&anchor, dom::text_node(whole.as_str()));
        self.doc.usertags.insert(account.to_string());
        Some((whole.end(), Some(anchor)))
    }

    fn url_node(&mut self, url: &str) -> Option<Handle> {
        if IMAGE_URL.is_match(url) {
            if self.parser.hide_images {
                return None;
            }
            self.doc.images.insert(url.to_string());
            return Some(dom::element("img", &[("src", url)]));
        }

        let anchor = dom::element("a", &[("href", url)]);
        dom::append_child(&anchor, dom::text_node(url));
        self.doc.links.insert(url.to_string());
        Some(anchor)
    }
}

/// Drop trailing sentence punctuation and an unbalanced closing parenthesis.
fn trim_url(url: &str) -> &str {
    let mut url = url;
    loop {
        let Some(last) = url.chars().last() else {
            return url;
        };
        let strip = match last {
            '.' | ',' | ';' | ':' | '!' | '?' => true,
            ')' => url.matches('(').count() < url.matches(')').count(),
            _ => false,
        };
        if !strip {
            return url;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
}

fn starts_word(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .last()
        .is_none_or(|c| c.is_whitespace() || matches!(c, '(' | '[' | '"' | '\'' | ','))
}

fn ends_word(text: &str, end: usize) -> bool {
    text[end..]
        .chars()
        .next()
        .is_none_or(|c| !(c.is_alphanumeric() || c == '_' || c == '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(options: RendererOptions) -> HtmlDomParser {
        HtmlDomParser::new(&options, LocalizationOptions::default()).unwrap()
    }

    fn run(options: RendererOptions, html: &str) -> RenderedDocument {
        let p = parser(options);
        let mut arena = p.embedder().new_arena(html);
        p.parse(html, &mut arena)
    }

    #[test]
    fn test_linkify_urls() {
        let doc = run(
            RendererOptions::new("https://hive.blog"),
            "<html><p>See https://example.org/page.</p></html>",
        );
        assert_eq!(
            doc.html,
            r#"<html><p>See <a href="https://example.org/page">https://example.org/page</a>.</p></html>"#
        );
        assert!(doc.links.contains("https://example.org/page"));
    }

    #[test]
    fn test_image_urls() {
        let html = "<html><p>https://images.test/cat.png</p></html>";
        let doc = run(RendererOptions::new("https://hive.blog"), html);
        assert_eq!(doc.html, r#"<html><p><img src="https://images.test/cat.png"></p></html>"#);
        assert!(doc.images.contains("https://images.test/cat.png"));

        let doc = run(RendererOptions::new("https://hive.blog").with_images_hidden(true), html);
        assert_eq!(doc.html, html);
        assert!(doc.images.is_empty());
    }

    #[test]
    fn test_hashtags_and_mentions() {
        let doc = run(
            RendererOptions::new("https://hive.blog"),
            "<html><p>Hi @alice, see #Photography and C#, mail bob@host.test</p></html>",
        );
        assert!(doc.html.contains(r#"<a href="/@alice">@alice</a>,"#));
        assert!(doc.html.contains(r#"<a href="/trending/photography">#Photography</a>"#));
        assert!(doc.html.contains("C#,"));
        assert!(doc.html.contains("bob@host.test"));
        assert!(doc.usertags.contains("alice"));
        assert!(doc.hashtags.contains("photography"));
    }

    #[test]
    fn test_invalid_mentions_stay_text() {
        let doc = run(RendererOptions::new("https://hive.blog"), "<html><p>@ab and @hivewallet</p></html>");
        assert_eq!(doc.html, "<html><p>@ab and @hivewallet</p></html>");
        assert!(doc.usertags.is_empty());
    }

    #[test]
    fn test_code_untouched() {
        let html = "<html><pre><code>https://example.org #tag @alice</code></pre></html>";
        let doc = run(RendererOptions::new("https://hive.blog"), html);
        assert_eq!(doc.html, html);
    }

    #[test]
    fn test_embed_marking() {
        let p = parser(RendererOptions::new("https://hive.blog"));
        let html = r#"<html><p><a href="https://youtu.be/dQw4w9WgXcQ">https://youtu.be/dQw4w9WgXcQ</a></p><iframe src="https://player.vimeo.com/video/1234"></iframe></html>"#;
        let mut arena = p.embedder().new_arena(html);
        let doc = p.parse(html, &mut arena);

        let youtube = arena.namespace().token("youtube", "dQw4w9WgXcQ").unwrap();
        let vimeo = arena.namespace().token("vimeo", "1234").unwrap();
        assert_eq!(doc.html, format!("<html><p>{}</p>{}</html>", youtube, vimeo));
        assert!(doc.images.contains("https://img.youtube.com/vi/dQw4w9WgXcQ/0.jpg"));
    }

    #[test]
    fn test_media_url_nested_in_another_url_stays_a_link() {
        let html = "<html><p>see https://example.org/?u=https://youtu.be/dQw4w9WgXcQ ok</p></html>";
        let doc = run(RendererOptions::new("https://hive.blog"), html);
        assert_eq!(
            doc.html,
            r#"<html><p>see <a href="https://example.org/?u=https://youtu.be/dQw4w9WgXcQ">https://example.org/?u=https://youtu.be/dQw4w9WgXcQ</a> ok</p></html>"#
        );
        assert!(!doc.html.contains("~~~"));
    }

    #[test]
    fn test_bare_media_url_between_links() {
        let p = parser(RendererOptions::new("https://hive.blog"));
        let html = "<html><p>#music https://vimeo.com/1234 via @alice</p></html>";
        let mut arena = p.embedder().new_arena(html);
        let doc = p.parse(html, &mut arena);

        let vimeo = arena.namespace().token("vimeo", "1234").unwrap();
        assert_eq!(
            doc.html,
            format!(
                r#"<html><p><a href="/trending/music">#music</a> {} via <a href="/@alice">@alice</a></p></html>"#,
                vimeo
            )
        );
    }

    #[test]
    fn test_head_elements_survive_the_pass() {
        let html = "<html><style>p{color:red}</style>\n<p>hi</p></html>";
        let doc = run(RendererOptions::new("https://hive.blog"), html);
        assert_eq!(doc.html, html);
    }

    #[test]
    fn test_unknown_iframe_left_for_sanitizer() {
        let html = r#"<html><iframe src="https://evil.test/frame"></iframe></html>"#;
        let doc = run(RendererOptions::new("https://hive.blog"), html);
        assert!(doc.html.contains("<iframe"));
    }

    #[test]
    fn test_ipfs_images() {
        let doc = run(
            RendererOptions::new("https://hive.blog").with_ipfs_prefix("https://ipfs.io/ipfs/"),
            r#"<html><img src="ipfs://QmHash"></html>"#,
        );
        assert_eq!(doc.html, r#"<html><img src="https://ipfs.io/ipfs/QmHash"></html>"#);
    }

    #[test]
    fn test_trim_url() {
        assert_eq!(trim_url("https://a.test/x)."), "https://a.test/x");
        assert_eq!(trim_url("https://a.test/wiki/Rust_(language)"), "https://a.test/wiki/Rust_(language)");
    }
}
