//! Link safety evaluation.
//!
//! Every anchor that survives sanitization is passed through
//! [`LinkSanitizer::evaluate`]. Two independent checks can reject a link:
//!
//! - the [`PhishingList`] lookup, which runs first and rejects listed domains
//!   and URLs, falling back to the raw host when the URL cannot be parsed;
//! - the pseudo-local heuristic (link text mentions our own domain while the
//!   target does not), which fails open: if the target cannot be
//!   interpreted the link is kept.

use crate::error::{Result, SecurityError};
use crate::phishing::PhishingList;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use url::Url;

static TOP_LEVEL_DOMAIN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^\s/$.?#]+\.[^\s/$.?#]+)$").unwrap());

/// Construction options for [`LinkSanitizer`]
#[derive(Debug, Clone, Default)]
pub struct LinkSanitizerOptions {
    pub base_url: String,
}

impl LinkSanitizerOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

/// Why a link was not kept live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// Target is on the phishing list
    PhishingList,
    /// Link text claims our domain, target points elsewhere
    PseudoLocalUrl,
}

/// Outcome of a link evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkVerdict {
    /// Normalized URL that may be used as `href`
    Safe(String),
    Rejected(RejectionReason),
}

impl LinkVerdict {
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe(_))
    }

    pub fn into_url(self) -> Option<String> {
        match self {
            Self::Safe(url) => Some(url),
            Self::Rejected(_) => None,
        }
    }
}

/// Link safety evaluator bound to one site's base URL
#[derive(Debug, Clone)]
pub struct LinkSanitizer {
    base_url: Url,
    top_level_base_domain: String,
    phishing: Arc<PhishingList>,
}

impl LinkSanitizer {
    pub fn new(options: &LinkSanitizerOptions, phishing: Arc<PhishingList>) -> Result<Self> {
        let raw = options.base_url.trim();
        if raw.is_empty() {
            return Err(SecurityError::Configuration(
                "LinkSanitizerOptions.baseUrl must be a non-empty string".to_string(),
            ));
        }

        let base_url = Url::parse(raw).map_err(|e| {
            SecurityError::Configuration(format!("baseUrl '{}' is not a valid URL: {}", raw, e))
        })?;
        let top_level_base_domain = Self::top_level_base_domain_of(&base_url)?;

        Ok(Self {
            base_url,
            top_level_base_domain,
            phishing,
        })
    }

    /// Last two labels of the base URL hostname (`localhost` maps to itself)
    pub fn top_level_base_domain_of(url: &Url) -> Result<String> {
        let hostname = url.host_str().unwrap_or_default().to_lowercase();
        if hostname == "localhost" {
            return Ok(hostname);
        }

        TOP_LEVEL_DOMAIN_PATTERN
            .captures(&hostname)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                SecurityError::Configuration(format!(
                    "could not determine top level base domain from baseUrl hostname: {}",
                    hostname
                ))
            })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn top_level_base_domain(&self) -> &str {
        &self.top_level_base_domain
    }

    pub fn phishing_list(&self) -> &Arc<PhishingList> {
        &self.phishing
    }

    /// Evaluate `url` as the target of a link whose visible text is `link_text`.
    pub fn evaluate(&self, url: &str, link_text: &str) -> LinkVerdict {
        let url = Self::prepend_unknown_protocol(url.trim());

        if self.phishing.looks_phishy(&url) {
            tracing::debug!(url = %url, link_text, "phishing link detected: phishing list");
            return LinkVerdict::Rejected(RejectionReason::PhishingList);
        }

        if self.is_pseudo_local_url(&url, link_text) {
            tracing::debug!(url = %url, link_text, "phishing link detected: pseudo local url");
            return LinkVerdict::Rejected(RejectionReason::PseudoLocalUrl);
        }

        LinkVerdict::Safe(url)
    }

    /// Normalized URL, or `None` when the link must not stay live.
    pub fn sanitize_link(&self, url: &str, link_text: &str) -> Option<String> {
        self.evaluate(url, link_text).into_url()
    }

    /// True when `url` is relative or its host shares our top level base domain.
    pub fn is_same_site(&self, url: &str) -> bool {
        let url = url.trim();
        if url.starts_with('#') || (url.starts_with('/') && !url.starts_with("//")) {
            return true;
        }
        let url = Self::prepend_unknown_protocol(url);
        let absolute = match url.strip_prefix("//") {
            Some(rest) => format!("https://{}", rest),
            None => url,
        };
        Url::parse(&absolute)
            .ok()
            .and_then(|parsed| parsed.host_str().map(|h| self.host_in_base_domain(h)))
            .unwrap_or(false)
    }

    /// Links that are not fragments, root-relative, http(s), `hive:` or
    /// protocol-relative are assumed to be bare hostnames and get `https://`.
    pub fn prepend_unknown_protocol(url: &str) -> String {
        let lower = url.to_ascii_lowercase();
        let known = url.starts_with('#')
            || url.starts_with('/')
            || ["http://", "https://", "hive://"]
                .iter()
                .any(|prefix| lower.starts_with(prefix));

        if known {
            url.to_string()
        } else {
            format!("https://{}", url)
        }
    }

    fn is_pseudo_local_url(&self, url: &str, link_text: &str) -> bool {
        if url.starts_with('#') {
            return false;
        }
        // A malformed target is not evidence of deception.
        self.check_pseudo_local_url(url, link_text).unwrap_or(false)
    }

    fn check_pseudo_local_url(&self, url: &str, link_text: &str) -> std::result::Result<bool, url::ParseError> {
        let domain = self.top_level_base_domain.as_str();
        if !link_text.to_lowercase().contains(domain) || url.to_lowercase().contains(domain) {
            return Ok(false);
        }
        if url.starts_with('/') && !url.starts_with("//") {
            return Ok(false);
        }

        // Percent-encoded or IDN hosts only show our domain once normalized.
        let absolute = match url.strip_prefix("//") {
            Some(rest) => format!("https://{}", rest),
            None => url.to_string(),
        };
        let parsed = Url::parse(&absolute)?;
        Ok(!parsed.as_str().to_lowercase().contains(domain))
    }

    fn host_in_base_domain(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_lowercase();
        host == self.top_level_base_domain
            || host.ends_with(&format!(".{}", self.top_level_base_domain))
    }
}
