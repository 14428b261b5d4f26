//! Known phishing domains and URLs.
//!
//! The list is read on every link evaluation and may be refreshed from an
//! external feed at any time. Readers take a snapshot `Arc` of the current
//! entry set, so a [`PhishingList::replace`] never blocks on, or tears, a
//! lookup that is already in flight.

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Domains shipped with the renderer. Deployments are expected to replace
/// these with a maintained feed.
const DEFAULT_DOMAINS: &[&str] = &[
    "steemit.co",
    "steemit.ml",
    "steeemit.com",
    "steemitt.com",
    "hive.blog.ru",
    "hiveblog.co",
    "hive-blog.cc",
    "peakd.cc",
];

/// Immutable set of phishing entries.
#[derive(Debug, Default, Clone)]
pub struct PhishingEntries {
    domains: HashSet<String>,
    urls: HashSet<String>,
}

impl PhishingEntries {
    pub fn new<D, U, S1, S2>(domains: D, urls: U) -> Self
    where
        D: IntoIterator<Item = S1>,
        U: IntoIterator<Item = S2>,
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim().trim_start_matches("www.").to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
            urls: urls
                .into_iter()
                .map(|u| normalize_url_entry(u.as_ref()))
                .filter(|u| !u.is_empty())
                .collect(),
        }
    }

    /// True if `host` or any of its parent domains is listed.
    pub fn contains_domain(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_lowercase();
        let mut candidate = host.as_str();
        loop {
            if self.domains.contains(candidate) {
                return true;
            }
            match candidate.split_once('.') {
                Some((_, parent)) if parent.contains('.') => candidate = parent,
                _ => return false,
            }
        }
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.urls.contains(&normalize_url_entry(url))
    }

    pub fn len(&self) -> usize {
        self.domains.len() + self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared, atomically replaceable phishing list.
#[derive(Debug)]
pub struct PhishingList {
    entries: RwLock<Arc<PhishingEntries>>,
}

impl PhishingList {
    pub fn new(entries: PhishingEntries) -> Self {
        Self {
            entries: RwLock::new(Arc::new(entries)),
        }
    }

    /// List seeded with the built-in domains
    pub fn with_defaults() -> Self {
        Self::new(PhishingEntries::new(
            DEFAULT_DOMAINS.iter().copied(),
            std::iter::empty::<&str>(),
        ))
    }

    pub fn empty() -> Self {
        Self::new(PhishingEntries::default())
    }

    /// Current entry set.
    #[inline]
    pub fn snapshot(&self) -> Arc<PhishingEntries> {
        self.entries.read().clone()
    }

    /// Swap in a new entry set, returning the previous one.
    pub fn replace(&self, entries: PhishingEntries) -> Arc<PhishingEntries> {
        let previous = std::mem::replace(&mut *self.entries.write(), Arc::new(entries));
        tracing::debug!(
            previous = previous.len(),
            current = self.snapshot().len(),
            "phishing list replaced"
        );
        previous
    }

    pub fn contains_domain(&self, host: &str) -> bool {
        self.snapshot().contains_domain(host)
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.snapshot().contains_url(url)
    }

    /// Check a (normalized) link target against the list.
    ///
    /// Only listed domains and URLs match. Relative and fragment links never
    /// match. When the URL cannot be parsed its raw authority is looked up.
    pub fn looks_phishy(&self, url: &str) -> bool {
        let entries = self.snapshot();
        let trimmed = url.trim();

        if entries.contains_url(trimmed) {
            return true;
        }

        let absolute = if let Some(rest) = trimmed.strip_prefix("//") {
            format!("https://{}", rest)
        } else if has_scheme(trimmed) {
            trimmed.to_string()
        } else {
            return false;
        };

        match Url::parse(&absolute) {
            Ok(parsed) => {
                parsed.host_str().is_some_and(|host| entries.contains_domain(host))
                    || entries.contains_url(parsed.as_str())
            }
            Err(_) => raw_host(&absolute).is_some_and(|host| entries.contains_domain(host)),
        }
    }
}

impl Default for PhishingList {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Host part of `scheme://[user@]host[:port]/...` without URL parsing.
fn raw_host(url: &str) -> Option<&str> {
    let rest = &url[url.find("//")? + 2..];
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority.rsplit('@').next()?;
    let host = host.split(':').next()?.trim();
    (!host.is_empty()).then_some(host)
}

fn has_scheme(url: &str) -> bool {
    match url.find(':') {
        Some(idx) if idx > 0 => url[..idx]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

fn normalize_url_entry(url: &str) -> String {
    url.trim().trim_end_matches('/').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> PhishingList {
        PhishingList::new(PhishingEntries::new(
            ["evil.test", "www.badsite.example"],
            ["https://good.example/steal-keys"],
        ))
    }

    #[test]
    fn test_domain_match() {
        let list = list();
        assert!(list.looks_phishy("https://evil.test/login"));
        assert!(list.looks_phishy("http://EVIL.test"));
        assert!(list.looks_phishy("//evil.test/x"));
    }

    #[test]
    fn test_subdomain_match() {
        let list = list();
        assert!(list.looks_phishy("https://wallet.evil.test/"));
        assert!(list.looks_phishy("https://www.badsite.example/"));
        assert!(!list.looks_phishy("https://notevil.test/"));
    }

    #[test]
    fn test_exact_url_match() {
        let list = list();
        assert!(list.looks_phishy("https://good.example/steal-keys"));
        assert!(list.looks_phishy("https://good.example/steal-keys/"));
        assert!(!list.looks_phishy("https://good.example/blog"));
    }

    #[test]
    fn test_relative_links_never_match() {
        let list = list();
        assert!(!list.looks_phishy("/trending/evil.test"));
        assert!(!list.looks_phishy("#evil.test"));
    }

    #[test]
    fn test_unparseable_url_only_matches_listed_hosts() {
        let list = list();
        assert!(!list.looks_phishy("https://exa mple.com/"));
        assert!(!list.looks_phishy("https://[broken/x"));
        assert!(list.looks_phishy("https://user@wallet.evil.test:99/a b%zz"));
        assert!(list.looks_phishy("https://evil.test:notaport/x"));
    }

    #[test]
    fn test_hostless_urls_do_not_match() {
        let list = list();
        assert!(!list.looks_phishy("mailto:someone@evil.test"));
        assert!(!list.looks_phishy("data:text/plain,hi"));
    }

    #[test]
    fn test_hive_scheme_is_not_phishy() {
        let list = list();
        assert!(!list.looks_phishy("hive://sign/op/abc"));
    }

    #[test]
    fn test_replace_swaps_entries() {
        let list = list();
        let snapshot = list.snapshot();

        let previous = list.replace(PhishingEntries::new(["other.test"], std::iter::empty::<&str>()));

        assert!(Arc::ptr_eq(&snapshot, &previous));
        assert!(snapshot.contains_domain("evil.test"));
        assert!(!list.looks_phishy("https://evil.test"));
        assert!(list.looks_phishy("https://other.test"));
    }

    #[test]
    fn test_defaults_loaded() {
        let list = PhishingList::with_defaults();
        assert!(list.looks_phishy("https://steemit.ml/@someone"));
        assert!(!PhishingList::empty().looks_phishy("https://steemit.ml/@someone"));
    }
}
