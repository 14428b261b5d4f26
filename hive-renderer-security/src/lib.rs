//! # Hive Renderer Security
//!
//! Security primitives used by the Hive content renderer.
//!
//! ## Features
//!
//! - **Phishing List** - Atomically replaceable set of known-bad domains and URLs
//! - **Link Safety** - Phishing-list and pseudo-local-URL evaluation of link targets
//! - **Security Gate** - Last-line check of rendered HTML, independent of the sanitizer allow-list
//! - **Encoding** - HTML text, attribute and URL component encoding
//!
//! ## Link Safety
//!
//! ```rust
//! use hive_renderer_security::{LinkSanitizer, LinkSanitizerOptions, LinkVerdict, PhishingList};
//! use std::sync::Arc;
//!
//! let links = LinkSanitizer::new(
//!     &LinkSanitizerOptions::new("https://example.com"),
//!     Arc::new(PhishingList::with_defaults()),
//! ).unwrap();
//!
//! // Link text pretends to point at our own site
//! assert!(!links.evaluate("https://evil.test", "example.com").is_safe());
//!
//! // Bare hostnames are normalized to https
//! assert_eq!(
//!     links.evaluate("hive.io", "hive"),
//!     LinkVerdict::Safe("https://hive.io".to_string())
//! );
//! ```
//!
//! ## Security Gate
//!
//! ```rust
//! use hive_renderer_security::{SecurityChecker, SecurityOptions};
//!
//! let strict = SecurityOptions::default();
//! assert!(SecurityChecker::check_security("<script>alert(1)</script>", &strict).is_err());
//! assert!(SecurityChecker::check_security("<p>Hello</p>", &strict).is_ok());
//! ```

pub mod checker;
pub mod encoder;
pub mod error;
pub mod link_sanitizer;
pub mod phishing;

pub use checker::{SecurityChecker, SecurityOptions};
pub use encoder::HtmlEncoder;
pub use error::{Result, SecurityError};
pub use link_sanitizer::{LinkSanitizer, LinkSanitizerOptions, LinkVerdict, RejectionReason};
pub use phishing::{PhishingEntries, PhishingList};
