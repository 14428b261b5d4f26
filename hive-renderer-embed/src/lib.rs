//! # Hive Renderer Embeds
//!
//! Recognition of media platform links and their expansion into players.
//!
//! Rendering happens in two passes separated by sanitization:
//!
//! 1. [`AssetEmbedder::mark_text`] replaces each recognized URL with an
//!    opaque marker token scoped to the current render ([`EmbedArena`]).
//! 2. [`AssetEmbedder::insert_assets`] turns the surviving markers into
//!    player markup sized to the configured bounding box.
//!
//! ```rust
//! use hive_renderer_embed::{AssetEmbedder, AssetEmbedderOptions};
//!
//! let embedder = AssetEmbedder::new(AssetEmbedderOptions::new(640, 480, "https://hive.blog")).unwrap();
//! let mut arena = embedder.new_arena("my post");
//!
//! let marked = embedder.mark_text("https://vimeo.com/76979871", &mut arena);
//! assert!(!marked.contains("vimeo.com"));
//!
//! let html = embedder.insert_assets(&marked, &arena);
//! assert!(html.contains("https://player.vimeo.com/video/76979871"));
//! ```
//!
//! New platforms implement [`Embedder`] and are passed to
//! [`AssetEmbedder::with_embedders`].

pub mod asset_embedder;
pub mod embedder;
pub mod embedders;
pub mod error;
pub mod marker;

pub use asset_embedder::{AssetEmbedder, AssetEmbedderOptions, EmbedArena, EmbedLinks};
pub use embedder::{EmbedMetadata, EmbedSize, Embedder};
pub use embedders::{
    SpotifyEmbedder, ThreeSpeakEmbedder, TwitchEmbedder, TwitterEmbedder, VimeoEmbedder,
    YoutubeEmbedder,
};
pub use error::{EmbedError, Result};
pub use marker::{EmbedMarker, MarkerNamespace};
