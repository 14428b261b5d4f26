//! Integration tests for hive-renderer-embed

use hive_renderer_embed::*;
use proptest::prelude::*;

#[derive(Debug)]
struct PeerTubeEmbedder;

impl Embedder for PeerTubeEmbedder {
    fn kind(&self) -> &'static str {
        "peertube"
    }

    fn match_url(&self, candidate: &str) -> Option<EmbedMetadata> {
        let start = candidate.find("https://tube.test/w/")?;
        let rest = &candidate[start + "https://tube.test/w/".len()..];
        let id: String = rest.chars().take_while(|c| c.is_ascii_alphanumeric()).collect();
        if id.is_empty() {
            return None;
        }
        Some(EmbedMetadata::new(format!("https://tube.test/w/{}", id), id))
    }

    fn embed(&self, id: &str, size: EmbedSize) -> Option<String> {
        Some(format!("<iframe src=\"https://tube.test/embed/{}\" width=\"{}\"></iframe>", id, size.width))
    }
}

fn options() -> AssetEmbedderOptions {
    AssetEmbedderOptions::new(800, 450, "https://example.com")
}

#[test]
fn test_custom_embedder() {
    let embedder = AssetEmbedder::with_embedders(options(), vec![Box::new(PeerTubeEmbedder)]).unwrap();
    let mut arena = embedder.new_arena("x");

    let marked = embedder.mark_text("watch https://tube.test/w/abc123 today", &mut arena);
    let html = embedder.insert_assets(&marked, &arena);

    assert_eq!(
        html,
        "watch <iframe src=\"https://tube.test/embed/abc123\" width=\"800\"></iframe> today"
    );
}

#[test]
fn test_expand_at_custom_size() {
    let embedder = AssetEmbedder::new(options()).unwrap();
    let mut arena = embedder.new_arena("x");
    let marked = embedder.mark_text("https://vimeo.com/1234", &mut arena);

    let html = embedder.insert_marked_embeds(&marked, &arena, EmbedSize::new(320, 180));
    assert!(html.contains(r#"width="320""#));
    assert!(html.contains(r#"height="180""#));
}

#[test]
fn test_all_platforms_round_trip() {
    let embedder = AssetEmbedder::new(options()).unwrap();
    let cases = [
        ("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "youtube.com/embed/dQw4w9WgXcQ"),
        ("https://vimeo.com/76979871", "player.vimeo.com/video/76979871"),
        ("https://www.twitch.tv/videos/987654", "player.twitch.tv/?video=v987654&amp;parent=example.com"),
        ("https://open.spotify.com/show/2MAi0BvDc6GTFvKFPXnkCL", "open.spotify.com/embed/show/2MAi0BvDc6GTFvKFPXnkCL"),
        ("https://3speak.tv/watch?v=alice/abcdefgh", "3speak.tv/embed?v=alice/abcdefgh"),
        ("https://twitter.com/hiveblocks/status/1600000000000", "twitter-tweet"),
    ];

    for (url, expected) in cases {
        let mut arena = embedder.new_arena(url);
        let marked = embedder.mark_text(&format!("<p>{}</p>", url), &mut arena);
        assert!(!marked.contains(url), "{} was not marked", url);

        let html = embedder.insert_assets(&marked, &arena);
        assert!(html.contains(expected), "{} expanded to {}", url, html);
        assert!(!html.contains("~~~ embed:"));
    }
}

#[test]
fn test_kinds_listed_in_priority_order() {
    let embedder = AssetEmbedder::new(options()).unwrap();
    assert_eq!(
        embedder.kinds(),
        vec!["youtube", "vimeo", "twitch", "spotify", "threespeak", "twitter"]
    );
}

proptest! {
    #[test]
    fn prop_youtube_marker_round_trip(id in "[A-Za-z0-9_-]{11}", before in "[a-z ]{0,20}", after in "[a-z ]{0,20}") {
        let embedder = AssetEmbedder::new(options()).unwrap();
        let text = format!("{} https://youtu.be/{} {}", before, id, after);
        let mut arena = embedder.new_arena(&text);

        let html = embedder.insert_assets(&embedder.mark_text(&text, &mut arena), &arena);
        let expected = format!("https://www.youtube.com/embed/{}", id);
        prop_assert!(html.contains(&expected));
        prop_assert!(html.contains(r#"width="800""#));
        prop_assert!(!html.contains("~~~ embed:"));
    }
}
