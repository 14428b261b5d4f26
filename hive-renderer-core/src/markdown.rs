use pulldown_cmark::{html, Event, Options, Parser};

/// Markdown to HTML conversion.
///
/// Raw HTML in the source passes through untouched; everything downstream
/// treats the result as untrusted.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer {
    breaks: bool,
}

impl MarkdownRenderer {
    /// `breaks` turns every soft line break into `<br />`.
    pub fn new(breaks: bool) -> Self {
        Self { breaks }
    }

    pub fn render(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let breaks = self.breaks;
        let parser = Parser::new_ext(markdown, options).map(move |event| match event {
            Event::SoftBreak if breaks => Event::HardBreak,
            other => other,
        });

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let html = MarkdownRenderer::new(false).render("# Title\n\n**bold** and ~~gone~~");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_breaks() {
        assert!(!MarkdownRenderer::new(false).render("a\nb").contains("<br"));
        assert!(MarkdownRenderer::new(true).render("a\nb").contains("<br />"));
    }

    #[test]
    fn test_quotes_left_alone() {
        let html = MarkdownRenderer::new(false).render("\"quoted\" -- text");
        assert!(!html.contains('\u{201c}'));
        assert!(!html.contains('\u{2013}'));
        assert!(html.contains("quoted"));
        assert!(html.contains(" -- text"));
    }

    #[test]
    fn test_tables() {
        let html = MarkdownRenderer::new(false).render("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }
}
