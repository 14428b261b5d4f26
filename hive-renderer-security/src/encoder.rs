/// Encoding helpers for markup assembled outside the DOM serializer
pub struct HtmlEncoder;

impl HtmlEncoder {
    /// Encode HTML entities for a text context
    pub fn encode_html(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#x27;"),
                '&' => out.push_str("&amp;"),
                _ => out.push(c),
            }
        }
        out
    }

    /// Encode for a double-quoted attribute value
    pub fn encode_html_attribute(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#x27;"),
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '`' => out.push_str("&#x60;"),
                _ => out.push(c),
            }
        }
        out
    }

    /// Percent-encode a single URL path segment or query component
    pub fn encode_url_component(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for byte in text.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
                out.push(byte as char);
            } else {
                out.push_str(&format!("%{:02X}", byte));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_html() {
        let input = r#"<script>alert("XSS")</script>"#;
        let output = HtmlEncoder::encode_html(input);

        assert_eq!(
            output,
            "&lt;script&gt;alert(&quot;XSS&quot;)&lt;/script&gt;"
        );
        assert!(!output.contains('<'));
        assert!(!output.contains('>'));
    }

    #[test]
    fn test_encode_html_attribute() {
        let input = r#"Hello" onclick="alert('XSS')"#;
        let output = HtmlEncoder::encode_html_attribute(input);

        assert!(output.contains("&quot;"));
        assert!(output.contains("&#x27;"));
        assert!(!output.contains('"'));
    }

    #[test]
    fn test_encode_url_component() {
        assert_eq!(HtmlEncoder::encode_url_component("hello world&x"), "hello%20world%26x");
        assert_eq!(HtmlEncoder::encode_url_component("photography"), "photography");
    }

    #[test]
    fn test_encode_url_component_multibyte() {
        assert_eq!(HtmlEncoder::encode_url_component("é"), "%C3%A9");
    }
}
