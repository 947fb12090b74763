/// Text processing utilities
pub mod text {
    use regex::Regex;
    use std::sync::OnceLock;

    /// First `max_chars` characters of `text`, never splitting a code point.
    pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
        match text.char_indices().nth(max_chars) {
            Some((byte_index, _)) => &text[..byte_index],
            None => text,
        }
    }

    /// Trim every line, drop the empty ones and rejoin with `\n`.
    pub fn normalize_lines(text: &str) -> String {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Drop markdown markers at line starts and inline emphasis or code
    /// markup, so provider text renders literally in a markdown message.
    pub fn strip_markdown(text: &str) -> String {
        static LINE_MARKERS: OnceLock<Regex> = OnceLock::new();
        static INLINE_MARKERS: OnceLock<Regex> = OnceLock::new();

        let line_markers = LINE_MARKERS.get_or_init(|| {
            Regex::new(r"(?m)^[ \t]*(?:#{1,6}[ \t]+|>[ \t]*|[-*+][ \t]+)")
                .expect("valid line marker pattern")
        });
        let inline_markers = INLINE_MARKERS
            .get_or_init(|| Regex::new(r"\*\*|__|~~|`+").expect("valid inline marker pattern"));

        let without_lines = line_markers.replace_all(text, "");
        inline_markers.replace_all(&without_lines, "").into_owned()
    }
}

/// URL utilities
pub mod url {
    use url::Url;

    /// Only http(s) URLs are accepted for the feed, webhook and LLM endpoints.
    pub fn is_valid_http_url(url_str: &str) -> bool {
        if let Ok(url) = Url::parse(url_str) {
            (url.scheme() == "http" || url.scheme() == "https") && url.host_str().is_some()
        } else {
            false
        }
    }

    /// Host part of a URL, for log lines.
    pub fn extract_host(url_str: &str) -> Option<String> {
        Url::parse(url_str)
            .ok()
            .and_then(|url| url.host_str().map(|h| h.to_string()))
    }
}
