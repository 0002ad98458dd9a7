use scraper::{ElementRef, Html};

/// Upper bound on normalized page text, counted in characters. Keeps prompts
/// within provider context windows even for very large pages.
pub const MAX_CONTENT_CHARS: usize = 200_000;

/// Elements whose entire subtrees are dropped during text extraction. These
/// hold boilerplate or code rather than page copy.
const EXCLUDED_ELEMENTS: [&str; 6] = ["script", "style", "nav", "header", "footer", "iframe"];

/// Reduces raw HTML to readable page text: excluded subtrees are removed,
/// all remaining text nodes are joined, whitespace runs collapse to single
/// spaces, and the result is capped at [`MAX_CONTENT_CHARS`] characters.
///
/// The parser is the same lenient html5ever used by browsers, so malformed
/// markup degrades to partial text rather than an error. Input that contains
/// no markup at all comes back unchanged apart from whitespace collapsing.
pub fn readable_text(raw_html: &str) -> String {
    let document = Html::parse_document(raw_html);

    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);

    let mut collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&mut collapsed, MAX_CONTENT_CHARS);
    collapsed
}

/// Truncates `text` to at most `max_chars` characters, never splitting a
/// multi-byte character.
pub fn truncate_chars(text: &mut String, max_chars: usize) {
    if let Some((byte_index, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_index);
    }
}

/// Depth-first text collection over an explicit stack of child iterators;
/// nesting depth is bounded by the heap, not the call stack.
fn collect_text(root: ElementRef<'_>, out: &mut String) {
    if EXCLUDED_ELEMENTS.contains(&root.value().name()) {
        return;
    }

    let mut pending = vec![root.children()];
    while let Some(children) = pending.last_mut() {
        match children.next() {
            Some(child) => {
                if let Some(text) = child.value().as_text() {
                    out.push_str(text);
                    out.push(' ');
                } else if let Some(element) = ElementRef::wrap(child) {
                    if !EXCLUDED_ELEMENTS.contains(&element.value().name()) {
                        pending.push(element.children());
                    }
                }
            }
            None => {
                pending.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_excluded_subtrees() {
        let html = r#"
            <html>
            <head><title>Widgets</title><style>body { color: red; }</style></head>
            <body>
                <header>Site header</header>
                <nav><a href="/">Home</a></nav>
                <p>Widgets are great.</p>
                <script>var tracking = "pixel";</script>
                <iframe src="https://ads.example.com"></iframe>
                <footer>Copyright 2024</footer>
            </body>
            </html>
        "#;
        let text = readable_text(html);
        assert!(text.contains("Widgets are great."));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("Site header"));
        assert!(!text.contains("Home"));
        assert!(!text.contains("Copyright 2024"));
    }

    #[test]
    fn test_removes_nested_excluded_subtrees() {
        let html = "<div><p>Kept.</p><div><script>alert('dropped');</script><p>Also kept.</p></div></div>";
        let text = readable_text(html);
        assert!(text.contains("Kept."));
        assert!(text.contains("Also kept."));
        assert!(!text.contains("alert"));
    }

    #[test]
    fn test_collapses_whitespace() {
        let html = "<p>several   words\n\n\tspread\u{a0}   out</p>";
        let text = readable_text(html);
        assert!(!text.contains("  "));
        assert!(!text.contains('\n'));
        assert!(text.contains("several words"));
    }

    #[test]
    fn test_caps_output_at_limit() {
        let body = "a".repeat(MAX_CONTENT_CHARS + 50_000);
        let html = format!("<p>{}</p>", body);
        let text = readable_text(&html);
        assert_eq!(text.chars().count(), MAX_CONTENT_CHARS);
    }

    #[test]
    fn test_plain_text_is_a_fixed_point() {
        let once = readable_text("plain text with no markup at all");
        let twice = readable_text(&once);
        assert_eq!(once, "plain text with no markup at all");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_malformed_html_degrades_to_text() {
        let text = readable_text("<div><p>unclosed <span>but readable");
        assert!(text.contains("unclosed"));
        assert!(text.contains("but readable"));
    }

    #[test]
    fn test_handles_deeply_nested_markup() {
        // Real pages nest far deeper than any fixed call stack should assume.
        let depth = 10_000;
        let mut html = String::with_capacity(depth * 11 + 16);
        for _ in 0..depth {
            html.push_str("<div>");
        }
        html.push_str("deep text");
        for _ in 0..depth {
            html.push_str("</div>");
        }

        assert_eq!(readable_text(&html), "deep text");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(readable_text(""), "");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let mut text = "héllo wörld".to_string();
        truncate_chars(&mut text, 4);
        assert_eq!(text, "héll");
    }
}
