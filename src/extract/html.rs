//! HTML text extraction.

use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::OnceLock;

use super::{collapse_blank_lines, TextExtractor, BULLET};
use crate::error::Result;

/// HTML extractor.
///
/// Tags are dropped; headings and block containers become paragraph
/// breaks, `<li>` starts a bullet line and `<br>` a line break. Script and
/// style bodies are skipped and entities decoded.
#[derive(Debug, Clone, Default)]
pub struct HtmlExtractor {
    _private: (),
}

impl HtmlExtractor {
    /// Create a new HTML extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl TextExtractor for HtmlExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn name(&self) -> &str {
        "html"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(html_to_text(&String::from_utf8_lossy(bytes)))
    }
}

/// Text inserted where an element opens.
fn opening(name: &str) -> String {
    match name {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "\n\n".to_string(),
        "li" => format!("\n{} ", BULLET),
        "br" => "\n".to_string(),
        _ => " ".to_string(),
    }
}

/// Text inserted where an element closes.
fn closing(name: &str) -> &'static str {
    match name {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "\n\n",
        "p" | "div" | "section" | "article" | "ul" | "ol" => "\n\n",
        "br" => "",
        _ => " ",
    }
}

fn walk(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if matches!(name, "script" | "style") {
                out.push(' ');
                continue;
            }
            out.push_str(&opening(name));
            walk(child_element, out);
            out.push_str(closing(name));
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

fn normalize_whitespace(text: &str) -> String {
    static SPACES: OnceLock<Regex> = OnceLock::new();
    static LINE_EDGES: OnceLock<Regex> = OnceLock::new();
    let spaces = SPACES.get_or_init(|| Regex::new(r"[ \t\r\f]+").expect("valid regex"));
    let edges = LINE_EDGES.get_or_init(|| Regex::new(r" *\n *").expect("valid regex"));

    let collapsed = spaces.replace_all(text, " ");
    let trimmed = edges.replace_all(&collapsed, "\n");
    collapse_blank_lines(&trimmed)
}

/// Plain text of an HTML document.
///
/// The parser recovers from malformed markup the way browsers do, so no
/// tag text ever reaches the output; entities are decoded in text nodes.
pub(crate) fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::with_capacity(html.len());
    walk(document.root_element(), &mut text);
    normalize_whitespace(&text).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_and_paragraphs() {
        let html = "<html><body><h1>Annual Report</h1><p>First paragraph.</p><p>Second one.</p></body></html>";
        assert_eq!(
            html_to_text(html),
            "Annual Report\n\nFirst paragraph.\n\nSecond one."
        );
    }

    #[test]
    fn test_list_items() {
        let html = "<ul><li>One</li><li> Two</li></ul>";
        assert_eq!(html_to_text(html), "• One\n• Two");
    }

    #[test]
    fn test_script_style_and_comments_skipped() {
        let html = "<head><style>p { color: red; }</style><script>if (a < b) { x(); }</script></head><!-- note -->Body";
        assert_eq!(html_to_text(html), "Body");
    }

    #[test]
    fn test_entities_and_line_breaks() {
        let html = "Fish &amp; Chips<br/>Caf&eacute; &#8212; &lt;open&gt;";
        assert_eq!(html_to_text(html), "Fish & Chips\nCafé — <open>");
    }

    #[test]
    fn test_attributes_and_stray_angle_brackets() {
        let html = r#"<a href="x?a>b" class='c'>link</a> 3 < 4"#;
        assert_eq!(html_to_text(html), "link 3 < 4");
    }

    #[test]
    fn test_unterminated_attribute_leaks_no_markup() {
        let text = html_to_text(r#"<p title="x>Hello</p><p>World</p>"#);
        assert!(!text.contains('<'), "{text:?}");
        assert!(!text.contains("title="), "{text:?}");
    }

    #[test]
    fn test_inline_tags_separate_words() {
        let html = "<p><b>Bold</b><i>Italic</i> and <span>plain</span></p>";
        assert_eq!(html_to_text(html), "Bold Italic and plain");
    }
}
