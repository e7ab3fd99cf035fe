//! HTML to bounded plain text.
//!
//! Boilerplate elements are dropped first; of what remains, the `<article>`
//! or `<main>` subtree is preferred over the whole `<body>`. Whitespace is
//! collapsed and citation markers and email addresses are removed.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Elements whose text never reaches the output.
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "nav", "footer", "iframe", "aside", "form",
];

/// Subtrees tried, in order, as the main content.
const CONTENT_SELECTORS: &[&str] = &["article", "main", "body"];

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static CITATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]+\]").unwrap());
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

/// Extract readable text from an HTML page, cut to `max_chars` characters.
pub fn clean_html(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);
    let root = main_content(&document);
    let raw = visible_text(root);

    let text = collapse_whitespace(&raw);
    let text = CITATION.replace_all(&text, "");
    let text = EMAIL.replace_all(&text, "");
    let text = collapse_whitespace(&text);

    truncate_chars(text.trim(), max_chars)
}

/// The page `<title>`, if present and non-blank.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()).trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Collapse runs of whitespace into a single space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}

/// Keep at most `max_chars` characters (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn main_content(document: &Html) -> ElementRef<'_> {
    for selector_str in CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str)
            && let Some(element) = document.select(&selector).find(|el| !inside_skipped(el))
        {
            return element;
        }
    }
    document.root_element()
}

/// True when an ancestor is a boilerplate element.
fn inside_skipped(element: &ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(|node| node.value().as_element())
        .any(|el| SKIPPED_ELEMENTS.contains(&el.name()))
}

fn visible_text(root: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != root.id())
            .chain(std::iter::once(*root))
            .filter_map(|ancestor| ancestor.value().as_element())
            .any(|el| SKIPPED_ELEMENTS.contains(&el.name()));
        if !hidden {
            parts.push(&**text);
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_article_over_body() {
        let html = r#"<html><body>
            <p>Cookie banner</p>
            <article><h1>Paris</h1><p>Paris is the capital of France.</p></article>
        </body></html>"#;
        assert_eq!(clean_html(html, 5000), "Paris Paris is the capital of France.");
    }

    #[test]
    fn falls_back_to_main_then_body() {
        let main = "<body><p>outside</p><main>inside main</main></body>";
        assert_eq!(clean_html(main, 5000), "inside main");

        let body = "<body><p>just   the\n\n body</p></body>";
        assert_eq!(clean_html(body, 5000), "just the body");
    }

    #[test]
    fn strips_boilerplate_elements() {
        let html = r#"<body>
            <nav>Home | About</nav>
            <script>var x = 1;</script>
            <style>p { color: red }</style>
            <p>Real content</p>
            <aside>Related links</aside>
            <form><label>Email</label></form>
            <iframe>ad</iframe>
            <footer>Copyright</footer>
        </body>"#;
        assert_eq!(clean_html(html, 5000), "Real content");
    }

    #[test]
    fn article_in_sidebar_is_not_main_content() {
        let html = "<body><main><p>Paris is the capital of France.</p></main>\
                    <aside><article>Related: Top 10 hotels</article></aside></body>";
        assert_eq!(clean_html(html, 5000), "Paris is the capital of France.");
    }

    #[test]
    fn article_in_footer_falls_back_to_body() {
        let html = "<body><footer><article>Newsletter signup</article></footer>\
                    <p>Real body text.</p></body>";
        assert_eq!(clean_html(html, 5000), "Real body text.");
    }

    #[test]
    fn removes_citations_and_emails() {
        let html = "<body><p>Paris[1] is large[citation needed]. Contact info@paris.fr today.</p></body>";
        assert_eq!(clean_html(html, 5000), "Paris is large. Contact today.");
    }

    #[test]
    fn truncates_to_exact_ceiling() {
        let html = format!("<body><p>{}</p></body>", "word ".repeat(3000));
        let text = clean_html(&html, 5000);
        assert_eq!(text.chars().count(), 5000);
    }

    #[test]
    fn short_text_is_not_padded() {
        assert_eq!(clean_html("<body>tiny</body>", 5000), "tiny");
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("éééé", 2), "éé");
    }

    #[test]
    fn title_extraction() {
        let html = "<html><head><title>  Paris -\n Wikipedia </title></head><body></body></html>";
        assert_eq!(extract_title(html).as_deref(), Some("Paris - Wikipedia"));
        assert_eq!(extract_title("<body>no title</body>"), None);
    }
}
