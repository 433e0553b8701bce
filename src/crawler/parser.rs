//! HTML parser for extracting the title, anchors, and images
//!
//! This is the parse capability: raw HTML in, raw reference strings out.
//! Reference resolution against the page URL happens in [`crate::Page`],
//! never here.

use scraper::{Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from the <title> tag), trimmed
    pub title: Option<String>,

    /// href values of <a> tags, in document order, unresolved
    pub anchor_hrefs: Vec<String>,

    /// src values of <img> tags, in document order, unresolved
    pub image_srcs: Vec<String>,
}

/// Parses HTML content and extracts the title, anchor hrefs, and image srcs
///
/// Malformed HTML never fails: the tokenizer recovers and we extract what we
/// can. Empty href/src attributes are dropped; everything else, including
/// `mailto:` and other non-http references, is passed through for the
/// frontier to filter.
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        anchor_hrefs: extract_attr_values(&document, "a[href]", "href"),
        image_srcs: extract_attr_values(&document, "img[src]", "src"),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects non-empty values of `attr` for every element matching `selector`
fn extract_attr_values(document: &Html, selector: &str, attr: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        let parsed = parse_html("<html><head><title>  Test Page </title></head></html>");
        assert_eq!(parsed.title, Some("Test Page".to_string()));
    }

    #[test]
    fn test_no_title() {
        let parsed = parse_html("<html><head></head><body></body></html>");
        assert_eq!(parsed.title, None);
    }

    #[test]
    fn test_empty_title_is_none() {
        let parsed = parse_html("<html><head><title>   </title></head></html>");
        assert_eq!(parsed.title, None);
    }

    #[test]
    fn test_anchors_in_document_order() {
        let html = r#"
            <html><body>
                <a href="/one">1</a>
                <a href="two">2</a>
                <a href="https://other.com/three">3</a>
            </body></html>
        "#;
        let parsed = parse_html(html);
        assert_eq!(parsed.anchor_hrefs, vec!["/one", "two", "https://other.com/three"]);
    }

    #[test]
    fn test_duplicates_are_kept_here() {
        // Dedup is the page's job, not the parser's
        let html = r#"<a href="/a">1</a><a href="/a">2</a>"#;
        let parsed = parse_html(html);
        assert_eq!(parsed.anchor_hrefs.len(), 2);
    }

    #[test]
    fn test_anchor_without_href_skipped() {
        let parsed = parse_html(r#"<a name="top">anchor</a><a href="/x">x</a>"#);
        assert_eq!(parsed.anchor_hrefs, vec!["/x"]);
    }

    #[test]
    fn test_empty_href_skipped() {
        let parsed = parse_html(r#"<a href="">empty</a><a href="  ">blank</a>"#);
        assert!(parsed.anchor_hrefs.is_empty());
    }

    #[test]
    fn test_images() {
        let html = r#"<img src="/logo.png"><img alt="no src"><img src="icons/x.svg">"#;
        let parsed = parse_html(html);
        assert_eq!(parsed.image_srcs, vec!["/logo.png", "icons/x.svg"]);
    }

    #[test]
    fn test_non_http_refs_pass_through() {
        let parsed = parse_html(r#"<a href="mailto:a@b.com">mail</a>"#);
        assert_eq!(parsed.anchor_hrefs, vec!["mailto:a@b.com"]);
    }

    #[test]
    fn test_malformed_html_recovers() {
        let parsed = parse_html("<html><body><a href='/x'>unclosed");
        assert_eq!(parsed.anchor_hrefs, vec!["/x"]);
    }
}
