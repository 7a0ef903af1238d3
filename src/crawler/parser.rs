//! HTML parser for extracting readable text and links
//!
//! This module handles parsing HTML content to extract:
//! - A plain-text rendering of the page (anchor text kept, targets dropped)
//! - Every anchor href, in document order

use html2text::render::text_renderer::TrivialDecorator;
use scraper::{Html, Selector};

/// Nominal render width; raw mode never wraps at it
const TEXT_WIDTH: usize = 80;

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Readable text of the page
    pub text: String,

    /// Raw href values of all anchors, unresolved
    pub hrefs: Vec<String>,
}

/// Parses HTML content and extracts both text and links
///
/// # Returns
///
/// * `Ok(ParsedPage)` - The page text and every anchor href
/// * `Err(html2text::Error)` - The markup could not be rendered
///
/// # Example
///
/// ```
/// use doc_crawler::crawler::parse_html;
///
/// let html = r#"<html><body><p>See <a href="/docs/a">the guide</a>.</p></body></html>"#;
/// let parsed = parse_html(html).unwrap();
/// assert_eq!(parsed.text, "See the guide.");
/// assert_eq!(parsed.hrefs, vec!["/docs/a".to_string()]);
/// ```
pub fn parse_html(html: &str) -> Result<ParsedPage, html2text::Error> {
    Ok(ParsedPage {
        text: html_to_text(html)?,
        hrefs: extract_hrefs(html),
    })
}

/// Converts markup to plain readable text
///
/// Anchor text is kept but link targets are never rendered, lines are not
/// wrapped, and surrounding blank space is trimmed.
pub fn html_to_text(html: &str) -> Result<String, html2text::Error> {
    let text = html2text::config::with_decorator(TrivialDecorator::new())
        .raw_mode(true)
        .string_from_read(html.as_bytes(), TEXT_WIDTH)?;

    Ok(text.trim().to_string())
}

/// Collects every anchor href in document order
///
/// Anchors carrying the `download` attribute point at files, not documents,
/// and are skipped.
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut hrefs = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                hrefs.push(href.to_string());
            }
        }
    }

    hrefs
}
