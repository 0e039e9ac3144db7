//! HTML extraction of page metadata and outbound links
//!
//! This module turns a fetched page into:
//! - a [`PageRecord`] (URL, status code, title, meta description, headings)
//! - the same-domain links worth crawling next

use crate::crawler::fetcher::FetchedPage;
use crate::output::{Field, PageRecord};
use crate::url::{is_crawlable, resolve, Domain, NormalizedUrl};
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// Metadata of the page
    pub record: PageRecord,

    /// Crawlable same-domain links, first occurrence order, no duplicates
    pub links: Vec<NormalizedUrl>,
}

/// Extracts the record and links of a fetched page
///
/// Returns None when the response is not HTML; such pages produce neither
/// a record nor links.
pub fn extract(
    url: &NormalizedUrl,
    page: &FetchedPage,
    domain: &Domain,
    heading_levels: &[u8],
) -> Option<ExtractedPage> {
    if !page.is_html() {
        tracing::warn!("Filtered out: {} ({})", url, display_type(&page.content_type));
        return None;
    }

    Some(parse_html(
        &page.body,
        url,
        page.status_code,
        domain,
        heading_levels,
    ))
}

fn display_type(content_type: &str) -> &str {
    if content_type.is_empty() {
        "no content type"
    } else {
        content_type
    }
}

/// Parses HTML content and builds the page record and link list
///
/// # Record Fields
///
/// - `URL` and `Status code` always
/// - `Title` when a non-empty `<title>` exists
/// - `META Description` when `<meta name="description" content="...">` exists
/// - `H<level> - <n>` for the n-th heading of every requested level
///
/// # Links
///
/// Every `<a href>` is resolved against `url`; only links passing
/// [`is_crawlable`] for `domain` are kept.
///
/// # Example
///
/// ```
/// use sumi_sift::crawler::parse_html;
/// use sumi_sift::output::Field;
/// use sumi_sift::url::{domain_of, normalize};
///
/// let url = normalize("http://example.com");
/// let domain = domain_of(url.as_str()).unwrap();
/// let html = r#"<title>Home</title><h1>Welcome</h1><a href="/about">About</a>"#;
///
/// let page = parse_html(html, &url, 200, &domain, &[1, 2]);
/// assert_eq!(page.record.get(&Field::Title), Some("Home"));
/// assert_eq!(page.links[0].as_str(), "http://example.com/about");
/// ```
pub fn parse_html(
    html: &str,
    url: &NormalizedUrl,
    status_code: u16,
    domain: &Domain,
    heading_levels: &[u8],
) -> ExtractedPage {
    let document = Html::parse_document(html);
    let mut record = PageRecord::new(url, status_code);

    for &level in heading_levels {
        for (i, text) in extract_headings(&document, level).into_iter().enumerate() {
            record.insert(Field::heading(level, i + 1), text);
        }
    }

    if let Some(title) = extract_title(&document) {
        record.insert(Field::Title, title);
    }

    if let Some(description) = extract_meta_description(&document) {
        record.insert(Field::MetaDescription, description);
    }

    let links = extract_links(&document, url, domain);

    ExtractedPage { record, links }
}

/// Trimmed text of every `<h{level}>` in document order
fn extract_headings(document: &Html, level: u8) -> Vec<String> {
    let Ok(selector) = Selector::parse(&format!("h{}", level)) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect()
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Content of the first `<meta name="description">` carrying one
fn extract_meta_description(document: &Html) -> Option<String> {
    let meta_selector = Selector::parse("meta[name][content]").ok()?;

    document
        .select(&meta_selector)
        .find(|element| {
            element
                .value()
                .attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
        })
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
}

/// Resolves and filters all `<a href>` links of the document
fn extract_links(document: &Html, url: &NormalizedUrl, domain: &Domain) -> Vec<NormalizedUrl> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(link) = resolve(url, href) else {
            continue;
        };

        if is_crawlable(&link, domain) && seen.insert(link.clone()) {
            links.push(link);
        }
    }

    tracing::trace!("{}: {} crawlable links", url, links.len());
    links
}
