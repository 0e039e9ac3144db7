//! Crawlability filters applied to discovered links and claimed URLs

use super::domain::{domain_of, Domain};
use super::normalize::NormalizedUrl;
use url::Url;

/// File extensions that are never fetched (images, documents, archives)
pub const EXCLUDED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "svg", "ico", "pdf", "doc", "docx", "xls", "xlsx",
    "ppt", "pptx", "zip", "rar", "7z", "gz", "tar",
];

/// Path fragments that mark pages not worth crawling
pub const EXCLUDED_PATH_SUBSTRINGS: &[&str] = &["cart", "search", "terms-of-service"];

const PAGINATION_QUERY_PARAMS: &[&str] = &["page", "p", "pg", "pagenumber", "start", "offset"];

const PAGINATION_PATH_SEGMENTS: &[&str] = &["/page/", "/p/", "/pages/"];

const PAGINATION_FRAGMENT: &str = "#page=";

/// Returns true if the URL looks like a pagination link
///
/// Matches any of:
/// - query parameters `page`, `p`, `pg`, `pagenumber`, `start`, `offset`
/// - path segments `/page/`, `/p/`, `/pages/`
/// - the fragment `#page=`
///
/// # Examples
///
/// ```
/// use sumi_sift::url::is_pagination;
///
/// assert!(is_pagination("http://example.com/blog?page=2"));
/// assert!(is_pagination("http://example.com/blog/page/3"));
/// assert!(!is_pagination("http://example.com/pages-of-history"));
/// ```
pub fn is_pagination(url: &str) -> bool {
    if url.contains(PAGINATION_FRAGMENT) {
        return true;
    }

    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    if parsed
        .query_pairs()
        .any(|(key, _)| PAGINATION_QUERY_PARAMS.contains(&key.as_ref()))
    {
        return true;
    }

    let path = parsed.path();
    PAGINATION_PATH_SEGMENTS
        .iter()
        .any(|segment| path.contains(segment))
}

/// Returns true if a discovered URL may be enqueued for this crawl
///
/// A URL is crawlable iff:
/// - its domain equals the crawl domain
/// - it carries no `#` fragment
/// - its path does not end in an excluded extension
/// - its path and query contain none of the excluded path fragments
pub fn is_crawlable(url: &NormalizedUrl, domain: &Domain) -> bool {
    if url.as_str().contains('#') {
        return false;
    }

    match domain_of(url.as_str()) {
        Ok(ref d) if d == domain => {}
        _ => return false,
    }

    let Ok(parsed) = url.to_url() else {
        return false;
    };

    let path = parsed.path();
    if has_excluded_extension(path) {
        return false;
    }

    let tail = match parsed.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };

    !EXCLUDED_PATH_SUBSTRINGS
        .iter()
        .any(|fragment| tail.contains(fragment))
}

fn has_excluded_extension(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| EXCLUDED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
