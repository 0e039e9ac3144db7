use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// A URL in its canonical crawl identity form
///
/// The whole string is lower-cased and trailing slashes are stripped, so
/// `http://Example.com/About/` and `http://example.com/about` are the same
/// frontier entity. The frontier and the visited states only ever compare
/// values of this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    /// Returns the normalized URL as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the normalized form into a `url::Url`
    pub fn to_url(&self) -> UrlResult<Url> {
        Url::parse(&self.0).map_err(|e| UrlError::Parse(format!("{}: {}", self.0, e)))
    }

    /// Consumes the wrapper and returns the inner string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes a raw URL string into its crawl identity
///
/// Lower-cases the whole string and strips every trailing slash. This never
/// fails and is idempotent: `normalize(normalize(u)) == normalize(u)`.
///
/// # Examples
///
/// ```
/// use sumi_sift::url::normalize;
///
/// assert_eq!(normalize("http://Example.com/About/").as_str(), "http://example.com/about");
/// ```
pub fn normalize(raw: &str) -> NormalizedUrl {
    NormalizedUrl(raw.to_lowercase().trim_end_matches('/').to_string())
}

/// Sanitizes user input into a normalized seed URL
///
/// # Steps
///
/// 1. Trim surrounding whitespace
/// 2. Prepend `http://` when no HTTP(S) scheme is present
/// 3. Normalize case and trailing slashes
/// 4. Require a well-formed absolute HTTP(S) URL with a host
///
/// # Errors
///
/// * `UrlError::InvalidScheme` - input names a non-HTTP scheme such as `ftp://`
/// * `UrlError::Parse` - the result is not a well-formed URL
/// * `UrlError::MissingHost` - the result has no host
///
/// # Examples
///
/// ```
/// use sumi_sift::url::sanitize;
///
/// let seed = sanitize("example.com").unwrap();
/// assert_eq!(seed.as_str(), "http://example.com");
/// ```
pub fn sanitize(raw: &str) -> UrlResult<NormalizedUrl> {
    let trimmed = raw.trim();

    let with_scheme = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else if let Some(scheme) = explicit_scheme(trimmed) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            scheme
        )));
    } else {
        format!("http://{}", trimmed)
    };

    let normalized = normalize(&with_scheme);
    let parsed = normalized.to_url()?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(UrlError::InvalidScheme(parsed.scheme().to_string()));
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(normalized),
        _ => Err(UrlError::MissingHost(normalized.into_string())),
    }
}

/// Scheme of an input written as `scheme://...`, if it has one
fn explicit_scheme(s: &str) -> Option<&str> {
    let (scheme, _) = s.split_once("://")?;
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_valid = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    (starts_alpha && rest_valid).then_some(scheme)
}

fn has_http_scheme(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolves an href found on `base` into a normalized absolute URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs and same-page fragment links
/// - javascript:, mailto:, tel: and data: links
/// - hrefs that cannot be joined onto the base
/// - non-HTTP(S) URLs after resolution
pub fn resolve(base: &NormalizedUrl, href: &str) -> Option<NormalizedUrl> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let base_url = base.to_url().ok()?;
    let absolute = base_url.join(href).ok()?;

    if absolute.scheme() == "http" || absolute.scheme() == "https" {
        Some(normalize(absolute.as_str()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(
            normalize("HTTP://EXAMPLE.COM/Page").as_str(),
            "http://example.com/page"
        );
    }

    #[test]
    fn test_normalize_strips_trailing_slashes() {
        assert_eq!(normalize("http://example.com/a//").as_str(), "http://example.com/a");
        assert_eq!(normalize("http://example.com/").as_str(), "http://example.com");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "http://Example.com/About/",
            "https://example.com/a/b/?Q=1",
            "HTTP://EXAMPLE.COM///",
            "example.com/x/ /",
            "",
        ];

        for input in inputs {
            let once = normalize(input);
            let twice = normalize(once.as_str());
            assert_eq!(once, twice, "normalize not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_case_and_slash_variants_are_equal() {
        assert_eq!(
            normalize("http://example.com/About/"),
            normalize("http://EXAMPLE.com/about")
        );
    }

    #[test]
    fn test_sanitize_adds_scheme() {
        assert_eq!(sanitize("example.com").unwrap().as_str(), "http://example.com");
    }

    #[test]
    fn test_sanitize_keeps_https() {
        assert_eq!(
            sanitize("https://Example.com/Docs/").unwrap().as_str(),
            "https://example.com/docs"
        );
    }

    #[test]
    fn test_sanitize_uppercase_scheme() {
        assert_eq!(
            sanitize("HTTPS://example.com").unwrap().as_str(),
            "https://example.com"
        );
    }

    #[test]
    fn test_sanitize_trims_whitespace() {
        assert_eq!(
            sanitize("  example.com/page/ \n").unwrap().as_str(),
            "http://example.com/page"
        );
    }

    #[test]
    fn test_sanitize_rejects_other_scheme() {
        let result = sanitize("ftp://example.com");
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_sanitize_url_in_query_is_not_a_scheme() {
        assert_eq!(
            sanitize("example.com/go?to=http://other.com").unwrap().as_str(),
            "http://example.com/go?to=http://other.com"
        );
    }

    #[test]
    fn test_sanitize_rejects_empty() {
        assert!(sanitize("").is_err());
        assert!(sanitize("   ").is_err());
    }

    #[test]
    fn test_sanitize_rejects_garbage() {
        assert!(sanitize("http://exa mple.com").is_err());
    }

    #[test]
    fn test_resolve_relative_link() {
        let base = normalize("http://example.com/blog/post");
        assert_eq!(
            resolve(&base, "/About/").unwrap().as_str(),
            "http://example.com/about"
        );
        assert_eq!(
            resolve(&base, "other").unwrap().as_str(),
            "http://example.com/blog/other"
        );
    }

    #[test]
    fn test_resolve_absolute_link() {
        let base = normalize("http://example.com");
        assert_eq!(
            resolve(&base, "https://Other.com/x").unwrap().as_str(),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_resolve_skips_special_schemes() {
        let base = normalize("http://example.com");
        assert!(resolve(&base, "javascript:void(0)").is_none());
        assert!(resolve(&base, "mailto:a@example.com").is_none());
        assert!(resolve(&base, "tel:+123").is_none());
        assert!(resolve(&base, "data:text/html,hi").is_none());
        assert!(resolve(&base, "#top").is_none());
        assert!(resolve(&base, "   ").is_none());
    }

    #[test]
    fn test_resolve_keeps_fragment_on_other_page() {
        let base = normalize("http://example.com");
        let resolved = resolve(&base, "/faq#shipping").unwrap();
        assert_eq!(resolved.as_str(), "http://example.com/faq#shipping");
    }
}
