use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// The `scheme://host[:port]` origin a crawl is confined to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain(String);

impl Domain {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracts the domain from a URL
///
/// The domain is the lower-cased scheme and host, plus the port when one is
/// given explicitly and differs from the scheme default.
///
/// # Examples
///
/// ```
/// use sumi_sift::url::domain_of;
///
/// let domain = domain_of("http://example.com/path?q=1").unwrap();
/// assert_eq!(domain.as_str(), "http://example.com");
///
/// let domain = domain_of("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(domain.as_str(), "http://127.0.0.1:8080");
/// ```
pub fn domain_of(url: &str) -> UrlResult<Domain> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(format!("{}: {}", url, e)))?;

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| UrlError::MissingHost(url.to_string()))?;

    let mut domain = format!("{}://{}", parsed.scheme(), host.to_lowercase());
    if let Some(port) = parsed.port() {
        domain.push_str(&format!(":{}", port));
    }

    Ok(Domain(domain))
}
