use crate::UrlError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use url::Url;

/// A URL in canonical form
///
/// Two URLs that denote the same resource compare equal after normalization,
/// which is what makes the visited-set dedup sound. The canonical form is:
///
/// 1. Parse the URL; reject if malformed
/// 2. Lowercase the host
/// 3. Remove the fragment (everything after #)
/// 4. Remove the default port
/// 5. Normalize the path:
///    - Remove dot segments (. and ..)
///    - Collapse duplicate slashes
///    - Remove trailing slash (except for the root /)
///    - Empty path becomes /
///
/// Normalization is idempotent: `parse(u.as_str())` returns `u` unchanged.
/// Non-http(s) schemes are accepted here; scope filtering belongs to the
/// frontier, not to URL parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl {
    url: Url,
}

impl NormalizedUrl {
    /// Parses and canonicalizes an absolute URL string
    ///
    /// # Examples
    ///
    /// ```
    /// use sitetree::NormalizedUrl;
    ///
    /// let url = NormalizedUrl::parse("https://EXAMPLE.com/a/../b/#top").unwrap();
    /// assert_eq!(url.as_str(), "https://example.com/b");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
        Ok(Self {
            url: canonicalize(url),
        })
    }

    /// Resolves a possibly-relative reference against this URL
    ///
    /// Handles `/path`, `//host/path`, `path`, `#frag`, and fully-qualified
    /// references per standard URL-resolution rules, then normalizes the
    /// result. A reference resolving to a non-http(s) scheme is still
    /// returned; the frontier's scope predicate rejects it later.
    pub fn resolve(&self, reference: &str) -> Result<Self, UrlError> {
        let joined = self
            .url
            .join(reference.trim())
            .map_err(|e| UrlError::Resolve {
                reference: reference.to_string(),
                base: self.url.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            url: canonicalize(joined),
        })
    }

    /// Returns the canonical text form
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Returns the URL scheme (e.g. "https")
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Returns true for http and https URLs
    pub fn is_http(&self) -> bool {
        matches!(self.url.scheme(), "http" | "https")
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl Serialize for NormalizedUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NormalizedUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NormalizedUrl::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Applies the canonicalization rules to an already-parsed URL
fn canonicalize(mut url: Url) -> Url {
    url.set_fragment(None);

    // mailto:, data:, javascript: and friends have no hierarchical structure
    // to normalize; they only lose their fragment.
    if url.cannot_be_a_base() {
        return url;
    }

    if let Some(host) = url.host_str() {
        let lowered = host.to_lowercase();
        if lowered != host {
            // Only fails for invalid hosts, which Url::parse already rejected
            let _ = url.set_host(Some(&lowered));
        }
    }

    let normalized_path = normalize_path(url.path());
    if normalized_path != url.path() {
        url.set_path(&normalized_path);
    }

    url
}

/// Normalizes a URL path by removing dot segments, duplicate slashes, and
/// the trailing slash (except for the root path)
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_host() {
        let url = NormalizedUrl::parse("https://EXAMPLE.COM/Page").unwrap();
        assert_eq!(url.as_str(), "https://example.com/Page");
    }

    #[test]
    fn test_remove_fragment() {
        let url = NormalizedUrl::parse("https://example.com/page#section").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_remove_default_port() {
        let url = NormalizedUrl::parse("https://example.com:443/page").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keep_explicit_port() {
        let url = NormalizedUrl::parse("http://example.com:8080/page").unwrap();
        assert_eq!(url.as_str(), "http://example.com:8080/page");
    }

    #[test]
    fn test_remove_trailing_slash() {
        let url = NormalizedUrl::parse("https://example.com/page/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keep_root_slash() {
        let url = NormalizedUrl::parse("https://example.com/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let url = NormalizedUrl::parse("https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_dot_segments() {
        let url = NormalizedUrl::parse("https://example.com/a/../b/./c").unwrap();
        assert_eq!(url.as_str(), "https://example.com/b/c");
    }

    #[test]
    fn test_multiple_slashes() {
        let url = NormalizedUrl::parse("https://example.com///a//b///c").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a/b/c");
    }

    #[test]
    fn test_parent_directory_at_root() {
        let url = NormalizedUrl::parse("https://example.com/../page").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_idempotent() {
        let cases = [
            "https://EX.com/a/",
            "http://example.com:80/x/../y?q=1#frag",
            "https://example.com",
            "mailto:someone@example.com",
        ];
        for raw in cases {
            let once = NormalizedUrl::parse(raw).unwrap();
            let twice = NormalizedUrl::parse(once.as_str()).unwrap();
            assert_eq!(once, twice, "normalization not idempotent for {}", raw);
        }
    }

    #[test]
    fn test_equivalence() {
        let a = NormalizedUrl::parse("https://EX.com/a/").unwrap();
        let b = NormalizedUrl::parse("https://ex.com/a").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_malformed_url() {
        assert!(NormalizedUrl::parse("not a url").is_err());
        assert!(NormalizedUrl::parse("").is_err());
    }

    #[test]
    fn test_relative_without_base_fails() {
        let result = NormalizedUrl::parse("/just/a/path");
        assert!(matches!(result, Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_resolve_absolute_path() {
        let base = NormalizedUrl::parse("https://example.com/docs/page").unwrap();
        let resolved = base.resolve("/logo.png").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/logo.png");
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = NormalizedUrl::parse("https://example.com/docs/page").unwrap();
        let resolved = base.resolve("other").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/docs/other");
    }

    #[test]
    fn test_resolve_protocol_relative() {
        let base = NormalizedUrl::parse("https://example.com/page").unwrap();
        let resolved = base.resolve("//other.com/x").unwrap();
        assert_eq!(resolved.as_str(), "https://other.com/x");
    }

    #[test]
    fn test_resolve_fragment_only() {
        let base = NormalizedUrl::parse("https://example.com/page").unwrap();
        let resolved = base.resolve("#section").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_resolve_fully_qualified() {
        let base = NormalizedUrl::parse("https://example.com/page").unwrap();
        let resolved = base.resolve("https://other.com/About/").unwrap();
        assert_eq!(resolved.as_str(), "https://other.com/About");
    }

    #[test]
    fn test_resolve_non_http_scheme_returned() {
        let base = NormalizedUrl::parse("https://example.com/page").unwrap();
        let resolved = base.resolve("mailto:test@example.com").unwrap();
        assert_eq!(resolved.scheme(), "mailto");
        assert!(!resolved.is_http());
    }

    #[test]
    fn test_resolve_dot_segments_escaping_root() {
        let base = NormalizedUrl::parse("https://example.com/a/b").unwrap();
        let resolved = base.resolve("../../../up").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/up");
    }
}
