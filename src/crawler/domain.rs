use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Identity of a site: the host, plus the port when one is given explicitly.
/// Scheme, path, query and fragment never take part in it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainKey(String);

impl DomainKey {
    /// Total: anything that doesn't parse as a URL yields the empty key
    pub fn parse(raw: &str) -> Self {
        Url::parse(raw).map(|u| domain_of(&u)).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds a key from an already bare domain such as `example.com`
impl From<&str> for DomainKey {
    fn from(domain: &str) -> Self {
        Self(domain.trim().to_ascii_lowercase())
    }
}

impl From<String> for DomainKey {
    fn from(domain: String) -> Self {
        Self::from(domain.as_str())
    }
}

impl fmt::Display for DomainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn domain_of(url: &Url) -> DomainKey {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => DomainKey(format!("{}:{}", host, port)),
        (Some(host), None) => DomainKey(host.to_string()),
        _ => DomainKey::default(),
    }
}

pub fn is_external(url: &Url, origin_domain: &DomainKey) -> bool {
    domain_of(url) != *origin_domain
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_same_host_same_key() {
        let a = domain_of(&url("https://example.com/some/path?q=1"));
        let b = domain_of(&url("http://example.com"));
        let c = domain_of(&url("https://example.com/other#frag"));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.as_str(), "example.com");
    }

    #[test]
    fn test_explicit_port_is_part_of_key() {
        assert_eq!(domain_of(&url("http://127.0.0.1:8080/x")).as_str(), "127.0.0.1:8080");
        // default ports are dropped by the parser
        assert_eq!(domain_of(&url("https://example.com:443/")).as_str(), "example.com");
    }

    #[test]
    fn test_subdomain_is_a_different_site() {
        assert_ne!(
            domain_of(&url("https://blog.example.com")),
            domain_of(&url("https://example.com"))
        );
    }

    #[test]
    fn test_malformed_is_empty() {
        assert!(DomainKey::parse("not a url").is_empty());
        assert!(DomainKey::parse("").is_empty());
        assert!(domain_of(&url("mailto:someone@example.com")).is_empty());
    }

    #[test]
    fn test_is_external() {
        let origin = DomainKey::from("a.test");
        assert!(!is_external(&url("https://a.test/page"), &origin));
        assert!(is_external(&url("https://b.test/"), &origin));
        assert!(is_external(&url("https://sub.a.test/"), &origin));
    }

    #[test]
    fn test_from_str_normalizes_case() {
        assert_eq!(DomainKey::from(" Example.COM "), DomainKey::parse("https://example.com/"));
    }
}
