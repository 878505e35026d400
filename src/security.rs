use crate::error::ValidationError;
use std::collections::HashSet;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::warn;
use url::{Host, Url};

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];
const BLOCKED_HOSTS: [&str; 4] = ["localhost", "0.0.0.0", "127.0.0.1", "::1"];
const BLOCKED_SUFFIXES: [&str; 3] = [".localhost", ".local", ".internal"];

/// Configuration for URL validation
///
/// The scheme, loopback and private-network rules are always enforced. The
/// domain lists can only narrow what passes.
#[derive(Debug, Clone, Default)]
pub struct UrlValidationConfig {
    /// Domain blacklist, matches the domain and its subdomains
    pub blocked_domains: HashSet<String>,
    /// Domain whitelist (if not empty, only these domains are allowed)
    pub allowed_domains: HashSet<String>,
}

/// A URL that has cleared [`UrlValidator::validate`].
///
/// Only the validator constructs these, so every stage that takes a
/// `&ValidatedUrl` is known to run after the SSRF checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    url: Url,
    domain: String,
}

impl ValidatedUrl {
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Lowercased hostname, IPv6 literals keep their brackets.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[cfg(test)]
    pub(crate) fn assume_valid(url: &str) -> Self {
        let url = Url::parse(url).expect("test URL must parse");
        let domain = url.host_str().unwrap_or_default().to_lowercase();
        Self { url, domain }
    }
}

impl fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Validates a URL according to security policies
#[derive(Debug, Clone, Default)]
pub struct UrlValidator {
    config: UrlValidationConfig,
}

impl UrlValidator {
    pub fn new(config: UrlValidationConfig) -> Self {
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self::new(UrlValidationConfig::default())
    }

    /// Validates a URL string
    ///
    /// Only literal IP hosts are checked against private ranges; domain names
    /// are not resolved here.
    pub fn validate(&self, url_str: &str) -> Result<ValidatedUrl, ValidationError> {
        let url = Url::parse(url_str.trim()).map_err(|e| {
            warn!(url = %url_str, error = %e, "URL parsing failed");
            ValidationError::InvalidUrl(e.to_string())
        })?;

        if !ALLOWED_SCHEMES.contains(&url.scheme()) {
            warn!(url = %url_str, scheme = url.scheme(), "Unsupported URL scheme");
            return Err(ValidationError::UnsupportedProtocol(url.scheme().to_string()));
        }

        let domain = url.host_str().unwrap_or_default().to_lowercase();
        // IPv6 literals come back bracketed from host_str()
        let bare = domain
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(&domain);
        let bare = bare.strip_suffix('.').unwrap_or(bare);

        if is_blocked_host(bare) {
            warn!(host = %bare, "Blocked host");
            return Err(ValidationError::BlockedHost(bare.to_string()));
        }

        let private = match url.host() {
            Some(Host::Ipv4(ip)) => is_private_ipv4(ip),
            Some(Host::Ipv6(ip)) => is_private_ipv6(ip),
            Some(Host::Domain(name)) => looks_like_ipv4(name) && !parses_as_public_ipv4(name),
            None => false,
        };
        if private {
            warn!(host = %bare, "Private network address blocked");
            return Err(ValidationError::PrivateNetwork(bare.to_string()));
        }

        if !self.config.allowed_domains.is_empty() {
            if !self.is_domain_allowed(bare) {
                warn!(host = %bare, "Domain not in allow-list");
                return Err(ValidationError::BlockedHost(bare.to_string()));
            }
        } else if self.is_domain_blocked(bare) {
            warn!(host = %bare, "Domain in deny-list");
            return Err(ValidationError::BlockedHost(bare.to_string()));
        }

        Ok(ValidatedUrl { url, domain })
    }

    fn is_domain_allowed(&self, host: &str) -> bool {
        self.config
            .allowed_domains
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{allowed}")))
    }

    fn is_domain_blocked(&self, host: &str) -> bool {
        self.config
            .blocked_domains
            .iter()
            .any(|blocked| host == blocked || host.ends_with(&format!(".{blocked}")))
    }
}

fn is_blocked_host(host: &str) -> bool {
    host.is_empty()
        || BLOCKED_HOSTS.contains(&host)
        || BLOCKED_SUFFIXES.iter().any(|suffix| host.ends_with(suffix))
}

fn is_private_ipv4(ip: Ipv4Addr) -> bool {
    let octets = ip.octets();

    // 10.0.0.0/8, 127.0.0.0/8
    octets[0] == 10
        || octets[0] == 127
        // 192.168.0.0/16
        || (octets[0] == 192 && octets[1] == 168)
        // 172.16.0.0/12
        || (octets[0] == 172 && (16..=31).contains(&octets[1]))
        // 169.254.0.0/16, includes cloud metadata endpoints
        || (octets[0] == 169 && octets[1] == 254)
}

fn is_private_ipv6(ip: Ipv6Addr) -> bool {
    let text = ip.to_string();
    text.starts_with("fc") || text.starts_with("fd") || text.starts_with("fe80") || text == "::1"
}

fn looks_like_ipv4(host: &str) -> bool {
    let parts: Vec<&str> = host.split('.').collect();
    parts.len() == 4
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

// Fail closed: an octet outside 0-255 counts as private.
fn parses_as_public_ipv4(host: &str) -> bool {
    let octets: Option<Vec<u8>> = host.split('.').map(|part| part.parse::<u8>().ok()).collect();
    match octets {
        Some(o) => !is_private_ipv4(Ipv4Addr::new(o[0], o[1], o[2], o[3])),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrorKind;

    fn kind_of(url: &str) -> Option<ValidationErrorKind> {
        UrlValidator::with_default_config()
            .validate(url)
            .err()
            .map(|e| e.kind())
    }

    #[test]
    fn test_url_validator_schemes() {
        let validator = UrlValidator::with_default_config();

        assert!(validator.validate("https://example.com").is_ok());
        assert!(validator.validate("http://example.com").is_ok());
        assert_eq!(kind_of("ftp://example.com"), Some(ValidationErrorKind::UnsupportedProtocol));
        assert_eq!(kind_of("file:///etc/passwd"), Some(ValidationErrorKind::UnsupportedProtocol));
        assert_eq!(kind_of("javascript:alert(1)"), Some(ValidationErrorKind::UnsupportedProtocol));
        assert_eq!(kind_of("not a url"), Some(ValidationErrorKind::InvalidUrl));
    }

    #[test]
    fn test_url_validator_localhost() {
        for url in [
            "http://localhost",
            "http://LOCALHOST:8080",
            "http://localhost.",
            "http://127.0.0.1",
            "http://[::1]",
            "http://0.0.0.0",
            "http://app.localhost",
            "http://printer.local",
            "http://metadata.google.internal",
        ] {
            assert_eq!(kind_of(url), Some(ValidationErrorKind::BlockedHost), "{url}");
        }
    }

    #[test]
    fn test_url_validator_private_ips() {
        for url in [
            "http://10.0.0.1",
            "http://192.168.1.1",
            "http://172.16.0.1",
            "http://172.20.0.5",
            "http://172.31.255.255",
            "http://169.254.169.254/latest/meta-data",
            "http://127.0.0.2",
            "http://[fe80::1]",
            "http://[fc00::1]",
            "http://[fd12:3456::1]",
        ] {
            assert_eq!(kind_of(url), Some(ValidationErrorKind::PrivateNetwork), "{url}");
        }
    }

    #[test]
    fn public_literals_pass() {
        let validator = UrlValidator::with_default_config();
        assert!(validator.validate("http://8.8.8.8").is_ok());
        assert!(validator.validate("http://172.32.0.1").is_ok());
        assert!(validator.validate("http://[2001:4860:4860::8888]").is_ok());
    }

    #[test]
    fn octet_check_fails_closed() {
        assert!(looks_like_ipv4("300.1.1.1"));
        assert!(!parses_as_public_ipv4("300.1.1.1"));
        assert!(parses_as_public_ipv4("8.8.4.4"));
        assert!(!looks_like_ipv4("example.com"));
    }

    #[test]
    fn hostname_is_lowercased() {
        let validated = UrlValidator::with_default_config()
            .validate("https://Example.COM/Path")
            .unwrap();
        assert_eq!(validated.domain(), "example.com");
        assert_eq!(validated.as_str(), "https://example.com/Path");
    }

    #[test]
    fn test_url_validator_domain_lists() {
        let mut config = UrlValidationConfig::default();
        config.blocked_domains.insert("evil.com".to_string());
        let validator = UrlValidator::new(config);

        assert!(validator.validate("http://evil.com").is_err());
        assert!(validator.validate("http://sub.evil.com").is_err());
        assert!(validator.validate("http://good.com").is_ok());
    }

    #[test]
    fn test_url_validator_whitelist() {
        let mut config = UrlValidationConfig::default();
        config.allowed_domains.insert("trusted.com".to_string());
        let validator = UrlValidator::new(config);

        assert!(validator.validate("http://trusted.com").is_ok());
        assert!(validator.validate("http://sub.trusted.com").is_ok());
        assert!(validator.validate("http://untrusted.com").is_err());
        // the allow-list never overrides the loopback rules
        assert!(validator.validate("http://localhost").is_err());
    }
}
