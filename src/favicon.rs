pub const DEFAULT_FAVICON_TEMPLATE: &str = "https://www.google.com/s2/favicons?domain={domain}&sz=64";

/// Builds favicon URLs from a proxy template keyed by domain.
///
/// No request is made here; the client loads the icon later.
#[derive(Debug, Clone)]
pub struct FaviconResolver {
    template: String,
}

impl Default for FaviconResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FAVICON_TEMPLATE)
    }
}

impl FaviconResolver {
    /// `template` must contain a `{domain}` placeholder.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn resolve(&self, domain: &str) -> String {
        self.template.replace("{domain}", domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template() {
        assert_eq!(
            FaviconResolver::default().resolve("example.com"),
            "https://www.google.com/s2/favicons?domain=example.com&sz=64"
        );
    }

    #[test]
    fn custom_template() {
        let resolver = FaviconResolver::new("https://icons.example.net/{domain}.ico");
        assert_eq!(resolver.resolve("rust-lang.org"), "https://icons.example.net/rust-lang.org.ico");
    }
}
