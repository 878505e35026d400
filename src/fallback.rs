use crate::classifier::classify;
use crate::favicon::FaviconResolver;
use crate::utils::humanize_slug;
use crate::LinkPreview;
use tracing::debug;
use url::Url;

const MAX_TITLE_CHARS: usize = 100;

/// Builds a preview from the URL alone, for when the page could not be
/// fetched or parsed. Never fails.
pub fn synthesize_fallback(url: &str, favicons: &FaviconResolver) -> LinkPreview {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(url = %url, error = %e, "Fallback could not re-parse URL");
            return LinkPreview {
                title: url.to_string(),
                url: url.to_string(),
                site_name: url.to_string(),
                domain: url.to_string(),
                ..Default::default()
            };
        }
    };

    let domain = parsed.host_str().unwrap_or_default().to_lowercase();

    let title = parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(humanize_slug)
        .filter(|t| !t.is_empty() && t.chars().count() <= MAX_TITLE_CHARS)
        .unwrap_or_else(|| domain.clone());

    LinkPreview {
        title,
        description: format!("Content from {domain}"),
        image: String::new(),
        url: url.to_string(),
        site_name: domain.clone(),
        favicon_url: favicons.resolve(&domain),
        content_type: classify(&parsed, ""),
        domain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContentType;

    #[test]
    fn title_from_last_path_segment() {
        let preview = synthesize_fallback(
            "https://example.com/blog/how_to-write-rust.html/",
            &FaviconResolver::default(),
        );
        assert_eq!(preview.title, "How To Write Rust");
        assert_eq!(preview.description, "Content from example.com");
        assert_eq!(preview.site_name, "example.com");
        assert_eq!(preview.domain, "example.com");
        assert_eq!(preview.image, "");
        assert_eq!(preview.content_type, ContentType::Article);
        assert_eq!(
            preview.favicon_url,
            "https://www.google.com/s2/favicons?domain=example.com&sz=64"
        );
    }

    #[test]
    fn bare_domain_uses_domain_as_title() {
        let preview = synthesize_fallback("https://example.com/", &FaviconResolver::default());
        assert_eq!(preview.title, "example.com");
        assert_eq!(preview.content_type, ContentType::Other);
    }

    #[test]
    fn overlong_title_uses_domain() {
        let url = format!("https://example.com/{}", "a".repeat(101));
        let preview = synthesize_fallback(&url, &FaviconResolver::default());
        assert_eq!(preview.title, "example.com");
    }

    #[test]
    fn unparsable_url_gives_minimal_preview() {
        let preview = synthesize_fallback("::not a url::", &FaviconResolver::default());
        assert_eq!(preview.title, "::not a url::");
        assert_eq!(preview.site_name, "::not a url::");
        assert_eq!(preview.domain, "::not a url::");
        assert_eq!(preview.favicon_url, "");
        assert_eq!(preview.description, "");
    }
}
