use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

const TITLE_SOURCES: [&str; 2] = ["og:title", "twitter:title"];
const DESCRIPTION_SOURCES: [&str; 3] = ["og:description", "twitter:description", "description"];
const IMAGE_SOURCES: [&str; 4] = [
    "og:image",
    "twitter:image",
    "og:image:url",
    "twitter:image:src",
];
const CONTENT_IMAGE_SELECTOR: &str = "article img, main img, .content img";

/// Fields pulled out of a page before classification and favicon lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub image: String,
    pub site_name: String,
    /// Raw `og:type` content, empty when absent.
    pub declared_type: String,
}

/// Metadata extractor, responsible for extracting preview information from webpage content
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Each field takes the first non-empty source in precedence order.
    /// Never fails: a page with no recognizable tags yields empty strings and
    /// the domain as site name.
    pub fn extract(&self, html: &str, page_url: &Url) -> PageMetadata {
        let document = Html::parse_document(html);

        let title = first_meta(&document, &TITLE_SOURCES)
            .or_else(|| title_text(&document))
            .unwrap_or_default();

        let description = first_meta(&document, &DESCRIPTION_SOURCES).unwrap_or_default();

        let image = first_meta(&document, &IMAGE_SOURCES)
            .and_then(|src| resolve_against_origin(&src, page_url))
            .or_else(|| {
                content_image(&document).and_then(|src| resolve_against_origin(&src, page_url))
            })
            .unwrap_or_default();

        let site_name = first_meta(&document, &["og:site_name"])
            .unwrap_or_else(|| page_url.host_str().unwrap_or_default().to_lowercase());

        let declared_type = first_meta(&document, &["og:type"]).unwrap_or_default();

        debug!(
            url = %page_url,
            has_title = !title.is_empty(),
            has_description = !description.is_empty(),
            has_image = !image.is_empty(),
            declared_type = %declared_type,
            "Metadata extracted"
        );

        PageMetadata {
            title,
            description,
            image,
            site_name,
            declared_type,
        }
    }
}

/// Looks up `<meta>` content by `property` or `name`, trying `keys` in order.
fn first_meta(document: &Html, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| meta_content(document, key))
}

fn meta_content(document: &Html, key: &str) -> Option<String> {
    let selector =
        Selector::parse(&format!(r#"meta[property="{key}"], meta[name="{key}"]"#)).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}

fn title_text(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn content_image(document: &Html) -> Option<String> {
    let selector = Selector::parse(CONTENT_IMAGE_SELECTOR).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el: ElementRef| el.value().attr("src"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Absolute `http(s)` URLs pass through; anything else is joined onto the
/// page origin. A source that cannot be resolved counts as absent.
fn resolve_against_origin(src: &str, page_url: &Url) -> Option<String> {
    let lower = src.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(src.to_string());
    }

    let origin = Url::parse(&page_url.origin().ascii_serialization()).ok()?;
    match origin.join(src) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(e) => {
            debug!(src = %src, error = %e, "Could not resolve image URL");
            None
        }
    }
}
