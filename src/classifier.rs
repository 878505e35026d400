use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Article,
    Video,
    Tool,
    Social,
    #[default]
    Other,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Video => "video",
            ContentType::Tool => "tool",
            ContentType::Social => "social",
            ContentType::Other => "other",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const VIDEO_HOSTS: [&str; 3] = ["youtube.com", "youtu.be", "bilibili.com"];
const SOCIAL_HOSTS: [&str; 5] = [
    "twitter.com",
    "x.com",
    "xiaohongshu.com",
    "instagram.com",
    "facebook.com",
];
const TOOL_PATHS: [&str; 2] = ["/tool", "/app"];
const ARTICLE_PATHS: [&str; 3] = ["/blog", "/article", "/post"];

/// Maps a URL and its declared `og:type` onto a [`ContentType`].
///
/// Rules are substring matches evaluated in order; the first hit wins.
pub fn classify(url: &Url, declared_type: &str) -> ContentType {
    let href = url.as_str().to_lowercase();
    let path = url.path().to_lowercase();
    let declared = declared_type.to_lowercase();

    if VIDEO_HOSTS.iter().any(|h| href.contains(h)) || declared.contains("video") {
        ContentType::Video
    } else if SOCIAL_HOSTS.iter().any(|h| href.contains(h)) {
        ContentType::Social
    } else if TOOL_PATHS.iter().any(|p| path.contains(p))
        || (href.contains("github.com") && path.contains("/releases"))
    {
        ContentType::Tool
    } else if declared.contains("article") || ARTICLE_PATHS.iter().any(|p| path.contains(p)) {
        ContentType::Article
    } else {
        ContentType::Other
    }
}
