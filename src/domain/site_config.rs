//! Singleton site configuration and its embedded fallback.

use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "3rd Space";
pub const DEFAULT_DESCRIPTION: &str = "A bootleg substack of thoughts and things worth sharing.";
pub const DEFAULT_CURRENT_CHAPTER: &str = "'25";
pub const DEFAULT_BASE_URL: &str = "https://perakasem.co/pond";
pub const DEFAULT_ARTWORK_SRC: &str = "/blank.jpg";

/// A featured link shown in the sidebar: something to watch, listen to, or read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedLink {
    pub url: Option<String>,
    pub title: Option<String>,
    pub source: Option<String>,
}

impl FeaturedLink {
    fn new(url: &str, title: &str, source: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            title: Some(title.to_string()),
            source: Some(source.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub src: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub current_chapter: String,
    pub url: String,
    pub watch: FeaturedLink,
    pub media: FeaturedLink,
    pub read: FeaturedLink,
    pub artwork: Artwork,
}

impl Default for SiteConfig {
    /// The values served whenever the stored row is missing or unreachable.
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            current_chapter: DEFAULT_CURRENT_CHAPTER.to_string(),
            url: DEFAULT_BASE_URL.to_string(),
            watch: FeaturedLink::new(
                "https://youtu.be/Q0_W4SWHeWY?si=02AWC2EJLwpe1Owx",
                "The Future of Creativity",
                "Hank Green",
            ),
            media: FeaturedLink::new(
                "https://youtu.be/E8pHAQc4rxA?si=L_0o_9hUGHUmTZut",
                "MF DOOM X Tatsuro Yamashita",
                "Tanda",
            ),
            read: FeaturedLink::new(
                "https://situational-awareness.ai/",
                "Situational Awareness",
                "Leopold Aschenbrenner",
            ),
            artwork: Artwork {
                src: Some(DEFAULT_ARTWORK_SRC.to_string()),
                title: Some("Tomato Water".to_string()),
                artist: Some("OC".to_string()),
            },
        }
    }
}

impl SiteConfig {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_carries_the_embedded_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "3rd Space");
        assert_eq!(config.current_chapter, "'25");
        assert_eq!(config.url, DEFAULT_BASE_URL);
        assert_eq!(config.artwork.src.as_deref(), Some("/blank.jpg"));
        assert_eq!(config.read.source.as_deref(), Some("Leopold Aschenbrenner"));
    }

    #[test]
    fn base_url_override_replaces_only_the_url() {
        let config = SiteConfig::default().with_base_url("http://localhost:5173/pond");
        assert_eq!(config.url, "http://localhost:5173/pond");
        assert_eq!(config.title, DEFAULT_TITLE);
    }
}
