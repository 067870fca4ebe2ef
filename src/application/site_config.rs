//! Site configuration with a freshness-window cache and an embedded fallback.

use std::sync::Arc;

use metrics::counter;
use tracing::{error, warn};

use crate::application::outcome::FetchOutcome;
use crate::application::repos::{SiteConfigRecord, SiteConfigRepo};
use crate::cache::{CacheConfig, Clock, TtlCache};
use crate::domain::site_config::SiteConfig;

pub const METRIC_SITE_CONFIG_FALLBACK: &str = "pond_site_config_fallback_total";

const CACHE_NAME: &str = "site_config";

pub struct SiteConfigLoader {
    repo: Arc<dyn SiteConfigRepo>,
    cache: Option<TtlCache<SiteConfig>>,
    base_url_override: Option<String>,
}

impl SiteConfigLoader {
    pub fn new(
        repo: Arc<dyn SiteConfigRepo>,
        cache_config: &CacheConfig,
        clock: Arc<dyn Clock>,
        base_url_override: Option<String>,
    ) -> Self {
        let cache = cache_config
            .enable_site_config_cache
            .then(|| TtlCache::new(CACHE_NAME, cache_config.site_config_ttl(), clock));
        Self {
            repo,
            cache,
            base_url_override,
        }
    }

    /// Cached configuration, refetched once the freshness window has passed.
    ///
    /// A fallback produced by a failed or empty fetch is cached like any
    /// other value and served for a full window.
    pub async fn load(&self) -> Arc<SiteConfig> {
        let Some(cache) = &self.cache else {
            return Arc::new(self.fetch_uncached().await);
        };

        if let Some(config) = cache.get() {
            return config;
        }

        cache.set(self.fetch_uncached().await)
    }

    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Fetch the stored row, or the fallback, bypassing the cache.
    pub async fn fetch_uncached(&self) -> SiteConfig {
        match self.fetch_outcome().await {
            FetchOutcome::Found(config) => config,
            FetchOutcome::Empty => {
                warn!(
                    target = "application::site_config",
                    "No site configuration stored; using defaults"
                );
                self.fallback("empty")
            }
            FetchOutcome::Failed(err) => {
                error!(
                    target = "application::site_config",
                    error = %err,
                    "Failed to fetch site configuration; using defaults"
                );
                self.fallback("failed")
            }
        }
    }

    pub async fn fetch_outcome(&self) -> FetchOutcome<SiteConfig> {
        FetchOutcome::from_optional(self.repo.load_site_config().await)
            .map(|record| self.apply_override(config_from_record(record)))
    }

    fn fallback(&self, reason: &'static str) -> SiteConfig {
        counter!(METRIC_SITE_CONFIG_FALLBACK, "reason" => reason).increment(1);
        self.apply_override(SiteConfig::default())
    }

    fn apply_override(&self, config: SiteConfig) -> SiteConfig {
        match &self.base_url_override {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }
}

/// Missing required columns take the fallback value; link groups pass through.
pub fn config_from_record(record: SiteConfigRecord) -> SiteConfig {
    let defaults = SiteConfig::default();
    SiteConfig {
        title: record.title.unwrap_or(defaults.title),
        description: record.description.unwrap_or(defaults.description),
        current_chapter: record.current_chapter.unwrap_or(defaults.current_chapter),
        url: record.url.unwrap_or(defaults.url),
        watch: record.watch,
        media: record.media,
        read: record.read,
        artwork: record.artwork,
    }
}

pub fn record_from_config(config: &SiteConfig) -> SiteConfigRecord {
    SiteConfigRecord {
        title: Some(config.title.clone()),
        description: Some(config.description.clone()),
        current_chapter: Some(config.current_chapter.clone()),
        url: Some(config.url.clone()),
        watch: config.watch.clone(),
        media: config.media.clone(),
        read: config.read.clone(),
        artwork: config.artwork.clone(),
    }
}
