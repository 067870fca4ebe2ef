//! Cache configuration, resolved from the `[cache]` settings section.

use std::time::Duration;

pub const DEFAULT_SITE_CONFIG_TTL_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Keep the site configuration in memory between requests.
    pub enable_site_config_cache: bool,
    /// How long a cached site configuration stays fresh.
    pub site_config_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable_site_config_cache: true,
            site_config_ttl_seconds: DEFAULT_SITE_CONFIG_TTL_SECS,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enable_site_config_cache: settings.enable_site_config_cache,
            site_config_ttl_seconds: settings.site_config_ttl_seconds.get(),
        }
    }
}

impl CacheConfig {
    pub fn site_config_ttl(&self) -> Duration {
        Duration::from_secs(self.site_config_ttl_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enable_site_config_cache);
        assert_eq!(config.site_config_ttl(), Duration::from_secs(300));
    }
}
