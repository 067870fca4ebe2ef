//! In-process caching.
//!
//! The site configuration is the only cached value: one row, refreshed at
//! most once per freshness window. The window is measured against an injected
//! [`Clock`] so tests can move time explicitly.
//!
//! ```toml
//! [cache]
//! enable_site_config_cache = true
//! site_config_ttl_seconds = 300
//! ```

mod clock;
mod config;
mod lock;
mod ttl;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, DEFAULT_SITE_CONFIG_TTL_SECS};
pub use ttl::{METRIC_CACHE_HIT, METRIC_CACHE_MISS, TtlCache};
