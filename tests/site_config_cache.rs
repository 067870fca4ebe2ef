use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use pond::application::repos::{RepoError, SiteConfigRecord, SiteConfigRepo};
use pond::application::site_config::SiteConfigLoader;
use pond::cache::{CacheConfig, ManualClock};
use pond::domain::site_config::{DEFAULT_TITLE, SiteConfig};

/// Counts fetches and serves whatever `record` currently holds.
#[derive(Default)]
struct CountingSiteRepo {
    record: Mutex<Option<SiteConfigRecord>>,
    fail: Mutex<bool>,
    fetches: AtomicUsize,
}

impl CountingSiteRepo {
    fn storing(title: &str) -> Self {
        Self {
            record: Mutex::new(Some(record(title))),
            ..Default::default()
        }
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

fn record(title: &str) -> SiteConfigRecord {
    SiteConfigRecord {
        title: Some(title.to_string()),
        description: Some("Notes".to_string()),
        current_chapter: Some("'24".to_string()),
        url: Some("https://example.com/pond".to_string()),
        ..Default::default()
    }
}

#[async_trait]
impl SiteConfigRepo for CountingSiteRepo {
    async fn load_site_config(&self) -> Result<Option<SiteConfigRecord>, RepoError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if *self.fail.lock().await {
            return Err(RepoError::from_persistence("relation \"site_config\" is unreachable"));
        }
        Ok(self.record.lock().await.clone())
    }

    async fn upsert_site_config(&self, record: SiteConfigRecord) -> Result<(), RepoError> {
        *self.record.lock().await = Some(record);
        Ok(())
    }
}

fn loader(
    repo: Arc<CountingSiteRepo>,
    clock: Arc<ManualClock>,
    override_url: Option<&str>,
) -> SiteConfigLoader {
    SiteConfigLoader::new(
        repo,
        &CacheConfig::default(),
        clock,
        override_url.map(str::to_string),
    )
}

#[tokio::test]
async fn two_loads_within_the_window_fetch_once() {
    let repo = Arc::new(CountingSiteRepo::storing("Pond"));
    let clock = Arc::new(ManualClock::new());
    let site = loader(repo.clone(), clock.clone(), None);

    let first = site.load().await;
    clock.advance(Duration::from_secs(299));
    let second = site.load().await;

    assert_eq!(repo.fetches(), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.title, "Pond");
}

#[tokio::test]
async fn load_after_expiry_refetches_exactly_once() {
    let repo = Arc::new(CountingSiteRepo::storing("Pond"));
    let clock = Arc::new(ManualClock::new());
    let site = loader(repo.clone(), clock.clone(), None);

    site.load().await;
    *repo.record.lock().await = Some(record("Renamed"));

    clock.advance(Duration::from_secs(300));
    let refreshed = site.load().await;
    let again = site.load().await;

    assert_eq!(repo.fetches(), 2);
    assert_eq!(refreshed.title, "Renamed");
    assert!(Arc::ptr_eq(&refreshed, &again));
}

#[tokio::test]
async fn failed_fetch_serves_and_caches_the_fallback() {
    let repo = Arc::new(CountingSiteRepo::storing("Pond"));
    *repo.fail.lock().await = true;
    let clock = Arc::new(ManualClock::new());
    let site = loader(repo.clone(), clock.clone(), None);

    let config = site.load().await;
    assert_eq!(*config, SiteConfig::default());

    *repo.fail.lock().await = false;
    clock.advance(Duration::from_secs(120));
    assert_eq!(site.load().await.title, DEFAULT_TITLE);
    assert_eq!(repo.fetches(), 1);

    clock.advance(Duration::from_secs(180));
    assert_eq!(site.load().await.title, "Pond");
    assert_eq!(repo.fetches(), 2);
}

#[tokio::test]
async fn empty_store_serves_the_fallback() {
    let repo = Arc::new(CountingSiteRepo::default());
    let site = loader(repo, Arc::new(ManualClock::new()), None);

    assert_eq!(*site.load().await, SiteConfig::default());
}

#[tokio::test]
async fn clear_forces_the_next_load_to_fetch() {
    let repo = Arc::new(CountingSiteRepo::storing("Pond"));
    let site = loader(repo.clone(), Arc::new(ManualClock::new()), None);

    site.load().await;
    site.clear();
    site.load().await;

    assert_eq!(repo.fetches(), 2);
}

#[tokio::test]
async fn fetch_uncached_bypasses_the_cache() {
    let repo = Arc::new(CountingSiteRepo::storing("Pond"));
    let site = loader(repo.clone(), Arc::new(ManualClock::new()), None);

    site.load().await;
    let direct = site.fetch_uncached().await;
    site.load().await;

    assert_eq!(direct.title, "Pond");
    assert_eq!(repo.fetches(), 2);
}

#[tokio::test]
async fn disabled_cache_fetches_every_time() {
    let repo = Arc::new(CountingSiteRepo::storing("Pond"));
    let config = CacheConfig {
        enable_site_config_cache: false,
        ..Default::default()
    };
    let site = SiteConfigLoader::new(repo.clone(), &config, Arc::new(ManualClock::new()), None);

    site.load().await;
    site.load().await;

    assert_eq!(repo.fetches(), 2);
}

#[tokio::test]
async fn base_url_override_applies_to_stored_and_fallback_configs() {
    let repo = Arc::new(CountingSiteRepo::storing("Pond"));
    let site = loader(
        repo.clone(),
        Arc::new(ManualClock::new()),
        Some("http://localhost:5173/pond"),
    );
    let stored = site.load().await;
    assert_eq!(stored.url, "http://localhost:5173/pond");
    assert_eq!(stored.title, "Pond");

    let empty = Arc::new(CountingSiteRepo::default());
    let fallback = loader(
        empty,
        Arc::new(ManualClock::new()),
        Some("http://localhost:5173/pond"),
    )
    .load()
    .await;
    assert_eq!(fallback.url, "http://localhost:5173/pond");
    assert_eq!(fallback.title, DEFAULT_TITLE);
}
