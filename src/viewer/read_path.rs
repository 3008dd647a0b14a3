use std::sync::{Arc, Mutex};

use anyhow::Result;
use tracing::debug;

use crate::bulletin::{BulletinRecord, BulletinSummary};

/// Sentinel cache key for "most recent bulletin".
pub const LATEST_KEY: &str = "bulletin-latest";

const CACHE_CAPACITY: usize = 16;

pub fn cache_key(date: Option<&str>) -> String {
    match date {
        Some(date) => format!("bulletin-{date}"),
        None => LATEST_KEY.to_string(),
    }
}

/// Where bulletins come from. Implemented by the Postgres store in
/// production and by stubs in tests.
pub trait BulletinSource: Clone + Send + Sync + 'static {
    fn fetch(
        &self,
        date: &str,
    ) -> impl Future<Output = Result<Option<BulletinRecord>>> + Send;

    fn fetch_dates(&self) -> impl Future<Output = Result<Vec<BulletinSummary>>> + Send;
}

/// Bounded per-date record cache, read and written only by the read path.
/// Insertion order doubles as the eviction order; there is no expiry.
#[derive(Clone, Default)]
pub struct SessionCache {
    entries: Arc<Mutex<Vec<(String, BulletinRecord)>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<BulletinRecord> {
        let entries = self.entries.lock().ok()?;
        entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, record)| record.clone())
    }

    pub fn put(&self, key: &str, record: BulletinRecord) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        if let Some(slot) = entries.iter_mut().find(|(k, _)| k == key) {
            slot.1 = record;
            return;
        }
        if entries.len() >= CACHE_CAPACITY {
            entries.remove(0);
        }
        entries.push((key.to_string(), record));
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Terminal result of one resolution. `ready` is always true by the time
/// this value exists — the loading state never outlives `resolve`.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub record: Option<BulletinRecord>,
    pub from_cache: bool,
}

/// Cache-then-revalidate resolver for "which bulletin do we show".
///
/// Reads favor silent degradation: every failure path lands on the empty
/// state, never an error. Writes (admin saves) do not pass through here;
/// the cache is purely a read-side latency optimization.
#[derive(Clone)]
pub struct ReadPath<S> {
    cache: SessionCache,
    source: S,
}

impl<S: BulletinSource> ReadPath<S> {
    pub fn new(cache: SessionCache, source: S) -> Self {
        Self { cache, source }
    }

    /// Resolve an explicit date, or the most recent bulletin when absent.
    ///
    /// A cache hit paints immediately and fires a background revalidation —
    /// its success overwrites the cache, its failure is swallowed. The
    /// latest-key entry revalidates through the list, so a newly published
    /// bulletin replaces it on the next visit. Overlapping resolutions are
    /// not coalesced, so the last response to land wins.
    pub async fn resolve(&self, date: Option<&str>) -> Resolution {
        let key = cache_key(date);

        if let Some(cached) = self.cache.get(&key) {
            match date {
                Some(date) => self.spawn_revalidation(key, date.to_string()),
                None => self.spawn_latest_revalidation(key),
            }
            return Resolution {
                record: Some(cached),
                from_cache: true,
            };
        }

        let record = match date {
            Some(date) => self.fetch_dated(&key, date).await,
            None => self.fetch_latest(&key).await,
        };

        Resolution {
            record,
            from_cache: false,
        }
    }

    async fn fetch_dated(&self, key: &str, date: &str) -> Option<BulletinRecord> {
        match self.source.fetch(date).await {
            Ok(Some(record)) => {
                self.cache.put(key, record.clone());
                Some(record)
            }
            Ok(None) => None,
            Err(err) => {
                debug!(%date, ?err, "bulletin fetch failed; showing empty state");
                None
            }
        }
    }

    async fn fetch_latest(&self, key: &str) -> Option<BulletinRecord> {
        let list = match self.source.fetch_dates().await {
            Ok(list) => list,
            Err(err) => {
                debug!(?err, "bulletin list fetch failed; showing empty state");
                return None;
            }
        };
        let newest = list.first()?;
        match self.source.fetch(&newest.date).await {
            Ok(Some(record)) => {
                self.cache.put(key, record.clone());
                Some(record)
            }
            Ok(None) => None,
            Err(err) => {
                debug!(date = %newest.date, ?err, "latest bulletin fetch failed");
                None
            }
        }
    }

    fn spawn_revalidation(&self, key: String, date: String) {
        let source = self.source.clone();
        let cache = self.cache.clone();
        tokio::spawn(async move {
            match source.fetch(&date).await {
                Ok(Some(record)) => cache.put(&key, record),
                Ok(None) => {}
                Err(err) => debug!(%date, ?err, "background revalidation failed"),
            }
        });
    }

    fn spawn_latest_revalidation(&self, key: String) {
        let source = self.source.clone();
        let cache = self.cache.clone();
        tokio::spawn(async move {
            let list = match source.fetch_dates().await {
                Ok(list) => list,
                Err(err) => {
                    debug!(?err, "background latest revalidation failed");
                    return;
                }
            };
            let Some(newest) = list.first() else {
                return;
            };
            match source.fetch(&newest.date).await {
                Ok(Some(record)) => cache.put(&key, record),
                Ok(None) => {}
                Err(err) => {
                    debug!(date = %newest.date, ?err, "background latest revalidation failed");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Clone)]
    struct StubSource {
        record: Option<BulletinRecord>,
        list: Vec<BulletinSummary>,
        fail_fetch: bool,
        fetches: Arc<AtomicUsize>,
    }

    impl StubSource {
        fn with_record(record: BulletinRecord) -> Self {
            Self {
                record: Some(record),
                list: Vec::new(),
                fail_fetch: false,
                fetches: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing() -> Self {
            Self {
                record: None,
                list: Vec::new(),
                fail_fetch: true,
                fetches: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl BulletinSource for StubSource {
        async fn fetch(&self, _date: &str) -> Result<Option<BulletinRecord>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_fetch {
                anyhow::bail!("stub fetch failure");
            }
            Ok(self.record.clone())
        }

        async fn fetch_dates(&self) -> Result<Vec<BulletinSummary>> {
            if self.fail_fetch {
                anyhow::bail!("stub list failure");
            }
            Ok(self.list.clone())
        }
    }

    fn record(date: &str) -> BulletinRecord {
        BulletinRecord {
            date: date.to_string(),
            event_type: "주일 예배".to_string(),
            time: "11:00".to_string(),
            sermon_title_main: "말씀".to_string(),
            sermon_title_main_color: None,
            sermon_title_sub: String::new(),
            sermon_title_sub_color: None,
            praises: String::new(),
            prayers: String::new(),
            passage: String::new(),
            sermon_description: String::new(),
            announcements: String::new(),
            intro_background_url: None,
            youtube_url: None,
            og_image_url: None,
        }
    }

    #[test]
    fn cache_keys() {
        assert_eq!(cache_key(Some("2025-01-26")), "bulletin-2025-01-26");
        assert_eq!(cache_key(None), LATEST_KEY);
    }

    #[test]
    fn cache_evicts_oldest_beyond_capacity() {
        let cache = SessionCache::new();
        for i in 0..CACHE_CAPACITY + 4 {
            cache.put(&format!("bulletin-2025-01-{i:02}"), record("2025-01-26"));
        }
        assert_eq!(cache.len(), CACHE_CAPACITY);
        assert!(cache.get("bulletin-2025-01-00").is_none());
        assert!(cache.get("bulletin-2025-01-19").is_some());
    }

    #[tokio::test]
    async fn cached_record_survives_failing_revalidation() {
        let cache = SessionCache::new();
        cache.put("bulletin-2025-01-26", record("2025-01-26"));

        let read_path = ReadPath::new(cache.clone(), StubSource::failing());
        let resolution = read_path.resolve(Some("2025-01-26")).await;

        // Ready immediately from cache, not blocked on the failing fetch.
        assert!(resolution.from_cache);
        assert_eq!(resolution.record.unwrap().date, "2025-01-26");

        // Let the fire-and-forget revalidation run; the cache must keep the
        // old record when it fails.
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        assert_eq!(cache.get("bulletin-2025-01-26").unwrap().date, "2025-01-26");
    }

    #[tokio::test]
    async fn successful_revalidation_overwrites_the_cache() {
        let cache = SessionCache::new();
        let mut stale = record("2025-01-26");
        stale.sermon_title_main = "stale".to_string();
        cache.put("bulletin-2025-01-26", stale);

        let mut fresh = record("2025-01-26");
        fresh.sermon_title_main = "fresh".to_string();
        let source = StubSource::with_record(fresh);

        let read_path = ReadPath::new(cache.clone(), source);
        let resolution = read_path.resolve(Some("2025-01-26")).await;
        assert_eq!(resolution.record.unwrap().sermon_title_main, "stale");

        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        assert_eq!(
            cache.get("bulletin-2025-01-26").unwrap().sermon_title_main,
            "fresh"
        );
    }

    #[tokio::test]
    async fn latest_hit_revalidates_after_new_publish() {
        let cache = SessionCache::new();
        cache.put(LATEST_KEY, record("2025-01-26"));

        // The admin has since published next week's bulletin.
        let mut source = StubSource::with_record(record("2025-02-02"));
        source.list = vec![BulletinSummary {
            date: "2025-02-02".to_string(),
            sermon_title_main: "말씀".to_string(),
            event_type: "주일 예배".to_string(),
        }];

        let read_path = ReadPath::new(cache.clone(), source);
        let resolution = read_path.resolve(None).await;
        assert!(resolution.from_cache);
        assert_eq!(resolution.record.unwrap().date, "2025-01-26");

        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        assert_eq!(cache.get(LATEST_KEY).unwrap().date, "2025-02-02");

        let next = read_path.resolve(None).await;
        assert_eq!(next.record.unwrap().date, "2025-02-02");
    }

    #[tokio::test]
    async fn explicit_date_miss_fetches_and_caches() {
        let cache = SessionCache::new();
        let source = StubSource::with_record(record("2025-02-02"));
        let read_path = ReadPath::new(cache.clone(), source);

        let resolution = read_path.resolve(Some("2025-02-02")).await;
        assert!(!resolution.from_cache);
        assert_eq!(resolution.record.unwrap().date, "2025-02-02");
        assert!(cache.get("bulletin-2025-02-02").is_some());
    }

    #[tokio::test]
    async fn not_found_resolves_to_empty_state() {
        let source = StubSource {
            record: None,
            list: Vec::new(),
            fail_fetch: false,
            fetches: Arc::new(AtomicUsize::new(0)),
        };
        let read_path = ReadPath::new(SessionCache::new(), source);
        let resolution = read_path.resolve(Some("1999-01-01")).await;
        assert!(resolution.record.is_none());
    }

    #[tokio::test]
    async fn latest_path_walks_the_list() {
        let mut source = StubSource::with_record(record("2025-03-02"));
        source.list = vec![
            BulletinSummary {
                date: "2025-03-02".to_string(),
                sermon_title_main: "말씀".to_string(),
                event_type: "주일 예배".to_string(),
            },
            BulletinSummary {
                date: "2025-02-23".to_string(),
                sermon_title_main: "".to_string(),
                event_type: "주일 예배".to_string(),
            },
        ];
        let cache = SessionCache::new();
        let read_path = ReadPath::new(cache.clone(), source);

        let resolution = read_path.resolve(None).await;
        assert_eq!(resolution.record.unwrap().date, "2025-03-02");
        assert!(cache.get(LATEST_KEY).is_some());
    }

    #[tokio::test]
    async fn empty_list_resolves_to_empty_state() {
        let source = StubSource {
            record: None,
            list: Vec::new(),
            fail_fetch: false,
            fetches: Arc::new(AtomicUsize::new(0)),
        };
        let read_path = ReadPath::new(SessionCache::new(), source);
        let resolution = read_path.resolve(None).await;
        assert!(resolution.record.is_none());
    }
}
