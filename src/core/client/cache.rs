//! Bounded LRU memoization of GET responses.

use super::proxy::{ProxyConfig, normalize_proxy};
use super::request::RequestOptions;
use crate::core::transport::HttpResponse;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// The identity of a memoized GET.
///
/// Composite arguments are normalized so that equal requests built in a different order
/// map to the same key: header names are lower-cased and headers sorted, params are
/// stable-sorted by name (values under one name keep their order, since they are sent as
/// repeated keys), cookies are sorted, and the proxy is reduced to its transport form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    url: String,
    headers: Vec<(String, String)>,
    params: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    proxy: Option<ProxyConfig>,
    timeout: Duration,
}

impl CacheKey {
    /// Builds the key for `url` called with `opts`; `default_timeout` applies when `opts` sets none.
    pub fn new(url: &str, opts: &RequestOptions, default_timeout: Duration) -> Self {
        let mut headers: Vec<_> = opts
            .headers
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
            .collect();
        headers.sort();

        let mut params = opts.params.clone();
        params.sort_by(|a, b| a.0.cmp(&b.0));

        let mut cookies = opts.cookies.clone();
        cookies.sort();

        Self {
            url: url.to_string(),
            headers,
            params,
            cookies,
            proxy: normalize_proxy(opts.proxy.as_ref()),
            timeout: opts.timeout.unwrap_or(default_timeout),
        }
    }
}

/// A snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries currently held.
    pub len: usize,
    /// Maximum number of entries. `0` means memoization is disabled.
    pub capacity: usize,
}

#[derive(Debug)]
pub(crate) struct ResponseCache {
    lru: Option<Mutex<LruCache<CacheKey, HttpResponse>>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            lru: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Looks up `key`, marking it most recently used on a hit.
    pub(crate) async fn get(&self, key: &CacheKey) -> Option<HttpResponse> {
        let found = match &self.lru {
            Some(lru) => lru.lock().await.get(key).cloned(),
            None => None,
        };
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    pub(crate) async fn put(&self, key: CacheKey, resp: HttpResponse) {
        let Some(lru) = &self.lru else {
            return;
        };
        let mut guard = lru.lock().await;
        if let Some((evicted, _)) = guard.push(key.clone(), resp)
            && evicted != key
        {
            tracing::debug!(url = %evicted.url, "evicted least recently used response");
        }
    }

    pub(crate) async fn clear(&self) {
        if let Some(lru) = &self.lru {
            lru.lock().await.clear();
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub(crate) async fn stats(&self) -> CacheStats {
        let len = match &self.lru {
            Some(lru) => lru.lock().await.len(),
            None => 0,
        };
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len,
            capacity: self.capacity,
        }
    }
}
