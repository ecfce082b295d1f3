//! Process-global LRU caches for the four expensive, repeatable host-codec lookups:
//! IDNA encode, IDNA decode, IP-address parse, and host validation.
//!
//! Each cache is independently lockable so a miss on one never blocks a concurrent hit
//! on another. Capacity defaults to 256 entries and is reconfigurable at runtime via
//! [`cache_configure`].

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, OnceLock};

const DEFAULT_CAPACITY: usize = 256;

/// A single cache's capacity: either a bounded entry count or unbounded (no eviction).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CacheSize {
    Bounded(NonZeroUsize),
    Unbounded,
}

impl CacheSize {
    #[must_use]
    pub fn bounded(n: usize) -> Self {
        NonZeroUsize::new(n).map_or(Self::Unbounded, Self::Bounded)
    }
}

impl Default for CacheSize {
    fn default() -> Self {
        Self::Bounded(NonZeroUsize::new(DEFAULT_CAPACITY).unwrap())
    }
}

/// One cache slot: the `lru::LruCache` plus its configured size (unbounded caches keep
/// an ever-growing `LruCache` with an enormous capacity, since `lru` itself requires a
/// `NonZeroUsize`).
struct Slot {
    size: CacheSize,
    map: LruCache<String, String>,
    hits: u64,
    misses: u64,
}

const UNBOUNDED_CAPACITY: NonZeroUsize = NonZeroUsize::new(usize::MAX >> 1).unwrap();

impl Slot {
    fn new(size: CacheSize) -> Self {
        let cap = match size {
            CacheSize::Bounded(n) => n,
            CacheSize::Unbounded => UNBOUNDED_CAPACITY,
        };
        Self {
            size,
            map: LruCache::new(cap),
            hits: 0,
            misses: 0,
        }
    }

    fn resize(&mut self, size: CacheSize) {
        self.size = size;
        let cap = match size {
            CacheSize::Bounded(n) => n,
            CacheSize::Unbounded => UNBOUNDED_CAPACITY,
        };
        self.map.resize(cap);
    }

    fn get_or_insert_with(&mut self, key: &str, f: impl FnOnce() -> String) -> String {
        if let Some(v) = self.map.get(key) {
            self.hits += 1;
            return v.clone();
        }
        self.misses += 1;
        let v = f();
        self.map.put(key.to_owned(), v.clone());
        v
    }

    fn clear(&mut self) {
        self.map.clear();
        self.hits = 0;
        self.misses = 0;
    }

    fn info(&self) -> CacheInfo {
        CacheInfo {
            size: self.size,
            len: self.map.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

/// A snapshot of one cache's configuration and hit/miss counters.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CacheInfo {
    pub size: CacheSize,
    pub len: usize,
    pub hits: u64,
    pub misses: u64,
}

struct Caches {
    idna_encode: Mutex<Slot>,
    idna_decode: Mutex<Slot>,
    ip_address_parse: Mutex<Slot>,
    host_validate: Mutex<Slot>,
}

impl Caches {
    fn new() -> Self {
        Self {
            idna_encode: Mutex::new(Slot::new(CacheSize::default())),
            idna_decode: Mutex::new(Slot::new(CacheSize::default())),
            ip_address_parse: Mutex::new(Slot::new(CacheSize::default())),
            host_validate: Mutex::new(Slot::new(CacheSize::default())),
        }
    }
}

fn caches() -> &'static Caches {
    static CACHES: OnceLock<Caches> = OnceLock::new();
    CACHES.get_or_init(Caches::new)
}

/// Which of the four caches an operation addresses.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CacheKind {
    IdnaEncode,
    IdnaDecode,
    IpAddressParse,
    HostValidate,
}

fn slot(kind: CacheKind) -> &'static Mutex<Slot> {
    let c = caches();
    match kind {
        CacheKind::IdnaEncode => &c.idna_encode,
        CacheKind::IdnaDecode => &c.idna_decode,
        CacheKind::IpAddressParse => &c.ip_address_parse,
        CacheKind::HostValidate => &c.host_validate,
    }
}

/// Looks up `key` in the named cache, calling `f` to compute and insert the value on a
/// miss. `f` is expected to be infallible for the caller's purposes; fallible lookups
/// should not populate the cache on error (compute the `Result` before calling this and
/// only cache the `Ok` string, see `crate::host`).
pub fn get_or_insert_with(kind: CacheKind, key: &str, f: impl FnOnce() -> String) -> String {
    let mut s = slot(kind).lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    s.get_or_insert_with(key, f)
}

/// Clears every cache's entries and hit/miss counters (sizes are left unchanged).
pub fn cache_clear() {
    for kind in [
        CacheKind::IdnaEncode,
        CacheKind::IdnaDecode,
        CacheKind::IpAddressParse,
        CacheKind::HostValidate,
    ] {
        slot(kind)
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }
}

/// Returns a snapshot of each cache's size, length, and hit/miss counters.
#[must_use]
pub fn cache_info() -> [(CacheKind, CacheInfo); 4] {
    [
        (CacheKind::IdnaEncode, slot(CacheKind::IdnaEncode).lock().unwrap_or_else(std::sync::PoisonError::into_inner).info()),
        (CacheKind::IdnaDecode, slot(CacheKind::IdnaDecode).lock().unwrap_or_else(std::sync::PoisonError::into_inner).info()),
        (CacheKind::IpAddressParse, slot(CacheKind::IpAddressParse).lock().unwrap_or_else(std::sync::PoisonError::into_inner).info()),
        (CacheKind::HostValidate, slot(CacheKind::HostValidate).lock().unwrap_or_else(std::sync::PoisonError::into_inner).info()),
    ]
}

/// Reconfigures one or more cache sizes; `None` leaves that cache's current size
/// unchanged. Shrinking a cache below its current length evicts the least-recently-used
/// entries immediately.
pub fn cache_configure(
    idna_encode_size: Option<CacheSize>,
    idna_decode_size: Option<CacheSize>,
    ip_address_size: Option<CacheSize>,
    host_validate_size: Option<CacheSize>,
) {
    if let Some(size) = idna_encode_size {
        slot(CacheKind::IdnaEncode).lock().unwrap_or_else(std::sync::PoisonError::into_inner).resize(size);
    }
    if let Some(size) = idna_decode_size {
        slot(CacheKind::IdnaDecode).lock().unwrap_or_else(std::sync::PoisonError::into_inner).resize(size);
    }
    if let Some(size) = ip_address_size {
        slot(CacheKind::IpAddressParse).lock().unwrap_or_else(std::sync::PoisonError::into_inner).resize(size);
    }
    if let Some(size) = host_validate_size {
        slot(CacheKind::HostValidate).lock().unwrap_or_else(std::sync::PoisonError::into_inner).resize(size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cache state is process-global; run the assertions for each cache under its own
    // clear/configure bracket so they don't interfere with other tests in this binary.

    #[test]
    fn hit_then_miss_counts() {
        cache_clear();
        cache_configure(Some(CacheSize::default()), None, None, None);
        let mut calls = 0;
        let v1 = get_or_insert_with(CacheKind::IdnaEncode, "example.com", || {
            calls += 1;
            "example.com".to_owned()
        });
        let v2 = get_or_insert_with(CacheKind::IdnaEncode, "example.com", || {
            calls += 1;
            "example.com".to_owned()
        });
        assert_eq!(v1, "example.com");
        assert_eq!(v2, "example.com");
        assert_eq!(calls, 1);
        let info = cache_info();
        let (_, idna_encode_info) = info[0];
        assert_eq!(idna_encode_info.hits, 1);
        assert_eq!(idna_encode_info.misses, 1);
        cache_clear();
    }

    #[test]
    fn unbounded_size_disables_eviction() {
        cache_clear();
        cache_configure(None, Some(CacheSize::Unbounded), None, None);
        for i in 0..10 {
            get_or_insert_with(CacheKind::IdnaDecode, &i.to_string(), || i.to_string());
        }
        let info = cache_info();
        let (_, idna_decode_info) = info[1];
        assert_eq!(idna_decode_info.len, 10);
        cache_configure(None, Some(CacheSize::default()), None, None);
        cache_clear();
    }

    #[test]
    fn shrinking_evicts_least_recently_used() {
        cache_clear();
        cache_configure(None, None, Some(CacheSize::bounded(2)), None);
        get_or_insert_with(CacheKind::IpAddressParse, "a", || "a".to_owned());
        get_or_insert_with(CacheKind::IpAddressParse, "b", || "b".to_owned());
        get_or_insert_with(CacheKind::IpAddressParse, "c", || "c".to_owned());
        let info = cache_info();
        let (_, ip_info) = info[2];
        assert_eq!(ip_info.len, 2);
        cache_configure(None, None, Some(CacheSize::default()), None);
        cache_clear();
    }
}
