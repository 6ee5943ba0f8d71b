//! The cache itself.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use crate::config::CacheConfig;

#[derive(Debug)]
struct Entries {
    /// Path -> its nearest enclosing mount point.
    exact: HashMap<String, String>,
    nested: HashSet<String>,
    non_nested: HashSet<String>,
}

/// Path → nearest-mount-point memo, safe to share across threads.
///
/// All three containers sit behind one reader/writer lock. Readers never
/// block each other; every mutation takes the write lock for a bounded,
/// allocation-only critical section.
///
/// Paths are opaque strings: `/a/b` and `/a/b/` are different keys.
#[derive(Debug)]
pub struct MountPointCache {
    entries: RwLock<Entries>,
}

impl Default for MountPointCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MountPointCache {
    /// Create a cache with the default capacities.
    pub fn new() -> Self {
        Self::from_config(&CacheConfig::default())
    }

    /// Create a cache whose exact map starts with room for `exact_capacity`
    /// paths.
    pub fn with_capacity(exact_capacity: usize) -> Self {
        Self::from_config(&CacheConfig {
            exact_capacity,
            ..CacheConfig::default()
        })
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(Entries {
                exact: HashMap::with_capacity(config.exact_capacity),
                nested: HashSet::with_capacity(config.nested_capacity),
                non_nested: HashSet::with_capacity(config.non_nested_capacity),
            }),
        }
    }

    /// Look up the cached mount point of `path`.
    pub fn get(&self, path: &str) -> Option<String> {
        // Recursive read so a reader nested inside another read guard on the
        // same thread cannot queue behind a waiting writer.
        self.entries.read_recursive().exact.get(path).cloned()
    }

    /// Record that `mount_point` is the nearest enclosing mount point of
    /// `path`. Overwrites any previous answer.
    pub fn add(&self, path: impl Into<String>, mount_point: impl Into<String>) {
        let path = path.into();
        let mount_point = mount_point.into();
        log::trace!("caching {} -> {}", path, mount_point);
        self.entries.write().exact.insert(path, mount_point);
    }

    /// Classify `mount_point` as having mount points nested beneath it, or not.
    ///
    /// A mount point sits in at most one of the two sets; reclassifying moves it.
    pub fn add_classification(&self, mount_point: impl Into<String>, is_nested: bool) {
        let mount_point = mount_point.into();
        let mut entries = self.entries.write();
        let Entries {
            nested, non_nested, ..
        } = &mut *entries;
        let (into, out_of) = if is_nested {
            (nested, non_nested)
        } else {
            (non_nested, nested)
        };
        out_of.remove(&mount_point);
        into.insert(mount_point);
    }

    /// How `mount_point` was last classified, if at all.
    pub fn is_nested(&self, mount_point: &str) -> Option<bool> {
        let entries = self.entries.read_recursive();
        if entries.nested.contains(mount_point) {
            Some(true)
        } else if entries.non_nested.contains(mount_point) {
            Some(false)
        } else {
            None
        }
    }

    /// Forget the classification of `mount_point`. Returns whether it had one.
    pub fn remove_classification(&self, mount_point: &str) -> bool {
        let mut entries = self.entries.write();
        let was_nested = entries.nested.remove(mount_point);
        let was_non_nested = entries.non_nested.remove(mount_point);
        was_nested || was_non_nested
    }

    /// Drop every cached path that resolves to `mount_point`.
    ///
    /// Must run before any read is trusted after `mount_point` is unmounted.
    /// Returns the number of entries dropped.
    pub fn delete(&self, mount_point: &str) -> usize {
        let mut entries = self.entries.write();
        let before = entries.exact.len();
        entries.exact.retain(|_, resolved| resolved.as_str() != mount_point);
        let purged = before - entries.exact.len();
        drop(entries);

        log::debug!(
            "purged {} cached resolution(s) of mount point {}",
            purged,
            mount_point
        );
        purged
    }

    /// Drop every cached path. Classifications are kept.
    pub fn clear(&self) {
        self.entries.write().exact.clear();
        log::debug!("cleared mount point cache");
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.read_recursive().exact.len()
    }

    /// True if no paths are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collection_literals::hash;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn exact_snapshot(cache: &MountPointCache) -> HashMap<String, String> {
        cache.entries.read().exact.clone()
    }

    fn seeded() -> MountPointCache {
        let cache = MountPointCache::new();
        cache.add("/a/b/3", "/a/b");
        cache.add("/a/b/c/6", "/a/b/c");
        cache.add("/a/b/c/5", "/a/b/c");
        cache.add("/a/2", "/a");
        cache.add("/a/b/4", "/a/b");
        cache
    }

    #[test]
    fn new_cache_is_empty() {
        let cache = MountPointCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.get("/a"), None);
    }

    #[test]
    fn add_then_get_returns_mapping() {
        let cache = MountPointCache::new();
        cache.add("/a/b/3", "/a/b");

        assert_eq!(cache.get("/a/b/3").as_deref(), Some("/a/b"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn add_overwrites_last_write_wins() {
        let cache = MountPointCache::new();
        cache.add("/a/b/3", "/a");
        cache.add("/a/b/3", "/a/b");
        cache.add("/a/b/3", "/a/b");

        assert_eq!(cache.get("/a/b/3").as_deref(), Some("/a/b"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn delete_drops_entries_of_unmounted_point() {
        let cache = MountPointCache::new();
        cache.add("/a/b/3", "/a/b");
        assert_eq!(cache.get("/a/b/3").as_deref(), Some("/a/b"));

        cache.delete("/a/b");
        assert_eq!(cache.get("/a/b/3"), None);
    }

    #[test]
    fn delete_keeps_other_mount_points() {
        let cache = seeded();

        assert_eq!(cache.delete("/a/b"), 2);

        let expected: HashMap<String, String> = hash! {
            "/a/b/c/6".to_string() => "/a/b/c".to_string(),
            "/a/b/c/5".to_string() => "/a/b/c".to_string(),
            "/a/2".to_string() => "/a".to_string()
        };
        assert_eq!(exact_snapshot(&cache), expected);
    }

    #[test]
    fn delete_matches_values_not_keys() {
        let cache = MountPointCache::new();
        cache.add("/a/b", "/a");

        assert_eq!(cache.delete("/a/b"), 0);
        assert_eq!(cache.get("/a/b").as_deref(), Some("/a"));
    }

    #[test]
    fn delete_unknown_mount_point_is_noop() {
        let cache = seeded();
        assert_eq!(cache.delete("/nowhere"), 0);
        assert_eq!(cache.len(), 5);
    }

    #[test]
    fn clear_empties_exact_cache_only() {
        let cache = seeded();
        cache.add_classification("/a", true);

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.is_nested("/a"), Some(true));
    }

    #[test]
    fn paths_are_not_normalized() {
        let cache = MountPointCache::new();
        cache.add("/a/b", "/a");

        assert_eq!(cache.get("/a/b/"), None);
        assert_eq!(cache.get("a/b"), None);
    }

    #[test]
    fn classification() {
        let cache = MountPointCache::new();
        assert_eq!(cache.is_nested("/a"), None);

        cache.add_classification("/a", true);
        cache.add_classification("/a/b/c", false);

        assert_eq!(cache.is_nested("/a"), Some(true));
        assert_eq!(cache.is_nested("/a/b/c"), Some(false));
    }

    #[test]
    fn reclassification_moves_between_sets() {
        let cache = MountPointCache::new();
        cache.add_classification("/a", true);
        cache.add_classification("/a", false);

        assert_eq!(cache.is_nested("/a"), Some(false));
        let entries = cache.entries.read();
        assert!(!entries.nested.contains("/a"));
        assert!(entries.non_nested.contains("/a"));
    }

    #[test]
    fn remove_classification() {
        let cache = MountPointCache::new();
        cache.add_classification("/a", false);

        assert!(cache.remove_classification("/a"));
        assert!(!cache.remove_classification("/a"));
        assert_eq!(cache.is_nested("/a"), None);
    }

    #[test]
    fn from_config_sizes_containers() {
        let cache = MountPointCache::from_config(&CacheConfig {
            exact_capacity: 64,
            nested_capacity: 8,
            non_nested_capacity: 8,
        });
        let entries = cache.entries.read();
        assert!(entries.exact.capacity() >= 64);
        assert!(entries.nested.capacity() >= 8);
    }

    #[test]
    fn with_capacity_keeps_default_set_sizes() {
        let cache = MountPointCache::with_capacity(256);
        let entries = cache.entries.read();
        assert!(entries.exact.capacity() >= 256);
        assert!(entries.non_nested.capacity() >= crate::DEFAULT_NON_NESTED_CAPACITY);
    }

    #[test]
    fn concurrent_readers_do_not_block_each_other() {
        const READERS: usize = 8;
        let cache = Arc::new(seeded());
        let barrier = Arc::new(Barrier::new(READERS));

        let handles: Vec<_> = (0..READERS)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    // Every reader holds its guard across the barrier, so the
                    // barrier only releases if all of them are inside at once.
                    let entries = cache.entries.read_recursive();
                    barrier.wait();
                    let seen = entries.exact.get("/a/b/3").cloned();
                    drop(entries);
                    (seen, cache.get("/a/2"))
                })
            })
            .collect();

        for handle in handles {
            let (seen, other) = handle.join().unwrap();
            assert_eq!(seen.as_deref(), Some("/a/b"));
            assert_eq!(other.as_deref(), Some("/a"));
        }
    }

    #[test]
    fn readers_see_consistent_answers_during_writes() {
        let cache = Arc::new(MountPointCache::new());
        cache.add("/a/b/3", "/a/b");

        let writer = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..500 {
                    cache.add(format!("/a/x/{}", i), "/a");
                    cache.delete("/nowhere");
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for _ in 0..500 {
                        assert_eq!(cache.get("/a/b/3").as_deref(), Some("/a/b"));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(cache.len(), 501);
    }
}
