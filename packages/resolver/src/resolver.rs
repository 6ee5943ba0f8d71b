//! Cached nearest-mount-point resolution over a locked mount table.

use mountpath_cache::MountPointCache;
use parking_lot::RwLock;

use crate::config::ResolverConfig;
use crate::error::{Error, Result};
use crate::path::MountPath;
use crate::table::{MountInfo, MountTable};

/// Resolves paths to their nearest enclosing mount point.
///
/// Hits are answered from the [`MountPointCache`] without touching the
/// table. Misses take the table's read lock, run the trie lookup and memoize
/// the answer before the lock is released.
///
/// Lock order is table, then cache. Every cache write that depends on the
/// table's contents happens under the table lock, so an unmount can never
/// slip between a lookup and the memoization of its result.
pub struct MountResolver {
    table: RwLock<MountTable>,
    cache: MountPointCache,
    root_ufs: Option<String>,
    preseed_on_mount: bool,
}

impl std::fmt::Debug for MountResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountResolver")
            .field("table", &"<locked>")
            .field("cached", &self.cache.len())
            .field("preseed_on_mount", &self.preseed_on_mount)
            .finish()
    }
}

impl Default for MountResolver {
    fn default() -> Self {
        Self {
            table: RwLock::new(MountTable::new()),
            cache: MountPointCache::new(),
            root_ufs: None,
            preseed_on_mount: true,
        }
    }
}

impl MountResolver {
    /// Build a resolver and register the configured mounts.
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        config.validate()?;
        let resolver = Self {
            table: RwLock::new(MountTable::new()),
            cache: MountPointCache::from_config(&config.cache),
            root_ufs: config.root_ufs.clone(),
            preseed_on_mount: config.preseed_on_mount,
        };
        resolver.reload(config.mounts.iter().cloned())?;
        Ok(resolver)
    }

    fn empty_table(&self) -> MountTable {
        match &self.root_ufs {
            Some(ufs) => MountTable::with_root(ufs.clone()),
            None => MountTable::new(),
        }
    }

    /// The cache in front of the table.
    pub fn cache(&self) -> &MountPointCache {
        &self.cache
    }

    /// Register `ufs` at `path`.
    ///
    /// Cached answers that pointed at the new mount's parent mount point are
    /// dropped, since some of those paths now live under the new mount.
    pub fn mount(&self, path: &str, ufs: impl Into<String>) -> Result<()> {
        let target = MountPath::parse(path)?;
        let mut table = self.table.write();
        let ufs = table.mount(&target, ufs)?.ufs.clone();

        if let Some(parent) = table.parent_mount_point(&target) {
            self.cache.delete(parent.as_str());
            self.cache.add_classification(parent.as_str(), true);
            if self.preseed_on_mount {
                self.cache.add(parent.as_str(), parent.as_str());
            }
        }
        self.cache
            .add_classification(target.as_str(), table.has_nested_mount(&target));
        if self.preseed_on_mount {
            self.cache.add(target.as_str(), target.as_str());
        }
        drop(table);

        log::info!("mounted {} at {}", ufs, target);
        Ok(())
    }

    /// Remove the mount at `path` and purge every cached answer naming it.
    ///
    /// The purge finishes before this returns.
    pub fn unmount(&self, path: &str) -> Result<MountInfo> {
        let target = MountPath::parse(path)?;
        let mut table = self.table.write();
        let info = table.unmount(&target)?;

        self.cache.delete(target.as_str());
        self.cache.remove_classification(target.as_str());
        if let Some(parent) = table.parent_mount_point(&target) {
            self.cache
                .add_classification(parent.as_str(), table.has_nested_mount(&parent));
        }
        drop(table);

        log::info!("unmounted {} from {}", info.ufs, info.path);
        Ok(info)
    }

    /// The nearest mount point enclosing `path`, `path` included.
    pub fn resolve(&self, path: &str) -> Result<String> {
        if let Some(mount_point) = self.cache.get(path) {
            return Ok(mount_point);
        }
        let table = self.table.read();
        self.resolve_locked(&table, path)
    }

    fn resolve_locked(&self, table: &MountTable, path: &str) -> Result<String> {
        // Another miss may have filled the entry while we waited for the lock.
        if let Some(mount_point) = self.cache.get(path) {
            return Ok(mount_point);
        }
        let target = MountPath::parse(path)?;
        let mount_point = table
            .mount_point(&target)
            .ok_or_else(|| Error::NoMountPoint(path.to_string()))?;

        log::trace!("resolved {} to {} from the mount table", path, mount_point);
        self.cache.add(path, mount_point.as_str());
        Ok(mount_point.to_string())
    }

    /// The mount covering `path`.
    pub fn info(&self, path: &str) -> Result<MountInfo> {
        let table = self.table.read();
        let mount_point = self.resolve_locked(&table, path)?;
        table
            .get(&mount_point)
            .cloned()
            .ok_or(Error::NoMountPoint(mount_point))
    }

    /// True if `path` is exactly a mount point.
    pub fn is_mount_point(&self, path: &str) -> Result<bool> {
        let target = MountPath::parse(path)?;
        Ok(self.table.read().is_mount_point(&target))
    }

    /// True if mount points are nested beneath the mount point `path`.
    ///
    /// Answered from the cached classification when there is one.
    pub fn has_nested_mount(&self, path: &str) -> Result<bool> {
        let target = MountPath::parse(path)?;
        let table = self.table.read();
        if !table.is_mount_point(&target) {
            return Err(Error::NotMounted(path.to_string()));
        }
        if let Some(nested) = self.cache.is_nested(path) {
            return Ok(nested);
        }
        let nested = table.has_nested_mount(&target);
        self.cache.add_classification(path, nested);
        Ok(nested)
    }

    /// All mounts, in path order.
    pub fn mounts(&self) -> Vec<MountInfo> {
        self.table.read().list()
    }

    /// Replace the whole table and start over with an empty cache.
    ///
    /// The configured root stays mounted; a root entry in `mounts` is skipped.
    /// On error the current table is left untouched.
    pub fn reload<I>(&self, mounts: I) -> Result<()>
    where
        I: IntoIterator<Item = MountInfo>,
    {
        let mut fresh = self.empty_table();
        for info in mounts {
            let path = MountPath::parse(&info.path)?;
            if path.is_root() && fresh.has_pinned_root() {
                log::debug!("reload: keeping configured root, skipping {}", info.ufs);
                continue;
            }
            fresh.mount(&path, info.ufs)?;
        }

        let mut table = self.table.write();
        let previous = std::mem::replace(&mut *table, fresh);

        self.cache.clear();
        for info in previous.iter() {
            self.cache.remove_classification(&info.path);
        }
        for info in table.iter() {
            let path = MountPath::parse(&info.path)?;
            self.cache
                .add_classification(info.path.as_str(), table.has_nested_mount(&path));
            if self.preseed_on_mount {
                self.cache.add(info.path.as_str(), info.path.as_str());
            }
        }
        let count = table.len();
        drop(table);

        log::info!("reloaded mount table with {} mount(s)", count);
        Ok(())
    }
}
