//! The authoritative mount table, indexed by a trie of mount points.

use std::collections::BTreeMap;

use mountpath_trie::Trie;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::MountPath;

/// A registered mount point and the under file system it exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountInfo {
    /// Namespace path of the mount point.
    pub path: String,
    /// Location of the backing storage, e.g. `s3://bucket/prefix`.
    pub ufs: String,
}

impl MountInfo {
    pub fn new(path: impl Into<String>, ufs: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ufs: ufs.into(),
        }
    }
}

/// Mount points by path, plus a trie over their segments for
/// longest-prefix lookups.
///
/// Not synchronized; [`MountResolver`](crate::MountResolver) wraps one in a
/// lock.
#[derive(Debug, Default)]
pub struct MountTable {
    mounts: BTreeMap<String, MountInfo>,
    index: Trie<String>,
    pinned_root: bool,
}

impl MountTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table whose root `/` is mounted on `ufs` for good.
    pub fn with_root(ufs: impl Into<String>) -> Self {
        let mut table = Self::new();
        table.register(MountPath::root(), ufs.into());
        table.pinned_root = true;
        table
    }

    /// True if the root mount can never be unmounted.
    pub fn has_pinned_root(&self) -> bool {
        self.pinned_root
    }

    /// Register `ufs` at `path`.
    pub fn mount(&mut self, path: &MountPath, ufs: impl Into<String>) -> Result<&MountInfo> {
        if self.mounts.contains_key(path.as_str()) {
            return Err(Error::AlreadyMounted(path.to_string()));
        }
        Ok(self.register(path.clone(), ufs.into()))
    }

    fn register(&mut self, path: MountPath, ufs: String) -> &MountInfo {
        self.index.insert(path.segments().iter().cloned());
        self.mounts
            .entry(path.to_string())
            .or_insert(MountInfo::new(path.to_string(), ufs))
    }

    /// Remove the mount at `path`.
    pub fn unmount(&mut self, path: &MountPath) -> Result<MountInfo> {
        if path.is_root() && self.pinned_root {
            return Err(Error::RootUnmount);
        }
        let info = self
            .mounts
            .remove(path.as_str())
            .ok_or_else(|| Error::NotMounted(path.to_string()))?;

        let removed = self.index.remove(path.keys());
        debug_assert!(removed.is_some(), "mount {} missing from index", path);
        Ok(info)
    }

    /// The deepest mount point that is `path` or one of its ancestors.
    pub fn mount_point(&self, path: &MountPath) -> Option<MountPath> {
        self.index
            .lowest_matched_depth(path.keys(), true, false)
            .map(|depth| path.prefix(depth))
    }

    /// The mount covering `path`.
    pub fn mount_info(&self, path: &MountPath) -> Option<&MountInfo> {
        let mount_point = self.mount_point(path)?;
        self.mounts.get(mount_point.as_str())
    }

    /// The mount point enclosing `path`, not counting `path` itself.
    pub fn parent_mount_point(&self, path: &MountPath) -> Option<MountPath> {
        self.mount_point(&path.parent()?)
    }

    /// True if `path` is exactly a mount point.
    pub fn is_mount_point(&self, path: &MountPath) -> bool {
        self.index
            .lowest_matched_node(path.keys(), true, true)
            .is_some()
    }

    /// True if some mount point lives strictly beneath `path`.
    pub fn has_nested_mount(&self, path: &MountPath) -> bool {
        self.index
            .lowest_matched_node(path.keys(), false, true)
            .is_some_and(|node| node.has_nested_terminal_descendant(false))
    }

    /// Mounts strictly beneath `path`, in path order.
    pub fn nested_mounts(&self, path: &MountPath) -> Vec<&MountInfo> {
        let prefix = if path.is_root() {
            "/".to_string()
        } else {
            format!("{}/", path)
        };
        self.mounts
            .range(prefix.clone()..)
            .take_while(|(mount, _)| mount.starts_with(&prefix))
            .filter(|(mount, _)| mount.as_str() != path.as_str())
            .map(|(_, info)| info)
            .collect()
    }

    /// Look up a mount by its exact path.
    pub fn get(&self, path: &str) -> Option<&MountInfo> {
        self.mounts.get(path)
    }

    /// All mounts, in path order.
    pub fn iter(&self) -> impl Iterator<Item = &MountInfo> {
        self.mounts.values()
    }

    pub fn list(&self) -> Vec<MountInfo> {
        self.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }
}
