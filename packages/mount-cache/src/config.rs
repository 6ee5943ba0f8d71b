//! Sizing for the mount-point cache.

use serde::{Deserialize, Serialize};

/// Initial capacity of the exact path → mount point map.
pub const DEFAULT_EXACT_CAPACITY: usize = 20;
/// Initial capacity of the nested mount point set.
pub const DEFAULT_NESTED_CAPACITY: usize = 100;
/// Initial capacity of the non-nested mount point set.
pub const DEFAULT_NON_NESTED_CAPACITY: usize = 100;

/// Initial container capacities for a [`MountPointCache`](crate::MountPointCache).
///
/// These are allocation hints, not limits: the cache grows past them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub exact_capacity: usize,
    pub nested_capacity: usize,
    pub non_nested_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            exact_capacity: DEFAULT_EXACT_CAPACITY,
            nested_capacity: DEFAULT_NESTED_CAPACITY,
            non_nested_capacity: DEFAULT_NON_NESTED_CAPACITY,
        }
    }
}
