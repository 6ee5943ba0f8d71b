//! Mount-point cache.
//!
//! Memoizes "which registered mount point is the closest ancestor of this
//! path" so that a resolver only walks its mount table on a miss.
//!
//! Given a mount table of
//!
//! ```text
//! /a      -> s3://a
//! /a/b    -> s3://b
//! /a/b/c  -> s3://c
//! ```
//!
//! a few resolutions later the cache holds
//!
//! ```text
//! /a/b/3    -> /a/b
//! /a/b/c/6  -> /a/b/c
//! /a/2      -> /a
//! ```
//!
//! Unmounting `/a/b` must be followed by [`MountPointCache::delete`]`("/a/b")`,
//! which drops `/a/b/3` and leaves the other two entries. The cache cannot tell
//! on its own that an answer went stale.
//!
//! # Example
//!
//! ```rust
//! use mountpath_cache::MountPointCache;
//!
//! let cache = MountPointCache::new();
//! cache.add("/a/b/3", "/a/b");
//! assert_eq!(cache.get("/a/b/3").as_deref(), Some("/a/b"));
//!
//! cache.delete("/a/b");
//! assert_eq!(cache.get("/a/b/3"), None);
//! ```

mod cache;
mod config;

pub use cache::MountPointCache;
pub use config::{
    CacheConfig, DEFAULT_EXACT_CAPACITY, DEFAULT_NESTED_CAPACITY, DEFAULT_NON_NESTED_CAPACITY,
};
