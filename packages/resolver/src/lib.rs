//! Mount table and cached mount point resolution.
//!
//! Composes the two core utilities of this workspace:
//!
//! - [`MountTable`]: the authoritative registry of mount points, indexed by a
//!   [`mountpath_trie::Trie`] over path segments for longest-prefix lookups
//! - [`MountResolver`]: a thread-safe front end that answers from a
//!   [`mountpath_cache::MountPointCache`] and keeps it valid across mounts,
//!   unmounts and reloads
//!
//! # Example
//!
//! ```rust
//! use mountpath_resolver::{MountResolver, Error};
//!
//! let resolver = MountResolver::default();
//! resolver.mount("/a", "s3://a").unwrap();
//! resolver.mount("/a/b", "s3://b").unwrap();
//!
//! assert_eq!(resolver.resolve("/a/b/3").unwrap(), "/a/b");
//!
//! resolver.unmount("/a/b").unwrap();
//! assert_eq!(resolver.resolve("/a/b/3").unwrap(), "/a");
//!
//! assert!(matches!(resolver.resolve("/elsewhere"), Err(Error::NoMountPoint(_))));
//! ```
//!
//! Paths are validated, never normalized: `/a/b/` is rejected rather than
//! rewritten to `/a/b`.

mod config;
mod error;
mod path;
mod resolver;
mod table;

pub use config::ResolverConfig;
pub use error::{Error, Result};
pub use path::MountPath;
pub use resolver::MountResolver;
pub use table::{MountInfo, MountTable};

pub use mountpath_cache::{CacheConfig, MountPointCache};
pub use mountpath_trie::{Trie, TrieNode};
