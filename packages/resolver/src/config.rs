//! Resolver configuration.
//!
//! ```json
//! {
//!   "cache": {"exact_capacity": 1024},
//!   "preseed_on_mount": true,
//!   "root_ufs": "hdfs://namenode:9000/",
//!   "mounts": [
//!     {"path": "/s3", "ufs": "s3://bucket"}
//!   ]
//! }
//! ```
//!
//! Every field is optional.

use std::path::Path;

use mountpath_cache::CacheConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::table::MountInfo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Capacities of the mount point cache.
    pub cache: CacheConfig,
    /// Cache each mount point as its own resolution when it is mounted.
    pub preseed_on_mount: bool,
    /// UFS of a permanent root mount. Without one, paths outside every
    /// mount point do not resolve.
    pub root_ufs: Option<String>,
    /// Mounts registered at startup.
    pub mounts: Vec<MountInfo>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            preseed_on_mount: true,
            root_ufs: None,
            mounts: Vec::new(),
        }
    }
}

impl ResolverConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Reading resolver config {}...", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check settings that parse but cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.root_ufs.as_deref().is_some_and(str::is_empty) {
            return Err(Error::Config("root_ufs must not be empty".to_string()));
        }
        if let Some(info) = self.mounts.iter().find(|m| m.ufs.is_empty()) {
            return Err(Error::Config(format!("mount {} has an empty ufs", info.path)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ResolverConfig::default();
        assert!(config.preseed_on_mount);
        assert_eq!(config.root_ufs, None);
        assert!(config.mounts.is_empty());
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[test]
    fn parse_full_document() {
        let config = ResolverConfig::from_json_str(
            r#"{
                "cache": {"exact_capacity": 1024},
                "preseed_on_mount": false,
                "root_ufs": "hdfs://nn/",
                "mounts": [{"path": "/s3", "ufs": "s3://bucket"}]
            }"#,
        )
        .unwrap();

        assert_eq!(config.cache.exact_capacity, 1024);
        assert_eq!(config.cache.nested_capacity, 100);
        assert!(!config.preseed_on_mount);
        assert_eq!(config.root_ufs.as_deref(), Some("hdfs://nn/"));
        assert_eq!(config.mounts, vec![MountInfo::new("/s3", "s3://bucket")]);
    }

    #[test]
    fn parse_empty_document() {
        let config = ResolverConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn malformed_json_is_json_error() {
        let err = ResolverConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn empty_root_ufs_is_rejected() {
        let err = ResolverConfig::from_json_str(r#"{"root_ufs": ""}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn empty_mount_ufs_is_rejected() {
        let json = r#"{"mounts": [{"path": "/a", "ufs": ""}]}"#;
        let err = ResolverConfig::from_json_str(json).unwrap_err();
        assert!(format!("{}", err).contains("/a"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"root_ufs": "file:///srv"}}"#).unwrap();

        let config = ResolverConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.root_ufs.as_deref(), Some("file:///srv"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ResolverConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
