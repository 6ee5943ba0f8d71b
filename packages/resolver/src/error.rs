//! Error types for mount table operations and path resolution.

use thiserror::Error;

/// Errors raised by the mount table and the resolver.
///
/// The trie and the cache never fail; a miss in either only becomes an
/// error here, where it means something to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// A path failed validation.
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// Something is already mounted at this path.
    #[error("already mounted: {0}")]
    AlreadyMounted(String),

    /// Nothing is mounted at this path.
    #[error("not a mount point: {0}")]
    NotMounted(String),

    /// The configured root mount is permanent.
    #[error("cannot unmount the root mount point")]
    RootUnmount,

    /// No registered mount point contains this path.
    #[error("no mount point covers path: {0}")]
    NoMountPoint(String),

    /// The configuration is unusable.
    #[error("invalid config: {0}")]
    Config(String),

    /// Reading a config file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A config document did not parse.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_path(path: &str, message: impl Into<String>) -> Self {
        Error::InvalidPath {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for mount operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn invalid_path_display() {
        let e = Error::invalid_path("a/b", "must be absolute");
        let display = format!("{}", e);
        assert!(display.contains("invalid path"));
        assert!(display.contains("a/b"));
        assert!(display.contains("must be absolute"));
    }

    #[test]
    fn no_mount_point_display() {
        let e = Error::NoMountPoint("/x/y".to_string());
        assert_eq!(format!("{}", e), "no mount point covers path: /x/y");
    }

    #[test]
    fn mount_state_display() {
        assert!(format!("{}", Error::AlreadyMounted("/a".into())).contains("/a"));
        assert!(format!("{}", Error::NotMounted("/b".into())).contains("/b"));
        assert!(format!("{}", Error::RootUnmount).contains("root"));
    }

    #[test]
    fn io_error_conversion_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: Error = io.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(StdError::source(&e).is_some());
    }

    #[test]
    fn json_error_conversion() {
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: Error = json.into();
        assert!(matches!(e, Error::Json(_)));
        assert!(format!("{}", e).contains("json error"));
    }

    #[test]
    fn config_error_has_no_source() {
        let e = Error::Config("bad".to_string());
        assert!(StdError::source(&e).is_none());
    }
}
