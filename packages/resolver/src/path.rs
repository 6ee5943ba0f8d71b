//! Absolute namespace paths split into trie segments.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A validated absolute namespace path.
///
/// Keeps the caller's string verbatim next to its `/`-separated segments.
/// Nothing is rewritten: a path that is not already in canonical form is
/// rejected, so two `MountPath`s are equal exactly when their strings are.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct MountPath {
    raw: String,
    segments: Vec<String>,
}

impl MountPath {
    /// Parse and validate a path.
    ///
    /// # Path Syntax
    ///
    /// - The path starts with `/`; `/` alone is the root
    /// - No trailing `/` except on the root
    /// - No empty, `.` or `..` segments
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mountpath_resolver::MountPath;
    ///
    /// let path = MountPath::parse("/mnt/s3/bucket").unwrap();
    /// assert_eq!(path.len(), 3);
    ///
    /// assert!(MountPath::parse("/mnt/").is_err());
    /// assert!(MountPath::parse("mnt").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let Some(rest) = s.strip_prefix('/') else {
            return Err(Error::invalid_path(s, "must be absolute"));
        };
        if rest.is_empty() {
            return Ok(Self::root());
        }

        let segments: Vec<String> = rest.split('/').map(str::to_string).collect();
        for (position, segment) in segments.iter().enumerate() {
            Self::validate_segment(s, segment, position)?;
        }

        Ok(MountPath {
            raw: s.to_string(),
            segments,
        })
    }

    fn validate_segment(path: &str, segment: &str, position: usize) -> Result<()> {
        match segment {
            "" => Err(Error::invalid_path(
                path,
                format!("empty segment at position {}", position),
            )),
            "." | ".." => Err(Error::invalid_path(
                path,
                format!("relative segment '{}' at position {}", segment, position),
            )),
            _ => Ok(()),
        }
    }

    /// The root path `/`.
    pub fn root() -> Self {
        MountPath {
            raw: "/".to_string(),
            segments: Vec::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments as borrowed keys, for trie lookups.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// The ancestor made of the first `depth` segments.
    ///
    /// `depth` past the end yields the path itself.
    #[must_use]
    pub fn prefix(&self, depth: usize) -> MountPath {
        if depth >= self.segments.len() {
            return self.clone();
        }
        if depth == 0 {
            return Self::root();
        }
        let segments = self.segments[..depth].to_vec();
        MountPath {
            raw: format!("/{}", segments.join("/")),
            segments,
        }
    }

    /// The enclosing path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<MountPath> {
        (!self.is_root()).then(|| self.prefix(self.segments.len() - 1))
    }

    /// True if `prefix` is this path or one of its ancestors.
    pub fn has_prefix(&self, prefix: &MountPath) -> bool {
        prefix.segments.len() <= self.segments.len()
            && prefix.segments[..] == self.segments[..prefix.segments.len()]
    }
}

impl fmt::Display for MountPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for MountPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for MountPath {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}
