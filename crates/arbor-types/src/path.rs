use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Canonical absolute path addressing a resource.
///
/// A `ResourcePath` is a sequence of non-empty segments. It always denotes
/// an absolute location (`/a/b/c`), never carries a trailing slash, and
/// never contains `.` or `..` segments. Paths order lexicographically by
/// segment, which guarantees that a container always sorts immediately
/// before its descendants in a `BTreeMap`.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    /// The root path `/`.
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    /// Parse a path from its string form.
    ///
    /// Accepts `/`, `/a`, `/a/b` and also tolerates a missing leading slash
    /// and a trailing slash, normalizing both away.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let trimmed = s.trim_start_matches('/').trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = Vec::new();
        for segment in trimmed.split('/') {
            if segment.is_empty() {
                return Err(TypeError::InvalidPath {
                    path: s.to_string(),
                    reason: "empty segment".to_string(),
                });
            }
            if segment == "." || segment == ".." {
                return Err(TypeError::InvalidPath {
                    path: s.to_string(),
                    reason: format!("illegal segment {segment:?}"),
                });
            }
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The final segment, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append one segment, producing a child path.
    pub fn child(&self, name: &str) -> Result<Self, TypeError> {
        if name.is_empty() || name.contains('/') || name == "." || name == ".." {
            return Err(TypeError::InvalidPath {
                path: format!("{self}/{name}"),
                reason: format!("illegal child name {name:?}"),
            });
        }
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self { segments })
    }

    /// Returns `true` if `self` equals `ancestor` or lies below it.
    pub fn starts_with(&self, ancestor: &ResourcePath) -> bool {
        self.segments.len() >= ancestor.segments.len()
            && self.segments[..ancestor.segments.len()] == ancestor.segments[..]
    }

    /// The path segments, in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (0 for the root).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourcePath({self})")
    }
}

impl FromStr for ResourcePath {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ResourcePath {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ResourcePath> for String {
    fn from(path: ResourcePath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_root() {
        let path = ResourcePath::parse("/").unwrap();
        assert!(path.is_root());
        assert_eq!(path.to_string(), "/");
        assert_eq!(path.name(), None);
        assert_eq!(path.parent(), None);
    }

    #[test]
    fn parse_nested() {
        let path = ResourcePath::parse("/a/b/c").unwrap();
        assert_eq!(path.depth(), 3);
        assert_eq!(path.name(), Some("c"));
        assert_eq!(path.to_string(), "/a/b/c");
    }

    #[test]
    fn parse_normalizes_slashes() {
        assert_eq!(
            ResourcePath::parse("a/b/").unwrap(),
            ResourcePath::parse("/a/b").unwrap()
        );
    }

    #[test]
    fn parse_rejects_empty_segment() {
        assert!(ResourcePath::parse("/a//b").is_err());
    }

    #[test]
    fn parse_rejects_dot_segments() {
        assert!(ResourcePath::parse("/a/./b").is_err());
        assert!(ResourcePath::parse("/a/../b").is_err());
    }

    #[test]
    fn parent_chain() {
        let path = ResourcePath::parse("/a/b").unwrap();
        let parent = path.parent().unwrap();
        assert_eq!(parent.to_string(), "/a");
        assert_eq!(parent.parent().unwrap(), ResourcePath::root());
    }

    #[test]
    fn child_appends_segment() {
        let path = ResourcePath::root().child("users").unwrap();
        assert_eq!(path.to_string(), "/users");
        assert!(path.child("a/b").is_err());
        assert!(path.child("").is_err());
    }

    #[test]
    fn starts_with_ancestors() {
        let folder = ResourcePath::parse("/site/docs").unwrap();
        let page = ResourcePath::parse("/site/docs/intro").unwrap();
        let sibling = ResourcePath::parse("/site/docs2").unwrap();
        assert!(page.starts_with(&folder));
        assert!(folder.starts_with(&folder));
        assert!(page.starts_with(&ResourcePath::root()));
        assert!(!sibling.starts_with(&folder));
    }

    #[test]
    fn ordering_groups_descendants() {
        let mut paths = vec![
            ResourcePath::parse("/b").unwrap(),
            ResourcePath::parse("/a/z").unwrap(),
            ResourcePath::parse("/a").unwrap(),
        ];
        paths.sort();
        assert_eq!(paths[0].to_string(), "/a");
        assert_eq!(paths[1].to_string(), "/a/z");
        assert_eq!(paths[2].to_string(), "/b");
    }
}
