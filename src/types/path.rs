//! Tree addressing: locations in the database as lists of keys.

use crate::Error;
use std::fmt;

/// Longest key the database accepts, in UTF-8 bytes.
pub const MAX_KEY_BYTES: usize = 768;

/// A location in the database tree. The empty path is the root.
///
/// Navigation never fails: `child("a/b")`, `child("/a//b/")` and
/// `child("x/../a/b")` all name the same location. Keys are checked when a
/// request is built, see [`DbPath::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DbPath {
    segments: Vec<String>,
}

impl DbPath {
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn parse(path: &str) -> Self {
        Self::root().child(path)
    }

    /// Resolve `path` relative to this location.
    ///
    /// Empty segments and `.` are skipped, `..` steps up one level and stops at
    /// the root.
    #[must_use]
    pub fn child(&self, path: &str) -> Self {
        let mut segments = self.segments.clone();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                key => segments.push(key.to_owned()),
            }
        }
        Self { segments }
    }

    /// `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// Last key, `None` at the root.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Check every key against the database's key rules: at most
    /// [`MAX_KEY_BYTES`] bytes, none of `. $ # [ ] /`, no ASCII control characters.
    pub fn validate(&self) -> Result<(), Error> {
        self.segments.iter().try_for_each(|key| validate_key(key))
    }
}

pub(crate) fn validate_key(key: &str) -> Result<(), Error> {
    if key.is_empty() {
        return Err(Error::invalid_request("database keys must not be empty"));
    }
    if key.len() > MAX_KEY_BYTES {
        return Err(Error::invalid_request(format!(
            "database key exceeds {MAX_KEY_BYTES} bytes"
        )));
    }
    if let Some(c) = key
        .chars()
        .find(|c| matches!(c, '.' | '$' | '#' | '[' | ']' | '/') || c.is_ascii_control())
    {
        return Err(Error::invalid_request(format!(
            "database key {key:?} contains forbidden character {c:?}"
        )));
    }
    Ok(())
}

impl fmt::Display for DbPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for key in &self.segments {
            write!(f, "/{key}")?;
        }
        Ok(())
    }
}

impl From<&str> for DbPath {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for DbPath {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&String> for DbPath {
    fn from(value: &String) -> Self {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_strips_slashes_and_splits_segments() {
        let path = DbPath::parse("users").child("/alice//profile/");
        assert_eq!(path.to_string(), "/users/alice/profile");
        assert_eq!(path.key(), Some("profile"));
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn child_resolves_dot_segments() {
        let path = DbPath::parse("users/alice").child("../bob/./name");
        assert_eq!(path.to_string(), "/users/bob/name");
        assert!(DbPath::parse("a").child("../../..").is_root());
    }

    #[test]
    fn parent_walks_up_to_root_then_stops() {
        let path = DbPath::parse("a/b");
        let parent = path.parent().unwrap();
        assert_eq!(parent.to_string(), "/a");
        let root = parent.parent().unwrap();
        assert!(root.is_root());
        assert_eq!(root.to_string(), "/");
        assert_eq!(root.key(), None);
        assert!(root.parent().is_none());
    }

    #[test]
    fn validate_rejects_forbidden_characters() {
        assert!(DbPath::parse("users/alice").validate().is_ok());
        assert!(DbPath::parse("users/a.b").validate().is_err());
        assert!(DbPath::parse("users/$uid").validate().is_err());
        assert!(DbPath::parse("tags/[x]").validate().is_err());
        assert!(DbPath::parse("bad\u{7}key").validate().is_err());
        assert!(DbPath::root().validate().is_ok());
    }

    #[test]
    fn validate_rejects_oversized_keys() {
        let long = "k".repeat(MAX_KEY_BYTES + 1);
        assert!(DbPath::parse(&long).validate().is_err());
        assert!(DbPath::parse(&long[1..]).validate().is_ok());
    }
}
