//! Locations inside a metadata document.
//!
//! A [`DocumentPath`] is the sequence of object keys and array indices that
//! leads from the document root to a value. It plays the role a source span
//! plays for text input: every diagnostic points at one.

use std::fmt;

/// One step of a [`DocumentPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object member name.
    Key(String),
    /// An array position.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(idx) => write!(f, "{idx}"),
        }
    }
}

/// Path from the document root to a value.
///
/// Displayed with `.` between segments; the root path displays as an empty
/// string.
///
/// # Example
///
/// ```
/// # use plansheet_schema::error::DocumentPath;
/// let path = DocumentPath::root()
///     .key("drawings")
///     .key("101")
///     .key("disciplines")
///     .key("구조")
///     .key("revisions")
///     .index(0);
///
/// assert_eq!(path.to_string(), "drawings.101.disciplines.구조.revisions.0");
/// assert_eq!(path.len(), 6);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    segments: Vec<PathSegment>,
}

impl DocumentPath {
    /// Returns the path of the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path extended with an object key.
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.child(PathSegment::Key(key.into()))
    }

    /// Returns a new path extended with an array index.
    pub fn index(&self, idx: usize) -> Self {
        self.child(PathSegment::Index(idx))
    }

    /// Get the segments of this path.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Checks whether this is the root path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for DocumentPath {
    /// Builds a path of object keys.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter
                .into_iter()
                .map(|key| PathSegment::Key(key.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path() {
        let path = DocumentPath::root();
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn test_child_paths_do_not_alias() {
        let drawings = DocumentPath::root().key("drawings");
        let a = drawings.key("a");
        let b = drawings.key("b");

        assert_eq!(drawings.len(), 1);
        assert_eq!(a.to_string(), "drawings.a");
        assert_eq!(b.to_string(), "drawings.b");
    }

    #[test]
    fn test_from_iter_builds_keys() {
        let path: DocumentPath = ["drawings", "102", "parent"].into_iter().collect();
        assert_eq!(path, DocumentPath::root().key("drawings").key("102").key("parent"));
    }

    #[test]
    fn test_index_segment() {
        let path = DocumentPath::root().key("disciplines").index(3);
        assert_eq!(path.segments()[1], PathSegment::Index(3));
        assert_eq!(path.to_string(), "disciplines.3");
    }
}
