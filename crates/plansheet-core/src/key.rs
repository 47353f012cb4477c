//! Layer keys: stable string identifiers for layer nodes.
//!
//! Every layer node is addressed by a [`LayerKey`], a colon-delimited string
//! whose first segment names the kind and whose segment count is fixed per
//! kind:
//!
//! ```text
//! drawing:{drawingId}
//! discipline:{drawingId}:{discipline}
//! region:{drawingId}:{discipline}:{region}
//! revision:{drawingId}:{discipline}:{region-or-empty}:{revision}
//! ```
//!
//! A revision key always keeps its region segment; an empty segment means the
//! revision is not scoped to a region. Segments never contain the delimiter,
//! so a key decodes back into exactly one [`LayerLocator`].
//!
//! # Example
//!
//! ```
//! # use plansheet_core::key::{LayerKey, LayerLocator};
//! let key = LayerKey::revision("101", "구조", None, "REV1");
//! assert_eq!(key.as_str(), "revision:101:구조::REV1");
//!
//! let locator = key.decode().unwrap();
//! assert_eq!(locator.revision(), Some("REV1"));
//! assert_eq!(locator.region(), None);
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between key segments.
pub const DELIMITER: char = ':';

/// The four layer keyspaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Drawing,
    Discipline,
    Region,
    Revision,
}

impl LayerKind {
    /// All kinds in hierarchy order.
    pub const ALL: [LayerKind; 4] = [
        LayerKind::Drawing,
        LayerKind::Discipline,
        LayerKind::Region,
        LayerKind::Revision,
    ];

    /// Returns the key prefix for this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Drawing => "drawing",
            Self::Discipline => "discipline",
            Self::Region => "region",
            Self::Revision => "revision",
        }
    }

    /// Returns the number of delimiter-separated segments a key of this kind has,
    /// including the prefix.
    pub fn segment_count(&self) -> usize {
        match self {
            Self::Drawing => 2,
            Self::Discipline => 3,
            Self::Region => 4,
            Self::Revision => 5,
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for LayerKind {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drawing" => Ok(Self::Drawing),
            "discipline" => Ok(Self::Discipline),
            "region" => Ok(Self::Region),
            "revision" => Ok(Self::Revision),
            other => Err(KeyError::UnknownKind(other.to_string())),
        }
    }
}

/// Errors produced when decoding a layer key or checking a key segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("layer key is empty")]
    Empty,

    #[error("unknown layer kind `{0}`")]
    UnknownKind(String),

    #[error("{kind} key expects {expected} segments, found {found}")]
    SegmentCount {
        kind: LayerKind,
        expected: usize,
        found: usize,
    },

    #[error("{kind} key has an empty `{segment}` segment")]
    EmptySegment {
        kind: LayerKind,
        segment: &'static str,
    },

    #[error("`{0}` contains the key delimiter `:`")]
    ContainsDelimiter(String),

    #[error("identifier must not be empty")]
    EmptyIdentifier,
}

/// Checks that a value can be used as a key segment.
///
/// A segment must be non-empty and must not contain [`DELIMITER`].
pub fn check_segment(value: &str) -> Result<(), KeyError> {
    if value.is_empty() {
        return Err(KeyError::EmptyIdentifier);
    }
    if value.contains(DELIMITER) {
        return Err(KeyError::ContainsDelimiter(value.to_string()));
    }
    Ok(())
}

/// The structured form of a [`LayerKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayerLocator {
    Drawing {
        drawing_id: String,
    },
    Discipline {
        drawing_id: String,
        discipline: String,
    },
    Region {
        drawing_id: String,
        discipline: String,
        region: String,
    },
    Revision {
        drawing_id: String,
        discipline: String,
        region: Option<String>,
        revision: String,
    },
}

impl LayerLocator {
    /// Returns the kind of layer this locator addresses.
    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Drawing { .. } => LayerKind::Drawing,
            Self::Discipline { .. } => LayerKind::Discipline,
            Self::Region { .. } => LayerKind::Region,
            Self::Revision { .. } => LayerKind::Revision,
        }
    }

    /// Returns the drawing id.
    pub fn drawing_id(&self) -> &str {
        match self {
            Self::Drawing { drawing_id }
            | Self::Discipline { drawing_id, .. }
            | Self::Region { drawing_id, .. }
            | Self::Revision { drawing_id, .. } => drawing_id,
        }
    }

    /// Returns the discipline name, if this locator has one.
    pub fn discipline(&self) -> Option<&str> {
        match self {
            Self::Drawing { .. } => None,
            Self::Discipline { discipline, .. }
            | Self::Region { discipline, .. }
            | Self::Revision { discipline, .. } => Some(discipline),
        }
    }

    /// Returns the region name, if this locator has one.
    pub fn region(&self) -> Option<&str> {
        match self {
            Self::Drawing { .. } | Self::Discipline { .. } => None,
            Self::Region { region, .. } => Some(region),
            Self::Revision { region, .. } => region.as_deref(),
        }
    }

    /// Returns the revision version, if this locator has one.
    pub fn revision(&self) -> Option<&str> {
        match self {
            Self::Drawing { .. } | Self::Discipline { .. } | Self::Region { .. } => None,
            Self::Revision { revision, .. } => Some(revision),
        }
    }

    /// Encodes this locator into its key.
    ///
    /// Segments are joined as-is; callers must keep segments free of
    /// [`DELIMITER`] (see [`check_segment`]) for the key to decode back.
    pub fn encode(&self) -> LayerKey {
        let raw = match self {
            Self::Drawing { drawing_id } => format!("drawing:{drawing_id}"),
            Self::Discipline {
                drawing_id,
                discipline,
            } => format!("discipline:{drawing_id}:{discipline}"),
            Self::Region {
                drawing_id,
                discipline,
                region,
            } => format!("region:{drawing_id}:{discipline}:{region}"),
            Self::Revision {
                drawing_id,
                discipline,
                region,
                revision,
            } => {
                let region = region.as_deref().unwrap_or_default();
                format!("revision:{drawing_id}:{discipline}:{region}:{revision}")
            }
        };
        LayerKey(raw)
    }
}

impl FromStr for LayerLocator {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(KeyError::Empty);
        }

        let parts: Vec<&str> = s.split(DELIMITER).collect();
        let kind: LayerKind = parts[0].parse()?;

        if parts.len() != kind.segment_count() {
            return Err(KeyError::SegmentCount {
                kind,
                expected: kind.segment_count(),
                found: parts.len(),
            });
        }

        let required = |idx: usize, segment: &'static str| -> Result<String, KeyError> {
            match parts[idx] {
                "" => Err(KeyError::EmptySegment { kind, segment }),
                value => Ok(value.to_string()),
            }
        };

        match kind {
            LayerKind::Drawing => Ok(Self::Drawing {
                drawing_id: required(1, "drawingId")?,
            }),
            LayerKind::Discipline => Ok(Self::Discipline {
                drawing_id: required(1, "drawingId")?,
                discipline: required(2, "discipline")?,
            }),
            LayerKind::Region => Ok(Self::Region {
                drawing_id: required(1, "drawingId")?,
                discipline: required(2, "discipline")?,
                region: required(3, "region")?,
            }),
            LayerKind::Revision => Ok(Self::Revision {
                drawing_id: required(1, "drawingId")?,
                discipline: required(2, "discipline")?,
                region: Some(parts[3])
                    .filter(|region| !region.is_empty())
                    .map(str::to_string),
                revision: required(4, "revision")?,
            }),
        }
    }
}

impl fmt::Display for LayerLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.encode(), f)
    }
}

/// Opaque string key identifying one layer node.
///
/// Keys order lexicographically by their string form, which is the order used
/// for every sorted key list in the normalized model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerKey(String);

impl LayerKey {
    /// Key of a drawing layer.
    pub fn drawing(drawing_id: &str) -> Self {
        LayerLocator::Drawing {
            drawing_id: drawing_id.to_string(),
        }
        .encode()
    }

    /// Key of a discipline layer.
    pub fn discipline(drawing_id: &str, discipline: &str) -> Self {
        LayerLocator::Discipline {
            drawing_id: drawing_id.to_string(),
            discipline: discipline.to_string(),
        }
        .encode()
    }

    /// Key of a region layer.
    pub fn region(drawing_id: &str, discipline: &str, region: &str) -> Self {
        LayerLocator::Region {
            drawing_id: drawing_id.to_string(),
            discipline: discipline.to_string(),
            region: region.to_string(),
        }
        .encode()
    }

    /// Key of a revision layer, optionally scoped to a region.
    pub fn revision(drawing_id: &str, discipline: &str, region: Option<&str>, revision: &str) -> Self {
        LayerLocator::Revision {
            drawing_id: drawing_id.to_string(),
            discipline: discipline.to_string(),
            region: region.map(str::to_string),
            revision: revision.to_string(),
        }
        .encode()
    }

    /// Wraps an arbitrary string without checking it.
    ///
    /// Use [`LayerKey::decode`] or [`str::parse`] to check the format.
    pub fn new_unchecked(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the kind named by the key prefix, without checking the remaining segments.
    pub fn kind(&self) -> Option<LayerKind> {
        kind_of(&self.0)
    }

    /// Decodes the key into its locator.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] when the prefix is unknown, the segment count does
    /// not match the kind, or a mandatory segment is empty.
    pub fn decode(&self) -> Result<LayerLocator, KeyError> {
        self.0.parse()
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LayerKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let locator: LayerLocator = s.parse()?;
        Ok(locator.encode())
    }
}

impl AsRef<str> for LayerKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for LayerKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&LayerLocator> for LayerKey {
    fn from(locator: &LayerLocator) -> Self {
        locator.encode()
    }
}

/// Returns the kind named by a string's key prefix, if it has one.
///
/// This only checks the prefix; it does not validate the segments.
pub fn kind_of(value: &str) -> Option<LayerKind> {
    LayerKind::ALL.into_iter().find(|kind| {
        value
            .strip_prefix(kind.prefix())
            .is_some_and(|rest| rest.starts_with(DELIMITER))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_each_kind() {
        assert_eq!(LayerKey::drawing("101").as_str(), "drawing:101");
        assert_eq!(LayerKey::discipline("101", "건축").as_str(), "discipline:101:건축");
        assert_eq!(
            LayerKey::region("101", "구조", "A").as_str(),
            "region:101:구조:A"
        );
        assert_eq!(
            LayerKey::revision("101", "구조", Some("A"), "REV2").as_str(),
            "revision:101:구조:A:REV2"
        );
        assert_eq!(
            LayerKey::revision("101", "구조", None, "REV1").as_str(),
            "revision:101:구조::REV1"
        );
    }

    #[test]
    fn test_decode_revision_without_region() {
        let locator: LayerLocator = "revision:101:구조::REV1".parse().unwrap();
        assert_eq!(
            locator,
            LayerLocator::Revision {
                drawing_id: "101".into(),
                discipline: "구조".into(),
                region: None,
                revision: "REV1".into(),
            }
        );
    }

    #[test]
    fn test_decode_region() {
        let locator = LayerKey::region("7", "설비", "B").decode().unwrap();
        assert_eq!(locator.kind(), LayerKind::Region);
        assert_eq!(locator.drawing_id(), "7");
        assert_eq!(locator.discipline(), Some("설비"));
        assert_eq!(locator.region(), Some("B"));
        assert_eq!(locator.revision(), None);
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert_eq!("".parse::<LayerLocator>(), Err(KeyError::Empty));
    }

    #[test]
    fn test_decode_rejects_unknown_kind() {
        assert_eq!(
            "sheet:101".parse::<LayerLocator>(),
            Err(KeyError::UnknownKind("sheet".into()))
        );
    }

    #[test]
    fn test_decode_rejects_wrong_segment_count() {
        assert_eq!(
            "drawing:101:extra".parse::<LayerLocator>(),
            Err(KeyError::SegmentCount {
                kind: LayerKind::Drawing,
                expected: 2,
                found: 3,
            })
        );
        assert!("revision:101:구조:REV1".parse::<LayerLocator>().is_err());
        assert!("region:101:구조".parse::<LayerLocator>().is_err());
    }

    #[test]
    fn test_decode_rejects_empty_mandatory_segment() {
        assert_eq!(
            "discipline:101:".parse::<LayerLocator>(),
            Err(KeyError::EmptySegment {
                kind: LayerKind::Discipline,
                segment: "discipline",
            })
        );
        assert!("drawing:".parse::<LayerLocator>().is_err());
        assert!("region:101:구조:".parse::<LayerLocator>().is_err());
        assert!("revision:101:구조:A:".parse::<LayerLocator>().is_err());
        assert!("revision::구조:A:REV1".parse::<LayerLocator>().is_err());
    }

    #[test]
    fn test_key_from_str_normalizes_through_locator() {
        let key: LayerKey = "region:1:2:3".parse().unwrap();
        assert_eq!(key, LayerKey::region("1", "2", "3"));
        assert!("nope".parse::<LayerKey>().is_err());
    }

    #[test]
    fn test_kind_of_prefix() {
        assert_eq!(kind_of("drawing:1"), Some(LayerKind::Drawing));
        assert_eq!(kind_of("revision:1:a::r"), Some(LayerKind::Revision));
        assert_eq!(kind_of("drawings:1"), None);
        assert_eq!(kind_of("drawing"), None);
        assert_eq!(LayerKey::new_unchecked("region:x").kind(), Some(LayerKind::Region));
    }

    #[test]
    fn test_check_segment() {
        assert!(check_segment("101").is_ok());
        assert_eq!(check_segment(""), Err(KeyError::EmptyIdentifier));
        assert_eq!(
            check_segment("a:b"),
            Err(KeyError::ContainsDelimiter("a:b".into()))
        );
    }

    #[test]
    fn test_key_ordering_is_lexicographic() {
        let mut keys = vec![
            LayerKey::revision("2", "b", None, "r"),
            LayerKey::drawing("1"),
            LayerKey::discipline("1", "a"),
        ];
        keys.sort();
        let raw: Vec<&str> = keys.iter().map(LayerKey::as_str).collect();
        assert_eq!(raw, vec!["discipline:1:a", "drawing:1", "revision:2:b::r"]);
    }
}
