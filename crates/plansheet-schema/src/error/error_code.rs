//! Error codes for the validation diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Shape errors (the input does not match the schema)
//! - `E2xx` - Integrity errors (well-shaped input violating a domain invariant)
//! - `W3xx` - Reference warnings (soft inconsistencies)

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Shape Errors (E1xx)
    // =========================================================================
    /// Invalid type.
    ///
    /// A value has a different JSON type than the schema requires.
    E100,

    /// Missing required field.
    E101,

    /// Invalid vertex.
    ///
    /// A polygon vertex must be a two-element array of numbers `[x, y]`.
    E102,

    /// Empty revision list.
    ///
    /// A region must list at least one revision.
    E103,

    // =========================================================================
    // Integrity Errors (E2xx)
    // =========================================================================
    /// Drawing key mismatch.
    ///
    /// The key of an entry in `drawings` differs from the drawing's own `id`.
    E200,

    /// Unknown parent drawing.
    ///
    /// A drawing's `parent` names a drawing that is not in the document.
    E201,

    /// Unknown discipline.
    ///
    /// A drawing uses a discipline that is not in the document's declared
    /// discipline list.
    E202,

    /// Missing region revision transform.
    ///
    /// A revision scoped to a region must carry an `imageTransform`.
    E203,

    /// Invalid identifier.
    ///
    /// Identifiers that become layer key segments must be non-empty and must
    /// not contain `:`.
    E204,

    /// Duplicate revision version.
    ///
    /// Two revisions in the same discipline or region share a version, so
    /// their layer keys would collide.
    E205,

    // =========================================================================
    // Reference Warnings (W3xx)
    // =========================================================================
    /// Unresolved alignment reference.
    ///
    /// An `imageTransform.relativeTo` does not match any image in the document.
    W300,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E201").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Shape errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            // Integrity errors
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            // Reference warnings
            ErrorCode::W300 => "W300",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "invalid type",
            ErrorCode::E101 => "missing required field",
            ErrorCode::E102 => "invalid vertex",
            ErrorCode::E103 => "empty revision list",
            ErrorCode::E200 => "drawing key mismatch",
            ErrorCode::E201 => "unknown parent drawing",
            ErrorCode::E202 => "unknown discipline",
            ErrorCode::E203 => "missing region revision transform",
            ErrorCode::E204 => "invalid identifier",
            ErrorCode::E205 => "duplicate revision version",
            ErrorCode::W300 => "unresolved alignment reference",
        }
    }

    /// Returns `true` for codes reported when the input does not match the schema.
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            ErrorCode::E100 | ErrorCode::E101 | ErrorCode::E102 | ErrorCode::E103
        )
    }

    /// Returns `true` for codes a document cannot be normalized past.
    ///
    /// Shape errors leave no coerced document. Invalid identifiers (`E204`)
    /// and duplicate versions (`E205`) would produce layer keys that do not
    /// decode or that collide.
    pub fn is_fatal(&self) -> bool {
        self.is_shape() || matches!(self, ErrorCode::E204 | ErrorCode::E205)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E203.to_string(), "E203");
        assert_eq!(ErrorCode::W300.to_string(), "W300");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E201.description(), "unknown parent drawing");
        assert_eq!(ErrorCode::W300.description(), "unresolved alignment reference");
    }

    #[test]
    fn test_error_code_is_shape() {
        assert!(ErrorCode::E101.is_shape());
        assert!(!ErrorCode::E200.is_shape());
        assert!(!ErrorCode::W300.is_shape());
    }

    #[test]
    fn test_error_code_is_fatal() {
        assert!(ErrorCode::E100.is_fatal());
        assert!(ErrorCode::E204.is_fatal());
        assert!(ErrorCode::E205.is_fatal());
        assert!(!ErrorCode::E200.is_fatal());
        assert!(!ErrorCode::E201.is_fatal());
        assert!(!ErrorCode::W300.is_fatal());
    }
}
