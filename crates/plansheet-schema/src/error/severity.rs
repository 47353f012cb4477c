//! Severity levels for diagnostics.
//!
//! A document with an error-severity diagnostic is rejected by validation;
//! warnings are returned next to the accepted document. The severity of a
//! coded diagnostic follows from its code: `W`-prefixed codes are warnings.

use std::fmt;

use crate::error::ErrorCode;

/// The severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Fails validation. Shape mismatches and broken references are errors.
    Error,

    /// Reported alongside a successfully validated document, such as a
    /// `relativeTo` that names no known image.
    Warning,
}

impl Severity {
    /// The severity a diagnostic with `code` is reported at.
    ///
    /// # Example
    ///
    /// ```
    /// # use plansheet_schema::error::{ErrorCode, Severity};
    /// assert_eq!(Severity::of(ErrorCode::E201), Severity::Error);
    /// assert_eq!(Severity::of(ErrorCode::W300), Severity::Warning);
    /// ```
    pub fn of(code: ErrorCode) -> Self {
        if code.as_str().starts_with('W') {
            Severity::Warning
        } else {
            Severity::Error
        }
    }

    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}
