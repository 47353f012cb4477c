//! Schema decoding and invariant validation for drawing metadata.
//!
//! This crate turns an untrusted JSON value into a typed, coerced
//! [`Document`] and checks it against the domain invariants.
//!
//! Validation runs in two phases:
//!
//! 1. **Shape** - the value is walked against the schema and coerced
//!    (identity transform defaults, image paths rooted under
//!    [`ASSET_PREFIX`]). Any mismatch is an `E1xx` error and stops here.
//! 2. **Invariants** - key/id agreement, parent references, declared
//!    disciplines, region revision transforms and key-safe identifiers
//!    (`E2xx` errors), plus unresolved `relativeTo` references (`W300`
//!    warnings).
//!
//! Every issue of a phase is collected; callers get all of them at once.
//!
//! # Example
//!
//! ```
//! # use plansheet_schema::validate;
//! let value = serde_json::json!({
//!     "project": { "name": "Tower", "unit": "mm" },
//!     "disciplines": [{ "name": "구조" }],
//!     "drawings": {
//!         "101": { "id": "101", "name": "Ground", "image": "101.png",
//!                  "parent": null, "position": null }
//!     }
//! });
//!
//! let validated = validate(&value).unwrap();
//! assert_eq!(validated.document.drawings["101"].image, "/drawings/101.png");
//! assert!(validated.warnings.is_empty());
//! ```

mod decode;
pub mod document;
pub mod error;
mod invariants;

use std::fmt::Write;

use log::{debug, info};
use serde_json::Value;

pub use decode::canonicalize_asset_path;
pub use document::Document;

use decode::Decoder;
use error::{Diagnostic, DiagnosticCollector, ValidationError};

/// Directory every image path is rooted under.
pub const ASSET_PREFIX: &str = "/drawings/";

/// A document that passed validation, with its non-blocking warnings.
#[derive(Debug, Clone)]
pub struct Validated {
    pub document: Document,
    pub warnings: Vec<Diagnostic>,
}

impl Validated {
    /// Warning messages without their codes or paths.
    pub fn warning_messages(&self) -> impl Iterator<Item = &str> {
        self.warnings.iter().map(Diagnostic::message)
    }
}

/// Decode and coerce `value` without running invariant checks.
///
/// # Errors
///
/// Returns every shape diagnostic if `value` does not match the schema.
pub fn coerce(value: &Value) -> Result<Document, ValidationError> {
    let mut collector = DiagnosticCollector::new();
    let document = Decoder::new(&mut collector).document(value);
    collector.finish()?;

    // The decoder yields a document exactly when it emitted no errors.
    document.ok_or_else(|| ValidationError::new(Vec::new()))
}

/// Decode, coerce and check `value`.
///
/// # Errors
///
/// Returns a [`ValidationError`] holding every error (and any warnings
/// found alongside them). If only invariant checks failed, the error also
/// carries the coerced document.
pub fn validate(value: &Value) -> Result<Validated, ValidationError> {
    info!("Validating metadata");
    let document = coerce(value)?;
    validate_document(document)
}

/// Run the invariant checks on an already coerced document.
///
/// # Errors
///
/// Returns a [`ValidationError`] carrying `document` if any invariant fails.
pub fn validate_document(document: Document) -> Result<Validated, ValidationError> {
    debug!(
        drawings = document.drawings.len(),
        revisions = invariants::revision_count(&document);
        "Checking invariants"
    );

    let mut collector = DiagnosticCollector::new();
    invariants::check_invariants(&document, &mut collector);

    match collector.finish() {
        Ok(warnings) => {
            info!(warnings = warnings.len(); "Metadata is valid");
            Ok(Validated { document, warnings })
        }
        Err(err) => {
            info!(errors = err.errors().count(); "Metadata failed invariant checks");
            Err(err.with_document(document))
        }
    }
}

/// Render diagnostics one per line as `- path :: message`.
///
/// # Example
///
/// ```
/// # use plansheet_schema::{error::{Diagnostic, DocumentPath}, format_issues};
/// let issues = [Diagnostic::error("parent does not exist: 999")
///     .with_path(DocumentPath::root().key("drawings").key("102").key("parent"))];
///
/// assert_eq!(format_issues(&issues), "- drawings.102.parent :: parent does not exist: 999");
/// ```
pub fn format_issues(issues: &[Diagnostic]) -> String {
    let mut out = String::new();
    for (idx, issue) in issues.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        // Writing into a String cannot fail.
        let _ = write!(out, "- {} :: {}", issue.path(), issue.message());
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_validate_keeps_document_on_integrity_error() {
        let value = json!({
            "project": { "name": "Tower", "unit": "mm" },
            "disciplines": [],
            "drawings": {
                "102": { "id": "102", "name": "Annex", "image": "102.png",
                         "parent": "999", "position": null }
            }
        });

        let err = validate(&value).unwrap_err();
        assert!(!err.is_shape_error());
        assert_eq!(err.errors().count(), 1);
        assert!(err.into_document().is_some());
    }

    #[test]
    fn test_validate_shape_error_has_no_document() {
        let err = validate(&json!({ "project": {} })).unwrap_err();
        assert!(err.is_shape_error());
        assert!(err.errors().all(|d| d.code().is_some_and(|c| c.is_shape())));
    }

    #[test]
    fn test_format_issues_joins_lines() {
        let issues = vec![
            Diagnostic::error("first")
                .with_code(ErrorCode::E100)
                .with_path(error::DocumentPath::root().key("a").index(0)),
            Diagnostic::error("second").with_path(error::DocumentPath::root().key("b")),
        ];

        assert_eq!(format_issues(&issues), "- a.0 :: first\n- b :: second");
        assert_eq!(format_issues(&[]), "");
    }
}
