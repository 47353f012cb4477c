//! The ValidationError type for wrapping blocking diagnostics.
//!
//! [`ValidationError`] wraps the diagnostics of a failed validation. When the
//! input matched the schema and only invariant checks failed, it also keeps
//! the coerced document so a caller may choose to continue with degraded data.

use std::fmt;

use crate::{
    document::Document,
    error::{Diagnostic, ErrorCode},
};

/// Error type for a failed validation.
///
/// Wraps one or more diagnostics, at least one of which is an error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    diagnostics: Vec<Diagnostic>,
    document: Option<Box<Document>>,
}

impl ValidationError {
    /// Create a new validation error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            diagnostics,
            document: None,
        }
    }

    /// Attach the coerced document the diagnostics refer to.
    pub fn with_document(mut self, document: Document) -> Self {
        self.document = Some(Box::new(document));
        self
    }

    /// Get all diagnostics in this error, warnings included.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Iterate over the blocking diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity().is_error())
    }

    /// Returns `true` if the input did not match the schema.
    ///
    /// No coerced document is available in that case.
    pub fn is_shape_error(&self) -> bool {
        self.document.is_none()
    }

    /// Returns `true` if the coerced document may still be normalized.
    ///
    /// That needs a coerced document and no error with a
    /// [fatal](ErrorCode::is_fatal) code.
    pub fn is_recoverable(&self) -> bool {
        self.document.is_some()
            && !self
                .errors()
                .any(|d| d.code().is_some_and(|code| code.is_fatal()))
    }

    /// Borrow the coerced document, if the input matched the schema.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_deref()
    }

    /// Take the coerced document, if the input matched the schema.
    pub fn into_document(self) -> Option<Document> {
        self.document.map(|document| *document)
    }

    /// Split into the diagnostics and the coerced document, if any.
    pub fn into_parts(self) -> (Vec<Diagnostic>, Option<Document>) {
        (self.diagnostics, self.document.map(|document| *document))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut errors = self.errors();
        if let Some(first) = errors.next() {
            write!(f, "{}", first)?;
            let rest = errors.count();
            if rest > 0 {
                write!(f, " (+{} more)", rest)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<Diagnostic> for ValidationError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(vec![diagnostic])
    }
}

impl From<Vec<Diagnostic>> for ValidationError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self::new(diagnostics)
    }
}
