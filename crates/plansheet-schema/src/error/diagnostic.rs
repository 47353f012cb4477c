//! The core diagnostic type for the validation error system.
//!
//! A [`Diagnostic`] represents a single error or warning with an optional
//! error code, the document path it refers to, and help text.

use std::fmt;

use crate::error::{DocumentPath, Severity, error_code::ErrorCode};

/// A diagnostic message with document location information.
///
/// Diagnostics provide detailed information about errors and warnings,
/// including:
/// - A severity level
/// - An optional error code for documentation and searchability
/// - A primary message describing the issue
/// - The path of the offending value inside the document
/// - Optional help text with suggestions
///
/// # Example
///
/// ```text
/// error[E203]: drawings.101.disciplines.구조.regions.A.revisions.0.imageTransform: region revision requires imageTransform
///   = help: add an imageTransform positioning the revision on its base image
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    path: DocumentPath,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use plansheet_schema::error::{Diagnostic, DocumentPath, ErrorCode};
    /// let diag = Diagnostic::error("unknown discipline key")
    ///     .with_code(ErrorCode::E202)
    ///     .with_path(DocumentPath::root().key("drawings").key("101"))
    ///     .with_help("declare the discipline in the top-level `disciplines` list");
    /// assert!(diag.severity().is_error());
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Create a diagnostic for `code` at the severity [`Severity::of`] gives it.
    pub fn coded(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::of(code), message).with_code(code)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the document path this diagnostic refers to.
    pub fn path(&self) -> &DocumentPath {
        &self.path
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the document path.
    pub fn with_path(mut self, path: DocumentPath) -> Self {
        self.path = path;
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Create a new diagnostic with the given severity and message.
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            path: DocumentPath::root(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E201]: path: message" or "warning: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        if self.path.is_empty() {
            write!(f, ": {}", self.message)
        } else {
            write!(f, ": {}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(Severity::Error, "test error");

        assert!(diag.severity().is_error());
        assert!(!diag.severity().is_warning());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.path().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_with_code() {
        let diag = Diagnostic::new(Severity::Error, "unknown parent").with_code(ErrorCode::E201);

        assert_eq!(diag.code(), Some(ErrorCode::E201));
    }

    #[test]
    fn test_diagnostic_with_help() {
        let diag = Diagnostic::new(Severity::Warning, "relativeTo not found")
            .with_help("check the image file name");

        assert_eq!(diag.help(), Some("check the image file name"));
    }

    #[test]
    fn test_diagnostic_display_with_code_and_path() {
        let diag = Diagnostic::error("parent does not exist: 999")
            .with_code(ErrorCode::E201)
            .with_path(DocumentPath::root().key("drawings").key("102").key("parent"));

        assert_eq!(
            diag.to_string(),
            "error[E201]: drawings.102.parent: parent does not exist: 999"
        );
    }

    #[test]
    fn test_coded_diagnostic_takes_severity_from_code() {
        let warning = Diagnostic::coded(ErrorCode::W300, "relativeTo not found");
        assert!(warning.severity().is_warning());
        assert_eq!(warning.code(), Some(ErrorCode::W300));

        let error = Diagnostic::coded(ErrorCode::E205, "duplicate revision version: R1");
        assert!(error.severity().is_error());
        assert_eq!(error.to_string(), "error[E205]: duplicate revision version: R1");
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        let diag = Diagnostic::new(Severity::Warning, "unused image");

        assert_eq!(diag.to_string(), "warning: unused image");
    }
}
