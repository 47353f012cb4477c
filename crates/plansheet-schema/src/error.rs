//! Error and diagnostic system for metadata validation.
//!
//! This module provides:
//! - Error codes for documentation and searchability
//! - Document paths locating each problem inside the input
//! - Severity levels separating blocking errors from warnings
//! - A diagnostic collector for accumulating every issue in one pass
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning with an optional error code, the [`DocumentPath`]
//! of the offending value, and help text. Blocking diagnostics are wrapped in
//! [`ValidationError`] when validation fails.
//!
//! # Example
//!
//! ```
//! # use plansheet_schema::error::{Diagnostic, DocumentPath, ErrorCode};
//! let path = DocumentPath::root().key("drawings").key("102").key("parent");
//!
//! let diag = Diagnostic::error("parent does not exist: 999")
//!     .with_code(ErrorCode::E201)
//!     .with_path(path)
//!     .with_help("reference an existing drawing id or use null");
//!
//! assert_eq!(diag.path().to_string(), "drawings.102.parent");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod path;
mod severity;
mod validation_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use path::{DocumentPath, PathSegment};
pub use severity::Severity;
pub use validation_error::ValidationError;
