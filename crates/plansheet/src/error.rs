//! Error types for plansheet operations.
//!
//! This module provides the main error type [`PlansheetError`] which wraps
//! the error conditions that can occur while loading, validating and
//! normalizing a metadata document.

use std::io;

use thiserror::Error;

use plansheet_core::key::{KeyError, LayerKey};
use plansheet_schema::error::ValidationError;

use crate::normalize::NormalizeError;

/// The main error type for plansheet operations.
///
/// # Diagnostic Variants
///
/// The `Validation` variant carries every diagnostic of the failed pass,
/// each with its document path, code and help text. This can be used for
/// rich error reporting.
#[derive(Debug, Error)]
pub enum PlansheetError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Normalize error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Invalid layer key: {0}")]
    Key(#[from] KeyError),

    #[error("Unknown layer: {0}")]
    UnknownLayer(LayerKey),

    #[error("Configuration error: {0}")]
    Config(String),
}
