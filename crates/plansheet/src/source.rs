//! Document sources and the last-built model cache.
//!
//! A [`DocumentSource`] produces the raw JSON value of a metadata document.
//! [`MetadataCache`] owns a source and a [`MetadataBuilder`], and keeps the
//! last model it built so repeated loads are free until a refresh is asked
//! for.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, info};
use serde_json::Value;

use crate::{MetadataBuilder, PlansheetError, meta::NormalizedMeta};

/// Something that can produce a raw metadata document.
pub trait DocumentSource {
    /// Fetch the current document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or is not JSON.
    fn fetch(&self) -> Result<Value, PlansheetError>;
}

/// Reads a document from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for FileSource {
    fn fetch(&self) -> Result<Value, PlansheetError> {
        info!(path = self.path.display().to_string(); "Reading metadata file");
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Serves a document held in memory.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    value: Value,
}

impl InMemorySource {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Replace the served document. Cached models are not touched.
    pub fn replace(&mut self, value: Value) {
        self.value = value;
    }
}

impl DocumentSource for InMemorySource {
    fn fetch(&self) -> Result<Value, PlansheetError> {
        Ok(self.value.clone())
    }
}

/// Caches the last model built from a [`DocumentSource`].
///
/// The cached model is shared as an [`Arc`]; a refresh builds a new model and
/// swaps the whole snapshot, so holders of an older snapshot keep a
/// consistent view.
///
/// # Example
///
/// ```
/// # use plansheet::{MetadataBuilder, source::{InMemorySource, MetadataCache}};
/// # use std::sync::Arc;
/// let source = InMemorySource::new(serde_json::json!({
///     "project": { "name": "Tower", "unit": "mm" },
///     "disciplines": [],
///     "drawings": {}
/// }));
/// let mut cache = MetadataCache::new(source, MetadataBuilder::default());
///
/// let first = cache.load(false).unwrap();
/// let second = cache.load(false).unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
///
/// let refreshed = cache.load(true).unwrap();
/// assert!(!Arc::ptr_eq(&first, &refreshed));
/// ```
#[derive(Debug)]
pub struct MetadataCache<S> {
    source: S,
    builder: MetadataBuilder,
    cached: Option<Arc<NormalizedMeta>>,
}

impl<S: DocumentSource> MetadataCache<S> {
    /// Create an empty cache over `source`.
    pub fn new(source: S, builder: MetadataBuilder) -> Self {
        Self {
            source,
            builder,
            cached: None,
        }
    }

    /// Return the cached model, building it first if needed.
    ///
    /// With `force_refresh` the document is fetched and built again even if a
    /// model is cached. On failure the previous snapshot is kept.
    ///
    /// # Errors
    ///
    /// Returns any fetch, validation or normalization error.
    pub fn load(&mut self, force_refresh: bool) -> Result<Arc<NormalizedMeta>, PlansheetError> {
        if !force_refresh {
            if let Some(cached) = &self.cached {
                debug!("Serving cached metadata");
                return Ok(Arc::clone(cached));
            }
        }

        let value = self.source.fetch()?;
        let meta = Arc::new(self.builder.build(&value)?);
        self.cached = Some(Arc::clone(&meta));
        Ok(meta)
    }

    /// Return the cached model without building one.
    pub fn cached(&self) -> Option<Arc<NormalizedMeta>> {
        self.cached.clone()
    }

    /// Drop the cached model; the next [`Self::load`] rebuilds.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Returns the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the underlying source mutably.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
