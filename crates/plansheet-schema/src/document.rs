//! Typed metadata document.
//!
//! These types are the result of decoding and coercing an untrusted JSON
//! value (see [`crate::coerce`]). Every image path is already rooted under
//! [`ASSET_PREFIX`](crate::ASSET_PREFIX) and every transform has its identity
//! defaults filled in.
//!
//! Maps keep the order in which entries appear in the source so that
//! diagnostics are reported in document order.

use indexmap::IndexMap;
use serde::Serialize;

use plansheet_core::geometry::{AlignmentTransform, Polygon, Transform, Vertex};

/// A whole metadata document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub project: Project,
    /// Disciplines a drawing may use.
    pub disciplines: Vec<DisciplineName>,
    /// Drawings keyed by drawing id.
    pub drawings: IndexMap<String, Drawing>,
}

impl Document {
    /// Returns `true` if `name` is in the declared discipline list.
    pub fn declares_discipline(&self, name: &str) -> bool {
        self.disciplines.iter().any(|d| d.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub name: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisciplineName {
    pub name: String,
}

/// One drawing sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    pub id: String,
    pub name: String,
    pub image: String,
    pub parent: Option<String>,
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub disciplines: IndexMap<String, Discipline>,
}

/// Placement of a drawing inside its parent drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub vertices: Vec<Vertex>,
    pub image_transform: Transform,
}

/// One discipline of a drawing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discipline {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_transform: Option<AlignmentTransform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Polygon>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub regions: IndexMap<String, Region>,
    /// Revisions not scoped to a region. Empty when the source omits the list.
    pub revisions: Vec<Revision>,
}

/// A spatial subdivision of a discipline with its own revision history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Polygon>,
    /// Never empty.
    pub revisions: Vec<Revision>,
}

/// One issued revision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub version: String,
    pub image: String,
    pub date: String,
    pub description: String,
    pub changes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_transform: Option<AlignmentTransform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Polygon>,
}
