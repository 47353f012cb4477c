//! Geometric primitives attached to drawing layers.
//!
//! This module provides the plain parameter types that describe how a layer
//! image is positioned relative to another image, and which area of a sheet a
//! layer covers.
//!
//! # Overview
//!
//! - [`Transform`] - Translation, uniform scale and rotation (radians)
//! - [`AlignmentTransform`] - A [`Transform`] anchored on a base image via `relativeTo`
//! - [`Vertex`] - A 2D point of a polygon outline
//! - [`Polygon`] - An ordered outline together with the [`Transform`] applied to it
//!
//! No geometry is computed here. The values are carried through from the
//! source document so a renderer can apply them.

use serde::{Deserialize, Serialize};

/// Translation, scale and rotation of an image or outline.
///
/// Missing fields in a source document default to the identity transform
/// (`x = 0`, `y = 0`, `scale = 1`, `rotation = 0`).
///
/// # Examples
///
/// ```
/// # use plansheet_core::geometry::Transform;
/// let t = Transform::default();
/// assert!(t.is_identity());
///
/// let moved = Transform::identity().with_offset(10.0, -4.5);
/// assert_eq!(moved.x(), 10.0);
/// assert!(!moved.is_identity());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    x: f64,
    y: f64,
    scale: f64,
    /// Rotation in radians.
    rotation: f64,
}

impl Transform {
    /// Creates a transform from its four parameters.
    pub fn new(x: f64, y: f64, scale: f64, rotation: f64) -> Self {
        Self {
            x,
            y,
            scale,
            rotation,
        }
    }

    /// Returns the identity transform.
    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 1.0, 0.0)
    }

    /// Returns the horizontal offset.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Returns the vertical offset.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Returns the uniform scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Returns the rotation in radians.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Returns a copy with the given translation.
    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Returns a copy with the given scale factor.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Returns a copy with the given rotation in radians.
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Checks whether this transform leaves content unchanged.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// A [`Transform`] describing how an overlay image is placed over a base image.
///
/// `relative_to` names the base image (an asset path) the transform is
/// expressed against. Layers sharing the same `relative_to` form a reference
/// group and can be overlaid on one another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentTransform {
    #[serde(flatten)]
    transform: Transform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    relative_to: Option<String>,
}

impl AlignmentTransform {
    /// Creates an alignment transform.
    ///
    /// # Arguments
    ///
    /// * `transform` - Placement parameters.
    /// * `relative_to` - Base image path the parameters are relative to, if any.
    pub fn new(transform: Transform, relative_to: Option<String>) -> Self {
        Self {
            transform,
            relative_to,
        }
    }

    /// Returns the placement parameters.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Returns the base image path, if declared.
    pub fn relative_to(&self) -> Option<&str> {
        self.relative_to.as_deref()
    }
}

impl From<Transform> for AlignmentTransform {
    fn from(transform: Transform) -> Self {
        Self::new(transform, None)
    }
}

/// A single polygon vertex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Vertex {
    x: f64,
    y: f64,
}

impl Vertex {
    /// Creates a vertex at the given coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate.
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate.
    pub fn y(self) -> f64 {
        self.y
    }
}

impl From<[f64; 2]> for Vertex {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Vertex> for [f64; 2] {
    fn from(vertex: Vertex) -> Self {
        [vertex.x, vertex.y]
    }
}

/// An ordered outline of vertices plus the transform applied to them.
///
/// Used to mark the area of a sheet that a discipline, region or revision
/// covers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Vertex>,
    transform: Transform,
}

impl Polygon {
    /// Creates a polygon from its vertices and transform.
    pub fn new(vertices: Vec<Vertex>, transform: Transform) -> Self {
        Self {
            vertices,
            transform,
        }
    }

    /// Returns the outline vertices in order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the transform applied to the outline.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Returns the number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Checks whether the outline has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.x(), 0.0);
        assert_eq!(t.y(), 0.0);
        assert_eq!(t.scale(), 1.0);
        assert_eq!(t.rotation(), 0.0);
        assert!(t.is_identity());
    }

    #[test]
    fn test_transform_builders() {
        let t = Transform::identity()
            .with_offset(3.0, 4.0)
            .with_scale(0.5)
            .with_rotation(1.25);
        assert_eq!(t, Transform::new(3.0, 4.0, 0.5, 1.25));
        assert!(!t.is_identity());
    }

    #[test]
    fn test_alignment_transform_relative_to() {
        let a = AlignmentTransform::new(Transform::identity(), Some("/drawings/a.png".into()));
        assert_eq!(a.relative_to(), Some("/drawings/a.png"));

        let b: AlignmentTransform = Transform::identity().into();
        assert_eq!(b.relative_to(), None);
    }

    #[test]
    fn test_alignment_transform_serializes_flat() {
        let a = AlignmentTransform::new(
            Transform::new(1.0, 2.0, 1.0, 0.0),
            Some("/drawings/base.png".into()),
        );
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["x"], 1.0);
        assert_eq!(json["y"], 2.0);
        assert_eq!(json["relativeTo"], "/drawings/base.png");
    }

    #[test]
    fn test_vertex_serializes_as_pair() {
        let v = Vertex::new(1.5, -2.0);
        let json = serde_json::to_value(v).unwrap();
        assert_eq!(json, serde_json::json!([1.5, -2.0]));
    }

    #[test]
    fn test_polygon_accessors() {
        let p = Polygon::new(
            vec![Vertex::new(0.0, 0.0), Vertex::new(1.0, 0.0), Vertex::new(1.0, 1.0)],
            Transform::identity(),
        );
        assert_eq!(p.len(), 3);
        assert!(!p.is_empty());
        assert_eq!(p.vertices()[1].x(), 1.0);
        assert!(Polygon::default().is_empty());
    }
}
