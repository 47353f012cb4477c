//! Render-ready view of a layer.
//!
//! A [`RenderableLayer`] is what a viewer needs to draw one layer: the image
//! source, its opacity and the transform to apply. No geometry is computed;
//! the node's alignment parameters are passed through as-is.

use serde::Serialize;

use plansheet_core::{geometry::Transform, key::LayerKey, layer::LayerNode};

/// Descriptive fields shown alongside a rendered layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drawing_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discipline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

/// One layer as handed to a viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderableLayer {
    pub key: LayerKey,
    pub image_src: String,
    /// Between 0 (invisible) and 1 (opaque).
    pub opacity: f64,
    pub transform: Transform,
    pub meta: LayerMeta,
}

impl RenderableLayer {
    /// Build the render view of `node` at `opacity`.
    ///
    /// The transform is the node's own alignment transform, or the identity
    /// for nodes that carry none. `opacity` is clamped to `0.0..=1.0`; NaN
    /// becomes fully opaque.
    ///
    /// # Example
    ///
    /// ```
    /// # use plansheet::render::RenderableLayer;
    /// # use plansheet_core::{key::LayerKey, layer::{DrawingLayer, LayerBase, LayerNode}};
    /// let node = LayerNode::Drawing(DrawingLayer::new(LayerBase::new(
    ///     LayerKey::drawing("101"),
    ///     "101",
    ///     "Ground floor",
    ///     "/drawings/101.png",
    /// )));
    ///
    /// let layer = RenderableLayer::from_node(&node, 1.5);
    /// assert_eq!(layer.opacity, 1.0);
    /// assert!(layer.transform.is_identity());
    /// ```
    pub fn from_node(node: &LayerNode, opacity: f64) -> Self {
        let transform = node
            .image_transform()
            .map(|aligned| *aligned.transform())
            .unwrap_or_default();

        let revision = match node {
            LayerNode::Revision(layer) => Some(layer.revision().to_string()),
            LayerNode::Drawing(_) | LayerNode::Discipline(_) | LayerNode::Region(_) => None,
        };

        Self {
            key: node.key().clone(),
            image_src: node.image().to_string(),
            opacity: if opacity.is_nan() {
                1.0
            } else {
                opacity.clamp(0.0, 1.0)
            },
            transform,
            meta: LayerMeta {
                drawing_name: Some(node.drawing_name().to_string()),
                discipline: node.discipline().map(str::to_string),
                revision,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use plansheet_core::{
        geometry::{AlignmentTransform, Polygon},
        layer::{LayerBase, RevisionInfo, RevisionLayer, RevisionVariant},
    };

    use super::*;

    #[test]
    fn test_region_revision_uses_own_transform() {
        let transform = Transform::new(12.0, -3.0, 0.8, 0.1);
        let key = LayerKey::revision("101", "구조", Some("A"), "R2");
        let node = LayerNode::Revision(RevisionLayer::new(
            LayerBase::new(key.clone(), "101", "Ground floor", "/drawings/a2.png"),
            "구조",
            "R2",
            RevisionInfo::default(),
            RevisionVariant::Region {
                region: "A".to_string(),
                image_transform: AlignmentTransform::new(transform, Some("/drawings/101.png".into())),
                polygon: Some(Polygon::default()),
            },
        ));

        let layer = RenderableLayer::from_node(&node, 0.4);

        assert_eq!(layer.key, key);
        assert_eq!(layer.image_src, "/drawings/a2.png");
        assert_eq!(layer.opacity, 0.4);
        assert_eq!(layer.transform, transform);
        assert_eq!(
            layer.meta,
            LayerMeta {
                drawing_name: Some("Ground floor".to_string()),
                discipline: Some("구조".to_string()),
                revision: Some("R2".to_string()),
            }
        );
    }

    #[test]
    fn test_opacity_is_clamped() {
        let node = LayerNode::Revision(RevisionLayer::new(
            LayerBase::new(
                LayerKey::revision("101", "건축", None, "R1"),
                "101",
                "Ground floor",
                "/drawings/r1.png",
            ),
            "건축",
            "R1",
            RevisionInfo::default(),
            RevisionVariant::Simple,
        ));

        assert_eq!(RenderableLayer::from_node(&node, -0.5).opacity, 0.0);
        assert_eq!(RenderableLayer::from_node(&node, f64::NAN).opacity, 1.0);
        assert!(RenderableLayer::from_node(&node, 0.5).transform.is_identity());
    }

    #[test]
    fn test_serializes_camel_case() {
        let node = LayerNode::Revision(RevisionLayer::new(
            LayerBase::new(
                LayerKey::revision("101", "건축", None, "R1"),
                "101",
                "Ground floor",
                "/drawings/r1.png",
            ),
            "건축",
            "R1",
            RevisionInfo::default(),
            RevisionVariant::Simple,
        ));

        let value = serde_json::to_value(RenderableLayer::from_node(&node, 1.0)).unwrap();
        assert_eq!(value["imageSrc"], "/drawings/r1.png");
        assert_eq!(value["meta"]["drawingName"], "Ground floor");
        assert_eq!(value["transform"]["scale"], 1.0);
    }
}
