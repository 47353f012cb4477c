//! Flattened layer nodes.
//!
//! A layer is one addressable node of the drawing hierarchy: a drawing, a
//! discipline of a drawing, a region of a discipline, or a revision. Every
//! node carries its [`LayerKey`], the id and name of the drawing it belongs
//! to, and the image a viewer should display for it.
//!
//! Revisions come in three shapes, captured by [`RevisionVariant`]:
//!
//! - [`RevisionVariant::Simple`] - positioned by its discipline; carries no geometry.
//! - [`RevisionVariant::Region`] - scoped to a region; carries its own alignment
//!   transform and optionally a polygon (its own or the region's).
//! - [`RevisionVariant::SelfContained`] - carries both an alignment transform
//!   and a polygon of its own.

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{AlignmentTransform, Polygon},
    key::{LayerKey, LayerKind, LayerLocator},
};

/// Fields shared by every layer node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerBase {
    key: LayerKey,
    drawing_id: String,
    drawing_name: String,
    image: String,
}

impl LayerBase {
    /// Creates the shared part of a layer node.
    pub fn new(
        key: LayerKey,
        drawing_id: impl Into<String>,
        drawing_name: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            key,
            drawing_id: drawing_id.into(),
            drawing_name: drawing_name.into(),
            image: image.into(),
        }
    }
}

/// A whole drawing sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingLayer {
    #[serde(flatten)]
    base: LayerBase,
}

impl DrawingLayer {
    pub fn new(base: LayerBase) -> Self {
        Self { base }
    }
}

/// One discipline (e.g. architecture, structure) of a drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineLayer {
    #[serde(flatten)]
    base: LayerBase,
    discipline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_transform: Option<AlignmentTransform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    polygon: Option<Polygon>,
}

impl DisciplineLayer {
    pub fn new(
        base: LayerBase,
        discipline: impl Into<String>,
        image_transform: Option<AlignmentTransform>,
        polygon: Option<Polygon>,
    ) -> Self {
        Self {
            base,
            discipline: discipline.into(),
            image_transform,
            polygon,
        }
    }

    /// Returns the discipline name.
    pub fn discipline(&self) -> &str {
        &self.discipline
    }
}

/// A spatial subdivision of a discipline.
///
/// Displays its discipline's image; the polygon, if any, marks the covered area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionLayer {
    #[serde(flatten)]
    base: LayerBase,
    discipline: String,
    region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    polygon: Option<Polygon>,
}

impl RegionLayer {
    pub fn new(
        base: LayerBase,
        discipline: impl Into<String>,
        region: impl Into<String>,
        polygon: Option<Polygon>,
    ) -> Self {
        Self {
            base,
            discipline: discipline.into(),
            region: region.into(),
            polygon,
        }
    }

    /// Returns the discipline name.
    pub fn discipline(&self) -> &str {
        &self.discipline
    }

    /// Returns the region name.
    pub fn region(&self) -> &str {
        &self.region
    }
}

/// Revision sub-variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "camelCase")]
pub enum RevisionVariant {
    /// Positioned by the discipline it belongs to.
    Simple,
    /// Scoped to a region; the alignment transform is mandatory.
    #[serde(rename_all = "camelCase")]
    Region {
        region: String,
        image_transform: AlignmentTransform,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        polygon: Option<Polygon>,
    },
    /// Carries its own placement and outline.
    #[serde(rename_all = "camelCase")]
    SelfContained {
        image_transform: AlignmentTransform,
        polygon: Polygon,
    },
}

impl RevisionVariant {
    /// Returns the variant name as used in serialized output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Region { .. } => "region",
            Self::SelfContained { .. } => "selfContained",
        }
    }
}

/// Descriptive fields of a revision entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevisionInfo {
    pub date: String,
    pub description: String,
    pub changes: Vec<String>,
}

/// One revision of a discipline, optionally scoped to a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionLayer {
    #[serde(flatten)]
    base: LayerBase,
    discipline: String,
    revision: String,
    #[serde(flatten)]
    info: RevisionInfo,
    #[serde(flatten)]
    variant: RevisionVariant,
}

impl RevisionLayer {
    pub fn new(
        base: LayerBase,
        discipline: impl Into<String>,
        revision: impl Into<String>,
        info: RevisionInfo,
        variant: RevisionVariant,
    ) -> Self {
        Self {
            base,
            discipline: discipline.into(),
            revision: revision.into(),
            info,
            variant,
        }
    }

    /// Returns the discipline name.
    pub fn discipline(&self) -> &str {
        &self.discipline
    }

    /// Returns the revision version label.
    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Returns the revision's date, description and change list.
    pub fn info(&self) -> &RevisionInfo {
        &self.info
    }

    /// Returns the revision sub-variant.
    pub fn variant(&self) -> &RevisionVariant {
        &self.variant
    }

    /// Returns the region name for region-scoped revisions.
    pub fn region(&self) -> Option<&str> {
        match &self.variant {
            RevisionVariant::Region { region, .. } => Some(region),
            RevisionVariant::Simple | RevisionVariant::SelfContained { .. } => None,
        }
    }
}

/// A node of the flattened layer graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayerNode {
    Drawing(DrawingLayer),
    Discipline(DisciplineLayer),
    Region(RegionLayer),
    Revision(RevisionLayer),
}

impl LayerNode {
    fn base(&self) -> &LayerBase {
        match self {
            Self::Drawing(layer) => &layer.base,
            Self::Discipline(layer) => &layer.base,
            Self::Region(layer) => &layer.base,
            Self::Revision(layer) => &layer.base,
        }
    }

    /// Returns the node's key.
    pub fn key(&self) -> &LayerKey {
        &self.base().key
    }

    /// Returns the node's kind.
    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Drawing(_) => LayerKind::Drawing,
            Self::Discipline(_) => LayerKind::Discipline,
            Self::Region(_) => LayerKind::Region,
            Self::Revision(_) => LayerKind::Revision,
        }
    }

    /// Returns the id of the drawing this node belongs to.
    pub fn drawing_id(&self) -> &str {
        &self.base().drawing_id
    }

    /// Returns the name of the drawing this node belongs to.
    pub fn drawing_name(&self) -> &str {
        &self.base().drawing_name
    }

    /// Returns the image a viewer displays for this node.
    pub fn image(&self) -> &str {
        &self.base().image
    }

    /// Returns the discipline name, if the node is below a drawing.
    pub fn discipline(&self) -> Option<&str> {
        match self {
            Self::Drawing(_) => None,
            Self::Discipline(layer) => Some(&layer.discipline),
            Self::Region(layer) => Some(&layer.discipline),
            Self::Revision(layer) => Some(&layer.discipline),
        }
    }

    /// Returns the node's own alignment transform.
    ///
    /// Simple revisions and regions return `None`; they are positioned by
    /// their discipline.
    pub fn image_transform(&self) -> Option<&AlignmentTransform> {
        match self {
            Self::Drawing(_) | Self::Region(_) => None,
            Self::Discipline(layer) => layer.image_transform.as_ref(),
            Self::Revision(layer) => match &layer.variant {
                RevisionVariant::Simple => None,
                RevisionVariant::Region {
                    image_transform, ..
                }
                | RevisionVariant::SelfContained {
                    image_transform, ..
                } => Some(image_transform),
            },
        }
    }

    /// Returns the node's polygon, if any.
    pub fn polygon(&self) -> Option<&Polygon> {
        match self {
            Self::Drawing(_) => None,
            Self::Discipline(layer) => layer.polygon.as_ref(),
            Self::Region(layer) => layer.polygon.as_ref(),
            Self::Revision(layer) => match &layer.variant {
                RevisionVariant::Simple => None,
                RevisionVariant::Region { polygon, .. } => polygon.as_ref(),
                RevisionVariant::SelfContained { polygon, .. } => Some(polygon),
            },
        }
    }

    /// Rebuilds the structured locator from the node's fields.
    pub fn locator(&self) -> LayerLocator {
        let drawing_id = self.drawing_id().to_string();
        match self {
            Self::Drawing(_) => LayerLocator::Drawing { drawing_id },
            Self::Discipline(layer) => LayerLocator::Discipline {
                drawing_id,
                discipline: layer.discipline.clone(),
            },
            Self::Region(layer) => LayerLocator::Region {
                drawing_id,
                discipline: layer.discipline.clone(),
                region: layer.region.clone(),
            },
            Self::Revision(layer) => LayerLocator::Revision {
                drawing_id,
                discipline: layer.discipline.clone(),
                region: layer.region().map(str::to_string),
                revision: layer.revision.clone(),
            },
        }
    }

    /// Returns a human-readable label for navigation lists.
    pub fn label(&self) -> String {
        let name = self.drawing_name();
        match self {
            Self::Drawing(_) => format!("Drawing · {} · {name}", self.drawing_id()),
            Self::Discipline(layer) => format!("Discipline · {name} · {}", layer.discipline),
            Self::Region(layer) => format!(
                "Region · {name} · {} · {}",
                layer.discipline, layer.region
            ),
            Self::Revision(layer) => {
                let base = format!("{name} · {} · {}", layer.discipline, layer.revision);
                match &layer.variant {
                    RevisionVariant::Simple => format!("Revision · {base}"),
                    RevisionVariant::Region { region, .. } => {
                        format!("Revision (region) · {base} · {region}")
                    }
                    RevisionVariant::SelfContained { .. } => {
                        format!("Revision (self-contained) · {base}")
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Transform, Vertex};

    fn base(key: LayerKey) -> LayerBase {
        LayerBase::new(key, "101", "Ground floor", "/drawings/101.png")
    }

    fn square() -> Polygon {
        Polygon::new(
            vec![
                Vertex::new(0.0, 0.0),
                Vertex::new(1.0, 0.0),
                Vertex::new(1.0, 1.0),
                Vertex::new(0.0, 1.0),
            ],
            Transform::identity(),
        )
    }

    fn anchored() -> AlignmentTransform {
        AlignmentTransform::new(Transform::identity(), Some("/drawings/101.png".into()))
    }

    #[test]
    fn test_drawing_node_accessors() {
        let node = LayerNode::Drawing(DrawingLayer::new(base(LayerKey::drawing("101"))));
        assert_eq!(node.kind(), LayerKind::Drawing);
        assert_eq!(node.key().as_str(), "drawing:101");
        assert_eq!(node.drawing_name(), "Ground floor");
        assert_eq!(node.discipline(), None);
        assert!(node.image_transform().is_none());
        assert!(node.polygon().is_none());
        assert_eq!(node.label(), "Drawing · 101 · Ground floor");
    }

    #[test]
    fn test_region_revision_geometry() {
        let node = LayerNode::Revision(RevisionLayer::new(
            base(LayerKey::revision("101", "구조", Some("A"), "REV1")),
            "구조",
            "REV1",
            RevisionInfo::default(),
            RevisionVariant::Region {
                region: "A".into(),
                image_transform: anchored(),
                polygon: Some(square()),
            },
        ));
        assert_eq!(node.image_transform().and_then(|t| t.relative_to()), Some("/drawings/101.png"));
        assert_eq!(node.polygon().map(Polygon::len), Some(4));
        assert_eq!(node.label(), "Revision (region) · Ground floor · 구조 · REV1 · A");
    }

    #[test]
    fn test_simple_revision_has_no_geometry() {
        let node = LayerNode::Revision(RevisionLayer::new(
            base(LayerKey::revision("101", "건축", None, "REV2")),
            "건축",
            "REV2",
            RevisionInfo::default(),
            RevisionVariant::Simple,
        ));
        assert!(node.image_transform().is_none());
        assert!(node.polygon().is_none());
        assert_eq!(node.label(), "Revision · Ground floor · 건축 · REV2");
    }

    #[test]
    fn test_locator_matches_key() {
        let nodes = vec![
            LayerNode::Drawing(DrawingLayer::new(base(LayerKey::drawing("101")))),
            LayerNode::Discipline(DisciplineLayer::new(
                base(LayerKey::discipline("101", "건축")),
                "건축",
                None,
                None,
            )),
            LayerNode::Region(RegionLayer::new(
                base(LayerKey::region("101", "구조", "B")),
                "구조",
                "B",
                None,
            )),
            LayerNode::Revision(RevisionLayer::new(
                base(LayerKey::revision("101", "건축", None, "R1")),
                "건축",
                "R1",
                RevisionInfo::default(),
                RevisionVariant::SelfContained {
                    image_transform: anchored(),
                    polygon: square(),
                },
            )),
        ];

        for node in &nodes {
            assert_eq!(&node.locator().encode(), node.key());
            assert_eq!(node.key().decode().unwrap(), node.locator());
        }
    }

    #[test]
    fn test_serialize_tags() {
        let node = LayerNode::Revision(RevisionLayer::new(
            base(LayerKey::revision("101", "건축", None, "R1")),
            "건축",
            "R1",
            RevisionInfo {
                date: "2024-01-01".into(),
                description: "first issue".into(),
                changes: vec!["initial".into()],
            },
            RevisionVariant::SelfContained {
                image_transform: anchored(),
                polygon: square(),
            },
        ));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"], "revision");
        assert_eq!(json["variant"], "selfContained");
        assert_eq!(json["key"], "revision:101:건축::R1");
        assert_eq!(json["drawingId"], "101");
        assert_eq!(json["imageTransform"]["relativeTo"], "/drawings/101.png");
        assert_eq!(json["changes"][0], "initial");
    }
}
