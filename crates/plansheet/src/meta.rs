//! The normalized layer graph and its queries.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use plansheet_core::{
    key::{LayerKey, LayerKind},
    layer::LayerNode,
};
use plansheet_schema::document::Drawing;

use crate::{PlansheetError, normalize::ROOT_PARENT};

/// Flattened, cross-referenced view of a metadata document.
///
/// Built once by [`normalize`](crate::normalize::normalize) and never
/// mutated afterwards. Every map iterates in key order, and every list value
/// is sorted, so two models built from the same document compare and
/// serialize identically.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMeta {
    drawings_by_id: BTreeMap<String, Drawing>,
    layers_by_key: BTreeMap<LayerKey, LayerNode>,
    children_by_parent: BTreeMap<String, Vec<String>>,
    reference_groups: BTreeMap<String, Vec<LayerKey>>,
}

/// One entry of a navigation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
    pub key: LayerKey,
    pub label: String,
}

impl NormalizedMeta {
    pub(crate) fn new(
        drawings_by_id: BTreeMap<String, Drawing>,
        layers_by_key: BTreeMap<LayerKey, LayerNode>,
        children_by_parent: BTreeMap<String, Vec<String>>,
        reference_groups: BTreeMap<String, Vec<LayerKey>>,
    ) -> Self {
        Self {
            drawings_by_id,
            layers_by_key,
            children_by_parent,
            reference_groups,
        }
    }

    /// Returns the validated drawings keyed by id.
    pub fn drawings_by_id(&self) -> &BTreeMap<String, Drawing> {
        &self.drawings_by_id
    }

    /// Returns every layer keyed by its [`LayerKey`].
    pub fn layers_by_key(&self) -> &BTreeMap<LayerKey, LayerNode> {
        &self.layers_by_key
    }

    /// Returns child drawing ids keyed by parent id.
    pub fn children_by_parent(&self) -> &BTreeMap<String, Vec<String>> {
        &self.children_by_parent
    }

    /// Returns layer keys keyed by the base image they are aligned to.
    pub fn reference_groups(&self) -> &BTreeMap<String, Vec<LayerKey>> {
        &self.reference_groups
    }

    /// Look up a drawing by id.
    pub fn drawing(&self, id: &str) -> Option<&Drawing> {
        self.drawings_by_id.get(id)
    }

    /// Look up a layer by its key.
    pub fn layer(&self, key: &str) -> Option<&LayerNode> {
        self.layers_by_key.get(key)
    }

    /// Look up a layer, checking the key format first.
    ///
    /// # Errors
    ///
    /// Returns `PlansheetError::Key` for a malformed key and
    /// `PlansheetError::UnknownLayer` if no node has it.
    pub fn require_layer(&self, key: &str) -> Result<&LayerNode, PlansheetError> {
        let key: LayerKey = key.parse()?;
        self.layer(key.as_str())
            .ok_or(PlansheetError::UnknownLayer(key))
    }

    /// Iterate over every layer in key order.
    pub fn layers(&self) -> impl Iterator<Item = &LayerNode> {
        self.layers_by_key.values()
    }

    /// Iterate over the layers of one kind in key order.
    pub fn layers_of_kind(&self, kind: LayerKind) -> impl Iterator<Item = &LayerNode> {
        self.layers().filter(move |node| node.kind() == kind)
    }

    /// Returns the sorted child drawing ids of `parent`.
    ///
    /// Pass [`ROOT_PARENT`] for top-level drawings, or use [`Self::root_drawings`].
    pub fn children_of(&self, parent: &str) -> &[String] {
        self.children_by_parent
            .get(parent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the sorted ids of drawings without a parent.
    pub fn root_drawings(&self) -> &[String] {
        self.children_of(ROOT_PARENT)
    }

    /// Returns the sorted keys of layers aligned to `image`.
    pub fn reference_group(&self, image: &str) -> &[LayerKey] {
        self.reference_groups
            .get(image)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Layers that can be overlaid on `base_key`.
    ///
    /// These are the layers aligned to the base layer's image, without the
    /// base layer itself. Empty if `base_key` is unknown.
    pub fn overlay_candidates(&self, base_key: &str) -> Vec<&LayerNode> {
        let Some(base) = self.layer(base_key) else {
            return Vec::new();
        };

        self.reference_group(base.image())
            .iter()
            .filter(|key| key.as_str() != base_key)
            .filter_map(|key| self.layer(key.as_str()))
            .collect()
    }

    /// Walk the parent chain of `drawing_id`, nearest parent first.
    ///
    /// Stops at a parent that is not in the document, and at the first id
    /// already visited, so a cyclic chain terminates.
    pub fn ancestors(&self, drawing_id: &str) -> Vec<&str> {
        let mut visited = HashSet::from([drawing_id]);
        let mut chain = Vec::new();

        let mut current = self.drawing(drawing_id);
        while let Some(parent) = current.and_then(|drawing| drawing.parent.as_deref()) {
            if !visited.insert(parent) {
                break;
            }
            let Some((id, drawing)) = self.drawings_by_id.get_key_value(parent) else {
                break;
            };
            chain.push(id.as_str());
            current = Some(drawing);
        }
        chain
    }

    /// Every layer as a labelled navigation entry.
    ///
    /// Revisions come first, then disciplines, regions and drawings; entries
    /// of the same kind are ordered by label.
    pub fn navigation_entries(&self) -> Vec<NavigationEntry> {
        let mut entries: Vec<(u8, NavigationEntry)> = self
            .layers()
            .map(|node| {
                let entry = NavigationEntry {
                    key: node.key().clone(),
                    label: node.label(),
                };
                (navigation_rank(node.kind()), entry)
            })
            .collect();

        entries.sort_by(|(rank_a, a), (rank_b, b)| {
            rank_a
                .cmp(rank_b)
                .then_with(|| a.label.cmp(&b.label))
                .then_with(|| a.key.cmp(&b.key))
        });
        entries.into_iter().map(|(_, entry)| entry).collect()
    }
}

fn navigation_rank(kind: LayerKind) -> u8 {
    match kind {
        LayerKind::Revision => 0,
        LayerKind::Discipline => 1,
        LayerKind::Region => 2,
        LayerKind::Drawing => 3,
    }
}
