//! Flattening a validated document into the layer graph.
//!
//! [`normalize`] walks every drawing, discipline, region and revision once
//! and emits one [`LayerNode`] per entry, keyed by its [`LayerKey`]. Two
//! side indexes are built in the same pass:
//!
//! - children by parent: drawing ids grouped under their parent id, with
//!   top-level drawings under [`ROOT_PARENT`];
//! - reference groups: layer keys grouped by the base image their alignment
//!   transform is `relativeTo`.
//!
//! Nodes that carry no transform of their own (the discipline's simple
//! revisions and its regions) join the group of the discipline transform.

use std::collections::{BTreeMap, btree_map::Entry};

use log::{debug, info, trace, warn};
use thiserror::Error;

use plansheet_core::{
    geometry::AlignmentTransform,
    key::LayerKey,
    layer::{
        DisciplineLayer, DrawingLayer, LayerBase, LayerNode, RegionLayer, RevisionInfo,
        RevisionLayer, RevisionVariant,
    },
};
use plansheet_schema::document::{Discipline, Document, Drawing, Region, Revision};

use crate::{config::MissingTransformPolicy, meta::NormalizedMeta};

/// Parent id under which drawings without a parent are listed.
pub const ROOT_PARENT: &str = "__root__";

/// Errors raised by [`normalize_with`].
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("region revision requires imageTransform: {}", format_keys(.keys))]
    MissingRegionTransform { keys: Vec<LayerKey> },
}

fn format_keys(keys: &[LayerKey]) -> String {
    keys.iter()
        .map(LayerKey::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the layer graph of a validated document.
///
/// Region revisions without an `imageTransform` are left out and logged.
pub fn normalize(document: &Document) -> NormalizedMeta {
    let (meta, skipped) = Normalizer::default().run(document);
    if !skipped.is_empty() {
        warn!(count = skipped.len(); "Region revisions without imageTransform were skipped");
    }
    meta
}

/// Build the layer graph, treating incomplete region revisions per `policy`.
///
/// # Errors
///
/// Returns [`NormalizeError::MissingRegionTransform`] when `policy` is
/// [`MissingTransformPolicy::Reject`] and a region revision has no
/// `imageTransform`.
pub fn normalize_with(
    document: &Document,
    policy: MissingTransformPolicy,
) -> Result<NormalizedMeta, NormalizeError> {
    match policy {
        MissingTransformPolicy::Skip => Ok(normalize(document)),
        MissingTransformPolicy::Reject => {
            let (meta, skipped) = Normalizer::default().run(document);
            if skipped.is_empty() {
                Ok(meta)
            } else {
                Err(NormalizeError::MissingRegionTransform { keys: skipped })
            }
        }
    }
}

/// Image candidates for a discipline node, in order of preference.
///
/// The discipline's own image, then the image of its first discipline-level
/// revision, then the drawing's image.
pub fn discipline_image_candidates<'a>(
    drawing: &'a Drawing,
    discipline: &'a Discipline,
) -> [Option<&'a str>; 3] {
    [
        discipline.image.as_deref(),
        discipline.revisions.first().map(|rev| rev.image.as_str()),
        Some(drawing.image.as_str()),
    ]
}

/// Pick the first non-empty candidate of [`discipline_image_candidates`].
///
/// Falls back to the drawing image even when that is empty.
pub fn resolve_discipline_image<'a>(drawing: &'a Drawing, discipline: &'a Discipline) -> &'a str {
    discipline_image_candidates(drawing, discipline)
        .into_iter()
        .flatten()
        .find(|image| !image.is_empty())
        .unwrap_or(drawing.image.as_str())
}

#[derive(Default)]
struct Normalizer {
    layers_by_key: BTreeMap<LayerKey, LayerNode>,
    children_by_parent: BTreeMap<String, Vec<String>>,
    reference_groups: BTreeMap<String, Vec<LayerKey>>,
    skipped: Vec<LayerKey>,
}

/// Per-drawing values shared by every node emitted under it.
struct DrawingScope<'a> {
    id: &'a str,
    name: &'a str,
}

impl<'a> DrawingScope<'a> {
    fn base(&self, key: LayerKey, image: &str) -> LayerBase {
        LayerBase::new(key, self.id, self.name, image)
    }
}

impl Normalizer {
    fn run(mut self, document: &Document) -> (NormalizedMeta, Vec<LayerKey>) {
        info!(drawings = document.drawings.len(); "Normalizing metadata");

        for (drawing_id, drawing) in &document.drawings {
            self.drawing(drawing_id, drawing);
        }

        for ids in self.children_by_parent.values_mut() {
            ids.sort();
        }
        for keys in self.reference_groups.values_mut() {
            keys.sort();
        }

        debug!(
            layers = self.layers_by_key.len(),
            reference_groups = self.reference_groups.len();
            "Layer graph built"
        );

        let drawings_by_id = document
            .drawings
            .iter()
            .map(|(id, drawing)| (id.clone(), drawing.clone()))
            .collect();
        let meta = NormalizedMeta::new(
            drawings_by_id,
            self.layers_by_key,
            self.children_by_parent,
            self.reference_groups,
        );
        trace!(meta:?; "Normalized metadata");

        (meta, self.skipped)
    }

    fn drawing(&mut self, drawing_id: &str, drawing: &Drawing) {
        let scope = DrawingScope {
            id: drawing_id,
            name: &drawing.name,
        };

        let key = LayerKey::drawing(drawing_id);
        self.insert(
            LayerNode::Drawing(DrawingLayer::new(scope.base(key, &drawing.image))),
            None,
        );

        let parent = drawing.parent.as_deref().unwrap_or(ROOT_PARENT);
        self.children_by_parent
            .entry(parent.to_string())
            .or_default()
            .push(drawing_id.to_string());

        for (name, discipline) in &drawing.disciplines {
            self.discipline(&scope, drawing, name, discipline);
        }
    }

    fn discipline(
        &mut self,
        scope: &DrawingScope<'_>,
        drawing: &Drawing,
        name: &str,
        discipline: &Discipline,
    ) {
        let image = resolve_discipline_image(drawing, discipline);
        let key = LayerKey::discipline(scope.id, name);
        // Nodes without a transform of their own align like their discipline.
        let inherited = discipline
            .image_transform
            .as_ref()
            .and_then(AlignmentTransform::relative_to);

        self.insert(
            LayerNode::Discipline(DisciplineLayer::new(
                scope.base(key, image),
                name,
                discipline.image_transform.clone(),
                discipline.polygon.clone(),
            )),
            inherited,
        );

        for revision in &discipline.revisions {
            self.discipline_revision(scope, name, revision, inherited);
        }

        for (region_name, region) in &discipline.regions {
            self.region(scope, name, image, region_name, region, inherited);
        }
    }

    fn discipline_revision(
        &mut self,
        scope: &DrawingScope<'_>,
        discipline: &str,
        revision: &Revision,
        inherited: Option<&str>,
    ) {
        let key = LayerKey::revision(scope.id, discipline, None, &revision.version);

        let (variant, relative_to) = match (&revision.image_transform, &revision.polygon) {
            (Some(image_transform), Some(polygon)) => (
                RevisionVariant::SelfContained {
                    image_transform: image_transform.clone(),
                    polygon: polygon.clone(),
                },
                image_transform.relative_to(),
            ),
            _ => (RevisionVariant::Simple, inherited),
        };

        self.insert(
            LayerNode::Revision(RevisionLayer::new(
                scope.base(key, &revision.image),
                discipline,
                &revision.version,
                revision_info(revision),
                variant,
            )),
            relative_to,
        );
    }

    fn region(
        &mut self,
        scope: &DrawingScope<'_>,
        discipline: &str,
        image: &str,
        name: &str,
        region: &Region,
        inherited: Option<&str>,
    ) {
        let key = LayerKey::region(scope.id, discipline, name);
        self.insert(
            LayerNode::Region(RegionLayer::new(
                scope.base(key, image),
                discipline,
                name,
                region.polygon.clone(),
            )),
            inherited,
        );

        for revision in &region.revisions {
            let key = LayerKey::revision(scope.id, discipline, Some(name), &revision.version);

            let Some(image_transform) = &revision.image_transform else {
                warn!(key = key.as_str(); "Skipping region revision without imageTransform");
                self.skipped.push(key);
                continue;
            };

            let polygon = revision.polygon.as_ref().or(region.polygon.as_ref()).cloned();
            self.insert(
                LayerNode::Revision(RevisionLayer::new(
                    scope.base(key, &revision.image),
                    discipline,
                    &revision.version,
                    revision_info(revision),
                    RevisionVariant::Region {
                        region: name.to_string(),
                        image_transform: image_transform.clone(),
                        polygon,
                    },
                )),
                image_transform.relative_to(),
            );
        }
    }

    /// Add `node` and join it to the group of `relative_to`.
    ///
    /// The first node for a key wins. Keys that do not decode are dropped.
    fn insert(&mut self, node: LayerNode, relative_to: Option<&str>) {
        if let Err(err) = node.key().decode() {
            warn!(key = node.key().as_str(); "Dropping layer with an undecodable key: {err}");
            return;
        }

        let key = match self.layers_by_key.entry(node.key().clone()) {
            Entry::Occupied(entry) => {
                warn!(key = entry.key().as_str(); "Duplicate layer key, keeping the first node");
                return;
            }
            Entry::Vacant(entry) => {
                let key = entry.key().clone();
                entry.insert(node);
                key
            }
        };
        self.group(relative_to, &key);
    }

    /// Add `key` to the reference group of `relative_to`, if declared.
    fn group(&mut self, relative_to: Option<&str>, key: &LayerKey) {
        if let Some(relative_to) = relative_to {
            self.reference_groups
                .entry(relative_to.to_string())
                .or_default()
                .push(key.clone());
        }
    }
}

fn revision_info(revision: &Revision) -> RevisionInfo {
    RevisionInfo {
        date: revision.date.clone(),
        description: revision.description.clone(),
        changes: revision.changes.clone(),
    }
}
