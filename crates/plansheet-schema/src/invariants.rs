//! Invariant checks over a coerced [`Document`].
//!
//! These checks need typed data, so they only run once shape decoding has
//! succeeded. All of them run to completion; nothing short-circuits.
//!
//! Two passes are made over the drawings. The first checks identity and
//! referential integrity and gathers every image path in the document. The
//! second checks alignment transforms against the gathered images, which
//! needs the complete set.

use std::collections::HashSet;

use log::debug;

use plansheet_core::{geometry::AlignmentTransform, key::check_segment};

use crate::{
    document::{Discipline, Document, Revision},
    error::{Diagnostic, DiagnosticCollector, DocumentPath, ErrorCode},
};

/// Run every invariant check on `document`, emitting into `collector`.
pub(crate) fn check_invariants(document: &Document, collector: &mut DiagnosticCollector) {
    let mut checker = InvariantChecker {
        document,
        collector,
        known_images: HashSet::new(),
    };
    checker.check_integrity();
    debug!(known_images = checker.known_images.len(); "Collected known images");
    checker.check_alignment();
}

struct InvariantChecker<'a> {
    document: &'a Document,
    collector: &'a mut DiagnosticCollector,
    known_images: HashSet<&'a str>,
}

impl<'a> InvariantChecker<'a> {
    fn check_integrity(&mut self) {
        let document = self.document;
        let drawings_path = DocumentPath::root().key("drawings");

        for (key, drawing) in &document.drawings {
            let path = drawings_path.key(key.as_str());
            self.known_images.insert(&drawing.image);

            if *key != drawing.id {
                self.collector.emit(
                    Diagnostic::coded(ErrorCode::E200, "drawings key must equal drawing.id")
                        .with_path(path.key("id"))
                        .with_help(format!("rename the entry or set `id` to \"{key}\"")),
                );
                // Nodes are keyed by the map key, so it must be key-safe too.
                self.check_identifier(key, path.clone());
            }
            self.check_identifier(&drawing.id, path.key("id"));

            let dangling = drawing
                .parent
                .as_ref()
                .filter(|parent| !document.drawings.contains_key(parent.as_str()));
            if let Some(parent) = dangling {
                self.collector.emit(
                    Diagnostic::coded(ErrorCode::E201, format!("parent does not exist: {parent}"))
                        .with_path(path.key("parent"))
                        .with_help("reference an existing drawing id or use null"),
                );
            }

            let disciplines_path = path.key("disciplines");
            for (name, discipline) in &drawing.disciplines {
                let path = disciplines_path.key(name.as_str());

                if !document.declares_discipline(name) {
                    self.collector.emit(
                        Diagnostic::coded(ErrorCode::E202, "unknown discipline key")
                            .with_path(path.clone())
                            .with_help("add the discipline to the top-level `disciplines` list"),
                    );
                }
                self.check_identifier(name, path.clone());
                self.check_discipline(discipline, &path);
            }
        }
    }

    fn check_discipline(&mut self, discipline: &'a Discipline, path: &DocumentPath) {
        if let Some(image) = &discipline.image {
            self.known_images.insert(image);
        }

        self.check_revisions(&discipline.revisions, &path.key("revisions"));

        let regions_path = path.key("regions");
        for (name, region) in &discipline.regions {
            let path = regions_path.key(name.as_str());
            self.check_identifier(name, path.clone());
            self.check_revisions(&region.revisions, &path.key("revisions"));
        }
    }

    /// Gather revision images and check versions within one scope.
    fn check_revisions(&mut self, revisions: &'a [Revision], path: &DocumentPath) {
        let mut seen = HashSet::new();
        for (idx, revision) in revisions.iter().enumerate() {
            self.known_images.insert(&revision.image);

            let version_path = path.index(idx).key("version");
            if !seen.insert(revision.version.as_str()) {
                self.collector.emit(
                    Diagnostic::coded(
                        ErrorCode::E205,
                        format!("duplicate revision version: {}", revision.version),
                    )
                        .with_path(version_path.clone())
                        .with_help("versions must be unique within a discipline or region"),
                );
            }
            self.check_identifier(&revision.version, version_path);
        }
    }

    fn check_identifier(&mut self, value: &str, path: DocumentPath) {
        if let Err(err) = check_segment(value) {
            self.collector.emit(
                Diagnostic::coded(ErrorCode::E204, err.to_string()).with_path(path),
            );
        }
    }

    fn check_alignment(&mut self) {
        let document = self.document;
        let drawings_path = DocumentPath::root().key("drawings");

        for (key, drawing) in &document.drawings {
            let disciplines_path = drawings_path.key(key.as_str()).key("disciplines");

            for (name, discipline) in &drawing.disciplines {
                let path = disciplines_path.key(name.as_str());

                self.check_relative_to(
                    discipline.image_transform.as_ref(),
                    &path.key("imageTransform"),
                );

                let revisions_path = path.key("revisions");
                for (idx, revision) in discipline.revisions.iter().enumerate() {
                    self.check_relative_to(
                        revision.image_transform.as_ref(),
                        &revisions_path.index(idx).key("imageTransform"),
                    );
                }

                let regions_path = path.key("regions");
                for (region_name, region) in &discipline.regions {
                    let revisions_path = regions_path.key(region_name.as_str()).key("revisions");
                    for (idx, revision) in region.revisions.iter().enumerate() {
                        let transform_path = revisions_path.index(idx).key("imageTransform");
                        if revision.image_transform.is_none() {
                            self.collector.emit(
                                Diagnostic::coded(ErrorCode::E203, "region revision requires imageTransform")
                                    .with_path(transform_path.clone())
                                    .with_help("give the revision an `imageTransform`"),
                            );
                        }
                        self.check_relative_to(revision.image_transform.as_ref(), &transform_path);
                    }
                }
            }
        }
    }

    fn check_relative_to(&mut self, transform: Option<&AlignmentTransform>, path: &DocumentPath) {
        let Some(rel) = transform.and_then(AlignmentTransform::relative_to) else {
            return;
        };
        if self.known_images.contains(rel) {
            return;
        }

        let path = path.key("relativeTo");
        self.collector.emit(
            Diagnostic::coded(
                ErrorCode::W300,
                format!("relativeTo not found among known images: {rel} at {path}"),
            )
            .with_path(path),
        );
    }
}

/// Count of revisions across every scope of a document.
pub(crate) fn revision_count(document: &Document) -> usize {
    document
        .drawings
        .values()
        .flat_map(|drawing| drawing.disciplines.values())
        .map(|discipline| {
            discipline.revisions.len()
                + discipline
                    .regions
                    .values()
                    .map(|region| region.revisions.len())
                    .sum::<usize>()
        })
        .sum()
}
