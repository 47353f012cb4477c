//! Shape decoding and coercion of untrusted metadata.
//!
//! The [`Decoder`] walks a [`serde_json::Value`] against the metadata schema
//! and builds the typed [`Document`]. It does not stop at the first mismatch:
//! every field is visited and every problem is emitted to the collector with
//! the path of the offending value. A value is only produced when its whole
//! subtree decoded cleanly.
//!
//! Coercion happens on the way:
//! - missing transform fields take their identity defaults;
//! - image paths and `relativeTo` references are rooted under [`ASSET_PREFIX`];
//! - an empty `relativeTo` is treated as absent;
//! - a discipline without a `revisions` list gets an empty one.
//!
//! Optional fields accept both a missing member and an explicit `null`.

use indexmap::IndexMap;
use log::trace;
use serde_json::{Map, Value};

use plansheet_core::geometry::{AlignmentTransform, Polygon, Transform, Vertex};

use crate::{
    ASSET_PREFIX,
    document::{
        Discipline, DisciplineName, Document, Drawing, Position, Project, Region, Revision,
    },
    error::{Diagnostic, DiagnosticCollector, DocumentPath, ErrorCode},
};

type Object = Map<String, Value>;

/// Roots a file name under [`ASSET_PREFIX`] unless it already is.
///
/// # Example
///
/// ```
/// # use plansheet_schema::canonicalize_asset_path;
/// assert_eq!(canonicalize_asset_path("a.png"), "/drawings/a.png");
/// assert_eq!(canonicalize_asset_path("/drawings/a.png"), "/drawings/a.png");
/// ```
pub fn canonicalize_asset_path(file: &str) -> String {
    if file.starts_with(ASSET_PREFIX) {
        file.to_string()
    } else {
        format!("{ASSET_PREFIX}{file}")
    }
}

/// Returns the JSON type name used in diagnostics.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Schema walker emitting shape diagnostics.
pub(crate) struct Decoder<'c> {
    collector: &'c mut DiagnosticCollector,
}

impl<'c> Decoder<'c> {
    pub fn new(collector: &'c mut DiagnosticCollector) -> Self {
        Self { collector }
    }

    /// Decode a whole document.
    pub fn document(&mut self, value: &Value) -> Option<Document> {
        let root = DocumentPath::root();
        let obj = self.object(value, &root)?;

        let project = self
            .required(obj, "project", &root)
            .and_then(|v| self.project(v, &root.key("project")));
        let disciplines = self
            .required(obj, "disciplines", &root)
            .and_then(|v| self.discipline_names(v, &root.key("disciplines")));
        let drawings = self.required(obj, "drawings", &root).and_then(|v| {
            self.map(v, &root.key("drawings"), |decoder, v, path| {
                decoder.drawing(v, path)
            })
        });

        Some(Document {
            project: project?,
            disciplines: disciplines?,
            drawings: drawings?,
        })
    }

    fn project(&mut self, value: &Value, path: &DocumentPath) -> Option<Project> {
        let obj = self.object(value, path)?;
        let name = self.required_string(obj, "name", path);
        let unit = self.required_string(obj, "unit", path);
        Some(Project {
            name: name?,
            unit: unit?,
        })
    }

    fn discipline_names(&mut self, value: &Value, path: &DocumentPath) -> Option<Vec<DisciplineName>> {
        self.array(value, path, |decoder, v, path| {
            let obj = decoder.object(v, path)?;
            let name = decoder.required_string(obj, "name", path)?;
            Some(DisciplineName { name })
        })
    }

    fn drawing(&mut self, value: &Value, path: &DocumentPath) -> Option<Drawing> {
        let obj = self.object(value, path)?;

        let id = self.required_string(obj, "id", path);
        let name = self.required_string(obj, "name", path);
        let image = self.required_string(obj, "image", path).map(|f| canonicalize_asset_path(&f));
        let parent = self.required(obj, "parent", path).and_then(|v| match v {
            Value::Null => Some(None),
            v => self.string(v, &path.key("parent")).map(Some),
        });
        let position = self.required(obj, "position", path).and_then(|v| match v {
            Value::Null => Some(None),
            v => self.position(v, &path.key("position")).map(Some),
        });
        let disciplines = match self.optional(obj, "disciplines") {
            Some(v) => self.map(v, &path.key("disciplines"), |decoder, v, path| {
                decoder.discipline(v, path)
            }),
            None => Some(IndexMap::new()),
        };

        Some(Drawing {
            id: id?,
            name: name?,
            image: image?,
            parent: parent?,
            position: position?,
            disciplines: disciplines?,
        })
    }

    fn position(&mut self, value: &Value, path: &DocumentPath) -> Option<Position> {
        let obj = self.object(value, path)?;
        let vertices = self
            .required(obj, "vertices", path)
            .and_then(|v| self.vertices(v, &path.key("vertices")));
        let image_transform = self
            .required(obj, "imageTransform", path)
            .and_then(|v| self.transform(v, &path.key("imageTransform")));
        Some(Position {
            vertices: vertices?,
            image_transform: image_transform?,
        })
    }

    fn discipline(&mut self, value: &Value, path: &DocumentPath) -> Option<Discipline> {
        let obj = self.object(value, path)?;

        let image = self.optional_string(obj, "image", path).map(|image| image.map(|f| canonicalize_asset_path(&f)));
        let image_transform = self.optional_alignment(obj, path);
        let polygon = self.optional_polygon(obj, path);
        let regions = match self.optional(obj, "regions") {
            Some(v) => self.map(v, &path.key("regions"), |decoder, v, path| {
                decoder.region(v, path)
            }),
            None => Some(IndexMap::new()),
        };
        let revisions = match self.optional(obj, "revisions") {
            Some(v) => self.revisions(v, &path.key("revisions")),
            None => Some(Vec::new()),
        };

        Some(Discipline {
            image: image?,
            image_transform: image_transform?,
            polygon: polygon?,
            regions: regions?,
            revisions: revisions?,
        })
    }

    fn region(&mut self, value: &Value, path: &DocumentPath) -> Option<Region> {
        let obj = self.object(value, path)?;

        let polygon = self.optional_polygon(obj, path);
        let revisions = self.required(obj, "revisions", path).and_then(|v| {
            let revisions_path = path.key("revisions");
            let revisions = self.revisions(v, &revisions_path)?;
            if revisions.is_empty() {
                self.collector.emit(
                    Diagnostic::error("region must list at least one revision")
                        .with_code(ErrorCode::E103)
                        .with_path(revisions_path)
                        .with_help("remove the region or add its first revision"),
                );
                return None;
            }
            Some(revisions)
        });

        Some(Region {
            polygon: polygon?,
            revisions: revisions?,
        })
    }

    fn revisions(&mut self, value: &Value, path: &DocumentPath) -> Option<Vec<Revision>> {
        self.array(value, path, |decoder, v, path| decoder.revision(v, path))
    }

    fn revision(&mut self, value: &Value, path: &DocumentPath) -> Option<Revision> {
        let obj = self.object(value, path)?;

        let version = self.required_string(obj, "version", path);
        let image = self.required_string(obj, "image", path).map(|f| canonicalize_asset_path(&f));
        let date = self.required_string(obj, "date", path);
        let description = self.required_string(obj, "description", path);
        let changes = self.required(obj, "changes", path).and_then(|v| {
            self.array(v, &path.key("changes"), |decoder, v, path| decoder.string(v, path))
        });
        let image_transform = self.optional_alignment(obj, path);
        let polygon = self.optional_polygon(obj, path);

        Some(Revision {
            version: version?,
            image: image?,
            date: date?,
            description: description?,
            changes: changes?,
            image_transform: image_transform?,
            polygon: polygon?,
        })
    }

    /// Decode an optional `imageTransform` member.
    fn optional_alignment(&mut self, obj: &Object, path: &DocumentPath) -> Option<Option<AlignmentTransform>> {
        let Some(value) = self.optional(obj, "imageTransform") else {
            return Some(None);
        };
        let path = path.key("imageTransform");
        let obj = self.object(value, &path)?;
        let transform = self.transform_fields(obj, &path);
        let relative_to = self
            .optional_string(obj, "relativeTo", &path)?
            .filter(|rel| !rel.is_empty())
            .map(|rel| canonicalize_asset_path(&rel));
        Some(Some(AlignmentTransform::new(transform?, relative_to)))
    }

    /// Decode an optional `polygon` member.
    fn optional_polygon(&mut self, obj: &Object, path: &DocumentPath) -> Option<Option<Polygon>> {
        match self.optional(obj, "polygon") {
            Some(value) => self.polygon(value, &path.key("polygon")).map(Some),
            None => Some(None),
        }
    }

    fn polygon(&mut self, value: &Value, path: &DocumentPath) -> Option<Polygon> {
        let obj = self.object(value, path)?;
        let vertices = self
            .required(obj, "vertices", path)
            .and_then(|v| self.vertices(v, &path.key("vertices")));
        let transform = self
            .required(obj, "polygonTransform", path)
            .and_then(|v| self.transform(v, &path.key("polygonTransform")));
        Some(Polygon::new(vertices?, transform?))
    }

    fn vertices(&mut self, value: &Value, path: &DocumentPath) -> Option<Vec<Vertex>> {
        self.array(value, path, |decoder, v, path| decoder.vertex(v, path))
    }

    fn vertex(&mut self, value: &Value, path: &DocumentPath) -> Option<Vertex> {
        match value.as_array().map(Vec::as_slice) {
            Some([x, y]) => {
                let x = self.number(x, &path.index(0));
                let y = self.number(y, &path.index(1));
                Some(Vertex::new(x?, y?))
            }
            _ => {
                self.collector.emit(
                    Diagnostic::error(format!(
                        "expected [x, y] vertex, found {}",
                        type_name(value)
                    ))
                    .with_code(ErrorCode::E102)
                    .with_path(path.clone())
                    .with_help("vertices are two-element arrays of numbers"),
                );
                None
            }
        }
    }

    /// Decode a transform, filling identity defaults for missing fields.
    fn transform(&mut self, value: &Value, path: &DocumentPath) -> Option<Transform> {
        let obj = self.object(value, path)?;
        self.transform_fields(obj, path)
    }

    fn transform_fields(&mut self, obj: &Object, path: &DocumentPath) -> Option<Transform> {
        let identity = Transform::identity();
        let x = self.number_or(obj, "x", identity.x(), path);
        let y = self.number_or(obj, "y", identity.y(), path);
        let scale = self.number_or(obj, "scale", identity.scale(), path);
        let rotation = self.number_or(obj, "rotation", identity.rotation(), path);
        Some(Transform::new(x?, y?, scale?, rotation?))
    }

    // =========================================================================
    // Primitive helpers
    // =========================================================================

    fn object<'v>(&mut self, value: &'v Value, path: &DocumentPath) -> Option<&'v Object> {
        match value {
            Value::Object(obj) => Some(obj),
            other => {
                self.invalid_type("object", other, path);
                None
            }
        }
    }

    fn required<'v>(&mut self, obj: &'v Object, field: &str, path: &DocumentPath) -> Option<&'v Value> {
        let value = obj.get(field);
        if value.is_none() {
            self.collector.emit(
                Diagnostic::error(format!("missing required field `{field}`"))
                    .with_code(ErrorCode::E101)
                    .with_path(path.key(field)),
            );
        }
        value
    }

    fn optional<'v>(&self, obj: &'v Object, field: &str) -> Option<&'v Value> {
        obj.get(field).filter(|v| !v.is_null())
    }

    fn required_string(&mut self, obj: &Object, field: &str, path: &DocumentPath) -> Option<String> {
        let value = self.required(obj, field, path)?;
        self.string(value, &path.key(field))
    }

    fn optional_string(&mut self, obj: &Object, field: &str, path: &DocumentPath) -> Option<Option<String>> {
        match self.optional(obj, field) {
            Some(value) => self.string(value, &path.key(field)).map(Some),
            None => Some(None),
        }
    }

    fn number_or(&mut self, obj: &Object, field: &str, default: f64, path: &DocumentPath) -> Option<f64> {
        match self.optional(obj, field) {
            Some(value) => self.number(value, &path.key(field)),
            None => Some(default),
        }
    }

    fn string(&mut self, value: &Value, path: &DocumentPath) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                self.invalid_type("string", other, path);
                None
            }
        }
    }

    fn number(&mut self, value: &Value, path: &DocumentPath) -> Option<f64> {
        match value.as_f64() {
            Some(n) => Some(n),
            None => {
                self.invalid_type("number", value, path);
                None
            }
        }
    }

    /// Decode every element of an array; `None` if any element failed.
    fn array<T>(
        &mut self,
        value: &Value,
        path: &DocumentPath,
        mut element: impl FnMut(&mut Self, &Value, &DocumentPath) -> Option<T>,
    ) -> Option<Vec<T>> {
        let Value::Array(items) = value else {
            self.invalid_type("array", value, path);
            return None;
        };

        let mut out = Vec::with_capacity(items.len());
        let mut failed = false;
        for (idx, item) in items.iter().enumerate() {
            match element(self, item, &path.index(idx)) {
                Some(decoded) => out.push(decoded),
                None => failed = true,
            }
        }
        (!failed).then_some(out)
    }

    /// Decode every member of an object used as a map; `None` if any member failed.
    fn map<T>(
        &mut self,
        value: &Value,
        path: &DocumentPath,
        mut member: impl FnMut(&mut Self, &Value, &DocumentPath) -> Option<T>,
    ) -> Option<IndexMap<String, T>> {
        let obj = self.object(value, path)?;

        let mut out = IndexMap::with_capacity(obj.len());
        let mut failed = false;
        for (key, item) in obj {
            match member(self, item, &path.key(key.as_str())) {
                Some(decoded) => {
                    out.insert(key.clone(), decoded);
                }
                None => failed = true,
            }
        }
        (!failed).then_some(out)
    }

    fn invalid_type(&mut self, expected: &str, found: &Value, path: &DocumentPath) {
        trace!(path = path.to_string(), expected; "Shape mismatch");
        self.collector.emit(
            Diagnostic::error(format!("expected {expected}, found {}", type_name(found)))
                .with_code(ErrorCode::E100)
                .with_path(path.clone()),
        );
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn decode(value: Value) -> (Option<Document>, Vec<Diagnostic>) {
        let mut collector = DiagnosticCollector::new();
        let document = Decoder::new(&mut collector).document(&value);
        let diagnostics = match collector.finish() {
            Ok(warnings) => warnings,
            Err(err) => err.diagnostics().to_vec(),
        };
        (document, diagnostics)
    }

    fn minimal() -> Value {
        json!({
            "project": { "name": "Tower", "unit": "mm" },
            "disciplines": [{ "name": "건축" }],
            "drawings": {
                "101": {
                    "id": "101",
                    "name": "Ground floor",
                    "image": "101.png",
                    "parent": null,
                    "position": null
                }
            }
        })
    }

    #[test]
    fn test_minimal_document_decodes() {
        let (document, diagnostics) = decode(minimal());
        let document = document.expect("minimal document should decode");

        assert!(diagnostics.is_empty());
        assert_eq!(document.project.name, "Tower");
        assert_eq!(document.drawings["101"].image, "/drawings/101.png");
        assert!(document.drawings["101"].disciplines.is_empty());
    }

    #[test]
    fn test_canonicalize_asset_path() {
        assert_eq!(canonicalize_asset_path("x.png"), "/drawings/x.png");
        assert_eq!(canonicalize_asset_path("/drawings/x.png"), "/drawings/x.png");
        assert_eq!(canonicalize_asset_path("sub/x.png"), "/drawings/sub/x.png");
    }

    #[test]
    fn test_transform_defaults_to_identity() {
        let mut value = minimal();
        value["drawings"]["101"]["position"] = json!({
            "vertices": [[0, 0], [10, 0], [10, 5]],
            "imageTransform": { "x": 4 }
        });

        let (document, _) = decode(value);
        let position = document.unwrap().drawings["101"].position.clone().unwrap();

        assert_eq!(position.vertices.len(), 3);
        assert_eq!(position.image_transform, Transform::new(4.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn test_relative_to_is_canonicalized_and_empty_dropped() {
        let mut value = minimal();
        value["drawings"]["101"]["disciplines"] = json!({
            "건축": {
                "imageTransform": { "relativeTo": "101.png" },
                "revisions": [{
                    "version": "R1", "image": "r1.png", "date": "", "description": "",
                    "changes": [], "imageTransform": { "relativeTo": "" }
                }]
            }
        });

        let (document, diagnostics) = decode(value);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let document = document.unwrap();
        let discipline = &document.drawings["101"].disciplines["건축"];

        assert_eq!(
            discipline.image_transform.as_ref().unwrap().relative_to(),
            Some("/drawings/101.png")
        );
        assert_eq!(
            discipline.revisions[0].image_transform.as_ref().unwrap().relative_to(),
            None
        );
    }

    #[test]
    fn test_missing_revisions_default_to_empty() {
        let mut value = minimal();
        value["drawings"]["101"]["disciplines"] = json!({ "건축": {} });

        let (document, _) = decode(value);
        let document = document.unwrap();
        assert!(document.drawings["101"].disciplines["건축"].revisions.is_empty());
    }

    #[test]
    fn test_collects_every_shape_error() {
        let value = json!({
            "project": { "name": 3 },
            "disciplines": "none",
            "drawings": {}
        });

        let (document, diagnostics) = decode(value);
        assert!(document.is_none());

        let paths: Vec<String> = diagnostics.iter().map(|d| d.path().to_string()).collect();
        assert_eq!(paths, vec!["project.name", "project.unit", "disciplines"]);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E100));
        assert_eq!(diagnostics[1].code(), Some(ErrorCode::E101));
    }

    #[test]
    fn test_parent_must_be_string_or_null() {
        let mut value = minimal();
        value["drawings"]["101"]["parent"] = json!(7);

        let (document, diagnostics) = decode(value);
        assert!(document.is_none());
        assert_eq!(diagnostics[0].path().to_string(), "drawings.101.parent");
        assert_eq!(diagnostics[0].message(), "expected string, found number");
    }

    #[test]
    fn test_invalid_vertex() {
        let mut value = minimal();
        value["drawings"]["101"]["position"] = json!({
            "vertices": [[0, 0], [1]],
            "imageTransform": {}
        });

        let (_, diagnostics) = decode(value);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E102));
        assert_eq!(diagnostics[0].path().to_string(), "drawings.101.position.vertices.1");
    }

    #[test]
    fn test_region_requires_a_revision() {
        let mut value = minimal();
        value["drawings"]["101"]["disciplines"] = json!({
            "건축": { "regions": { "A": { "revisions": [] } } }
        });

        let (document, diagnostics) = decode(value);
        assert!(document.is_none());
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E103));
        assert_eq!(
            diagnostics[0].path().to_string(),
            "drawings.101.disciplines.건축.regions.A.revisions"
        );
    }

    #[test]
    fn test_root_must_be_object() {
        let (document, diagnostics) = decode(json!([1, 2]));
        assert!(document.is_none());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].path().is_empty());
        assert_eq!(diagnostics[0].message(), "expected object, found array");
    }

    proptest::proptest! {
        #[test]
        fn canonicalize_is_idempotent(file in "[a-z0-9_/.-]{0,16}") {
            let once = canonicalize_asset_path(&file);
            proptest::prop_assert!(once.starts_with(ASSET_PREFIX));
            proptest::prop_assert_eq!(canonicalize_asset_path(&once), once.clone());
        }
    }
}
