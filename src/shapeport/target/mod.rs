//! # Target Document Model
//!
//! Serde model of the target platform's file schema. A file holds an ordered page list,
//! an index of pages by id, and document-wide libraries (colors, typographies,
//! components, media). Each page owns a flat object table: containers reference their
//! children by id through `shapes`, children point back through `parent-id`, and every
//! shape records the closest enclosing frame in `frame-id`.
//!
//! Every page has a root frame with the nil id whose `parent-id` and `frame-id` are itself.
//!
//! The object table keeps insertion order. The converter inserts parents before children,
//! and the differencing engine relies on that order when it emits operations.

use crate::error::{ConvertError, Result};
use crate::geometry::{Rect, ShapeGeometry};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use uuid::Uuid;

pub mod shape;
pub mod text;

pub use shape::{
    Blur, BoolAttrs, CircleAttrs, Fill, FrameAttrs, Gradient, GradientStop, GroupAttrs, ImageRef,
    LayoutGap, LayoutPadding, PathAttrs, RectAttrs, Shadow, ShadowColor, Shape, ShapeBase,
    ShapeKind, Stroke, TextAttrs,
};
pub use text::{Paragraph, TextContent, TextLeaf, TextStyleAttrs};

/// Id of every page's root frame.
pub const ROOT_FRAME_ID: Uuid = Uuid::nil();

/// Smallest width/height the target platform accepts.
pub const MIN_SIZE: f64 = 0.01;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectTable {
    shapes: Vec<Shape>,
    index: HashMap<Uuid, usize>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding only `root`.
    pub fn with_root(root: Shape) -> Self {
        Self {
            index: HashMap::from([(root.id(), 0)]),
            shapes: vec![root],
        }
    }

    pub fn insert(&mut self, shape: Shape) -> Result<()> {
        let id = shape.id();
        if self.index.contains_key(&id) {
            return Err(ConvertError::DuplicateEntity {
                kind: "shape",
                id: id.to_string(),
            });
        }
        self.index.insert(id, self.shapes.len());
        self.shapes.push(shape);
        Ok(())
    }

    pub fn get(&self, id: &Uuid) -> Option<&Shape> {
        self.index.get(id).map(|&i| &self.shapes[i])
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut Shape> {
        match self.index.get(id) {
            Some(&i) => self.shapes.get_mut(i),
            None => None,
        }
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn ids(&self) -> impl DoubleEndedIterator<Item = Uuid> + '_ {
        self.shapes.iter().map(Shape::id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Serialize for ObjectTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.shapes.len()))?;
        for shape in &self.shapes {
            map.serialize_entry(&shape.id(), shape)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ObjectTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = ObjectTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of object id to shape")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<ObjectTable, A::Error> {
                let mut table = ObjectTable::new();
                while let Some((_, shape)) = access.next_entry::<Uuid, Shape>()? {
                    table.insert(shape).map_err(serde::de::Error::custom)?;
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Page {
    pub id: Uuid,
    pub name: String,
    pub objects: ObjectTable,
}

impl Page {
    /// The page the target platform creates on add-page: a white root frame and nothing else.
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            objects: ObjectTable::with_root(root_frame(vec![Fill::solid("#FFFFFF", 1.0)])),
        }
    }

    pub fn root(&self) -> Option<&Shape> {
        self.objects.get(&ROOT_FRAME_ID)
    }
}

/// A page's self-referential root frame.
pub fn root_frame(fills: Vec<Fill>) -> Shape {
    let geometry = ShapeGeometry::from_rect(Rect::new(0.0, 0.0, MIN_SIZE, MIN_SIZE));
    let mut base = ShapeBase::new("Root Frame", &geometry);
    base.id = ROOT_FRAME_ID;
    base.parent_id = ROOT_FRAME_ID;
    base.frame_id = ROOT_FRAME_ID;
    base.fills = fills;
    Shape::new(base, ShapeKind::Frame(FrameAttrs::default()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LibraryColor {
    pub id: Uuid,
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Typography {
    pub id: Uuid,
    pub name: String,
    pub path: String,
    pub font_id: String,
    pub font_family: String,
    pub font_variant_id: String,
    pub font_size: String,
    pub font_weight: String,
    pub font_style: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    pub letter_spacing: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Component {
    pub id: Uuid,
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_instance_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_instance_page: Option<Uuid>,
}

/// An image the external uploader must fetch from the source and push to the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MediaEntry {
    pub id: Uuid,
    pub source_ref: String,
    pub width: f64,
    pub height: f64,
    pub mtype: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FileData {
    #[serde(default)]
    pub pages: Vec<Uuid>,
    #[serde(default)]
    pub pages_index: BTreeMap<Uuid, Page>,
    #[serde(default)]
    pub colors: BTreeMap<Uuid, LibraryColor>,
    #[serde(default)]
    pub typographies: BTreeMap<Uuid, Typography>,
    #[serde(default)]
    pub components: BTreeMap<Uuid, Component>,
    #[serde(default)]
    pub media: BTreeMap<Uuid, MediaEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetDocument {
    pub id: Uuid,
    pub name: String,
    pub data: FileData,
}

impl TargetDocument {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            data: FileData::default(),
        }
    }

    /// Pages in document order.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.data
            .pages
            .iter()
            .filter_map(|id| self.data.pages_index.get(id))
    }

    pub fn page(&self, id: &Uuid) -> Option<&Page> {
        self.data.pages_index.get(id)
    }

    pub fn add_page(&mut self, page: Page) -> Result<()> {
        if self.data.pages_index.contains_key(&page.id) {
            return Err(ConvertError::DuplicateEntity {
                kind: "page",
                id: page.id.to_string(),
            });
        }
        self.data.pages.push(page.id);
        self.data.pages_index.insert(page.id, page);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(name: &str, id: Uuid) -> Shape {
        let geometry = ShapeGeometry::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        let mut base = ShapeBase::new(name, &geometry);
        base.id = id;
        Shape::new(base, ShapeKind::Rect(RectAttrs::default()))
    }

    #[test]
    fn empty_page_has_self_referential_root() {
        let page = Page::new(Uuid::now_v7(), "Page 1");
        let root = page.root().unwrap();
        assert_eq!(root.base.parent_id, ROOT_FRAME_ID);
        assert_eq!(root.base.frame_id, ROOT_FRAME_ID);
        assert_eq!(root.base.width, MIN_SIZE);
        assert_eq!(root.base.fills, vec![Fill::solid("#FFFFFF", 1.0)]);
    }

    #[test]
    fn root_table_indexes_its_root() {
        let mut page = Page::new(Uuid::now_v7(), "Page 1");
        assert!(page.objects.insert(root_frame(vec![])).is_err());
        let id = Uuid::now_v7();
        page.objects.insert(rect("a", id)).unwrap();
        assert_eq!(page.objects.ids().collect::<Vec<_>>(), vec![ROOT_FRAME_ID, id]);
    }

    #[test]
    fn object_table_rejects_duplicates() {
        let mut table = ObjectTable::new();
        let id = Uuid::now_v7();
        table.insert(rect("a", id)).unwrap();
        assert!(table.insert(rect("b", id)).is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn object_table_keeps_insertion_order_through_json() {
        let mut table = ObjectTable::new();
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::now_v7()).rev().collect();
        for (i, id) in ids.iter().enumerate() {
            table.insert(rect(&format!("r{}", i), *id)).unwrap();
        }
        let json = serde_json::to_string(&table).unwrap();
        let parsed: ObjectTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.ids().collect::<Vec<_>>(), ids);
        assert_eq!(parsed, table);
    }

    #[test]
    fn document_pages_follow_page_order() {
        let mut doc = TargetDocument::new(Uuid::now_v7(), "File");
        let second = Uuid::now_v7();
        let first = Uuid::now_v7();
        doc.add_page(Page::new(second, "B")).unwrap();
        doc.add_page(Page::new(first, "A")).unwrap();
        let names: Vec<_> = doc.pages().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert!(doc.add_page(Page::new(first, "A")).is_err());
    }
}
