//! # Differencing Engine
//!
//! Compares the document currently hosted on the target with a freshly converted one and
//! emits the operations that turn the former into the latter.
//!
//! ## Matching
//!
//! Pages, objects and library entries are matched by id. Because the identity mapping
//! gives an unchanged source node the same target id on every run, an untouched node
//! compares equal and produces no operation. Objects are compared attribute by attribute
//! on their serialized form, with a small tolerance on numbers.
//!
//! ## Ordering
//!
//! Operations are applied in order, so references must exist when they are used:
//!
//! 1. library additions and modifications (colors, typographies, components)
//! 2. per fresh page, in page order:
//!    - a new page is added, then compared against the empty page the target creates
//!    - a renamed page is modified
//!    - objects are added or modified in the fresh table's insertion order, which puts
//!      parents before children
//!    - objects that are gone are removed in reverse table order, children first
//! 3. pages that are gone are removed, which removes their objects with them
//! 4. library removals
//!
//! A document rename is not an operation; it is returned as [`DiffResult::new_name`].

use crate::error::Result;
use crate::target::{ObjectTable, Page, TargetDocument};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

pub mod delta;
pub mod ops;

pub use delta::{field_delta, values_equal};
pub use ops::{AttrChange, Operation};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffResult {
    pub operations: Vec<Operation>,
    pub new_name: Option<String>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty() && self.new_name.is_none()
    }

    /// Operation counts by type, for reporting.
    pub fn summary(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for op in &self.operations {
            *counts.entry(op.type_name()).or_insert(0) += 1;
        }
        counts
    }
}

/// Operations reconciling `previous` (hosted) with `fresh` (just converted).
pub fn diff(previous: &TargetDocument, fresh: &TargetDocument) -> Result<DiffResult> {
    let mut operations = Vec::new();
    let old = &previous.data;
    let new = &fresh.data;

    library_upserts(
        &old.colors,
        &new.colors,
        &mut operations,
        |color| Operation::AddColor { color },
        |color| Operation::ModifyColor { color },
    )?;
    library_upserts(
        &old.typographies,
        &new.typographies,
        &mut operations,
        |typography| Operation::AddTypography { typography },
        |typography| Operation::ModifyTypography { typography },
    )?;
    library_upserts(
        &old.components,
        &new.components,
        &mut operations,
        |component| Operation::AddComponent { component },
        |component| Operation::ModifyComponent { component },
    )?;

    for page in fresh.pages() {
        match previous.page(&page.id) {
            Some(hosted) => {
                if hosted.name != page.name {
                    operations.push(Operation::ModifyPage {
                        id: page.id,
                        name: page.name.clone(),
                    });
                }
                diff_objects(page.id, &hosted.objects, &page.objects, &mut operations)?;
            }
            None => {
                operations.push(Operation::AddPage {
                    id: page.id,
                    name: page.name.clone(),
                });
                let blank = Page::new(page.id, page.name.clone());
                diff_objects(page.id, &blank.objects, &page.objects, &mut operations)?;
            }
        }
    }

    for page in previous.pages() {
        if fresh.page(&page.id).is_none() {
            operations.push(Operation::RemovePage { id: page.id });
        }
    }

    library_removals(&old.components, &new.components, &mut operations, |id| {
        Operation::RemoveComponent { id }
    });
    library_removals(&old.typographies, &new.typographies, &mut operations, |id| {
        Operation::RemoveTypography { id }
    });
    library_removals(&old.colors, &new.colors, &mut operations, |id| {
        Operation::RemoveColor { id }
    });

    let new_name = (previous.name != fresh.name).then(|| fresh.name.clone());
    let result = DiffResult {
        operations,
        new_name,
    };
    log::info!("diff: {:?}", result.summary());
    Ok(result)
}

/// Emits one page's object operations. Adds and modifies follow the fresh table's
/// insertion order, so parents land before their children. Removes walk the hosted table
/// in reverse insertion order, so children go before their parents.
fn diff_objects(
    page_id: Uuid,
    previous: &ObjectTable,
    fresh: &ObjectTable,
    operations: &mut Vec<Operation>,
) -> Result<()> {
    for shape in fresh.iter() {
        match previous.get(&shape.id()) {
            None => operations.push(Operation::AddObject {
                page_id,
                obj: Box::new(shape.clone()),
            }),
            Some(hosted) if hosted == shape => {}
            Some(hosted) => {
                let changes = field_delta(hosted, shape)?;
                if !changes.is_empty() {
                    operations.push(Operation::ModifyObject {
                        page_id,
                        id: shape.id(),
                        operations: changes,
                    });
                }
            }
        }
    }

    for id in previous.ids().rev() {
        if !fresh.contains(&id) {
            operations.push(Operation::RemoveObject { page_id, id });
        }
    }
    Ok(())
}

fn library_upserts<T, A, M>(
    previous: &BTreeMap<Uuid, T>,
    fresh: &BTreeMap<Uuid, T>,
    operations: &mut Vec<Operation>,
    add: A,
    modify: M,
) -> Result<()>
where
    T: Clone + PartialEq + Serialize,
    A: Fn(T) -> Operation,
    M: Fn(T) -> Operation,
{
    for (id, entry) in fresh {
        match previous.get(id) {
            None => operations.push(add(entry.clone())),
            Some(hosted) if hosted == entry => {}
            Some(hosted) => {
                if !field_delta(hosted, entry)?.is_empty() {
                    operations.push(modify(entry.clone()));
                }
            }
        }
    }
    Ok(())
}

fn library_removals<T, R>(
    previous: &BTreeMap<Uuid, T>,
    fresh: &BTreeMap<Uuid, T>,
    operations: &mut Vec<Operation>,
    remove: R,
) where
    R: Fn(Uuid) -> Operation,
{
    for id in previous.keys().filter(|id| !fresh.contains_key(*id)) {
        operations.push(remove(*id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, ShapeGeometry};
    use crate::target::{
        Component, Fill, LibraryColor, RectAttrs, Shape, ShapeBase, ShapeKind, ROOT_FRAME_ID,
    };

    fn rect(id: Uuid, x: f64) -> Shape {
        let geometry = ShapeGeometry::from_rect(Rect::new(x, 0.0, 10.0, 10.0));
        let mut base = ShapeBase::new("Box", &geometry);
        base.id = id;
        base.parent_id = ROOT_FRAME_ID;
        base.frame_id = ROOT_FRAME_ID;
        Shape::new(base, ShapeKind::Rect(RectAttrs::default()))
    }

    fn page_with(id: Uuid, shapes: Vec<Shape>) -> Page {
        let mut page = Page::new(id, "Page");
        let ids: Vec<Uuid> = shapes.iter().map(Shape::id).collect();
        for shape in shapes {
            page.objects.insert(shape).unwrap();
        }
        if let Some(children) = page
            .objects
            .get_mut(&ROOT_FRAME_ID)
            .and_then(Shape::shapes_mut)
        {
            *children = ids;
        }
        page
    }

    fn document(pages: Vec<Page>) -> TargetDocument {
        let mut doc = TargetDocument::new(Uuid::nil(), "File");
        for page in pages {
            doc.add_page(page).unwrap();
        }
        doc
    }

    #[test]
    fn document_against_itself_is_empty() {
        let page = page_with(Uuid::now_v7(), vec![rect(Uuid::now_v7(), 0.0)]);
        let mut doc = document(vec![page]);
        let color = LibraryColor {
            id: Uuid::now_v7(),
            name: "Primary".to_string(),
            path: "Brand".to_string(),
            color: Some("#ff0000".to_string()),
            opacity: Some(1.0),
            gradient: None,
        };
        doc.data.colors.insert(color.id, color);

        let result = diff(&doc, &doc).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.new_name, None);
    }

    #[test]
    fn object_changes_are_ordered() {
        let page_id = Uuid::now_v7();
        let kept = Uuid::now_v7();
        let moved = Uuid::now_v7();
        let gone_a = Uuid::now_v7();
        let gone_b = Uuid::now_v7();
        let added = Uuid::now_v7();

        let previous = document(vec![page_with(
            page_id,
            vec![
                rect(kept, 0.0),
                rect(moved, 0.0),
                rect(gone_a, 0.0),
                rect(gone_b, 0.0),
            ],
        )]);
        let fresh = document(vec![page_with(
            page_id,
            vec![rect(kept, 0.0), rect(moved, 25.0), rect(added, 0.0)],
        )]);

        let result = diff(&previous, &fresh).unwrap();
        let kinds: Vec<_> = result.operations.iter().map(Operation::type_name).collect();
        assert_eq!(
            kinds,
            vec![
                "modify-object",
                "modify-object",
                "add-object",
                "remove-object",
                "remove-object"
            ]
        );
        // Root frame first, then the moved rect.
        match &result.operations[1] {
            Operation::ModifyObject { id, operations, .. } => {
                assert_eq!(*id, moved);
                assert!(operations.iter().any(|change| change.attr == "x"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            result.operations[3],
            Operation::RemoveObject {
                page_id,
                id: gone_b
            }
        );
    }

    #[test]
    fn pages_are_added_renamed_and_removed() {
        let kept = Uuid::now_v7();
        let stale = Uuid::now_v7();
        let added = Uuid::now_v7();

        let previous = document(vec![
            Page::new(kept, "Old name"),
            page_with(stale, vec![rect(Uuid::now_v7(), 0.0)]),
        ]);
        let mut fresh_page = Page::new(added, "New");
        if let Some(root) = fresh_page.objects.get_mut(&ROOT_FRAME_ID) {
            root.base.fills = vec![Fill::solid("#1e1e1e", 1.0)];
        }
        let mut fresh = document(vec![Page::new(kept, "New name"), fresh_page]);
        fresh.name = "Renamed".to_string();

        let result = diff(&previous, &fresh).unwrap();
        let kinds: Vec<_> = result.operations.iter().map(Operation::type_name).collect();
        assert_eq!(
            kinds,
            vec!["modify-page", "add-page", "modify-object", "remove-page"]
        );
        assert_eq!(result.operations[3], Operation::RemovePage { id: stale });
        assert_eq!(result.new_name.as_deref(), Some("Renamed"));
    }

    #[test]
    fn library_adds_lead_and_removals_trail() {
        let page_id = Uuid::now_v7();
        let mut previous = document(vec![Page::new(page_id, "Page")]);
        let mut fresh = previous.clone();

        let old_component = Component {
            id: Uuid::now_v7(),
            name: "Old".to_string(),
            path: String::new(),
            main_instance_id: None,
            main_instance_page: None,
        };
        previous
            .data
            .components
            .insert(old_component.id, old_component.clone());
        let new_component = Component {
            id: Uuid::now_v7(),
            name: "New".to_string(),
            ..old_component.clone()
        };
        fresh
            .data
            .components
            .insert(new_component.id, new_component.clone());
        fresh
            .data
            .pages_index
            .insert(page_id, page_with(page_id, vec![rect(Uuid::now_v7(), 0.0)]));

        let result = diff(&previous, &fresh).unwrap();
        let kinds: Vec<_> = result.operations.iter().map(Operation::type_name).collect();
        assert_eq!(
            kinds,
            vec!["add-component", "modify-object", "add-object", "remove-component"]
        );
        assert_eq!(
            result.operations[3],
            Operation::RemoveComponent {
                id: old_component.id
            }
        );
    }
}
