//! # Registry
//!
//! Scoped lookup service used while converting one document. Scopes nest as the
//! traversal descends and are dropped in stack order as it unwinds:
//!
//! ```text
//! DocumentScope            ids, colors, typographies, components, media
//!   └─ PageScope           the page's object table
//!        └─ ComponentScope marks the subtree as component content
//!        └─ InstanceScope  overrides declared by one instance
//! ```
//!
//! Only the document and page scopes own storage. Component and instance scopes hold a
//! mutable reference to their parent and forward every storage call to it, so a shape
//! registered inside an instance lands in the enclosing page's table.
//!
//! [`Scope::overrides`] distinguishes "no entry" (`None`, keep asking outward) from an
//! explicitly empty override list (`Some(&[])`).

use crate::error::{ConvertError, Result};
use crate::mapping::IdMapping;
use crate::target::{Component, LibraryColor, MediaEntry, ObjectTable, Shape, Typography};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Document-wide libraries produced by a conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Libraries {
    pub colors: BTreeMap<Uuid, LibraryColor>,
    pub typographies: BTreeMap<Uuid, Typography>,
    pub components: BTreeMap<Uuid, Component>,
    pub media: BTreeMap<Uuid, MediaEntry>,
}

pub trait Scope {
    /// Target id of the file being produced, used for library `ref-file` fields.
    fn file_id(&self) -> Uuid;

    /// Target id for a source key, minted on first sight.
    fn translate_id(&mut self, key: &str) -> Uuid;

    fn translate_media(&mut self, key: &str) -> Uuid;

    /// Already-mapped id for a source key. Never mints.
    fn lookup_id(&self, key: &str) -> Result<Uuid>;

    fn font_id(&self, key: &str) -> Option<Uuid>;

    fn add_node(&mut self, shape: Shape) -> Result<()>;

    fn nodes(&self) -> Option<&ObjectTable>;

    fn nodes_mut(&mut self) -> Option<&mut ObjectTable>;

    fn add_color(&mut self, color: LibraryColor) -> Result<()>;

    fn color(&self, id: &Uuid) -> Option<&LibraryColor>;

    fn add_typography(&mut self, typography: Typography) -> Result<()>;

    fn typography(&self, id: &Uuid) -> Option<&Typography>;

    fn add_component(&mut self, component: Component) -> Result<()>;

    fn component(&self, id: &Uuid) -> Option<&Component>;

    /// Records a media entry. The same image may be referenced many times.
    fn add_media(&mut self, media: MediaEntry);

    /// Override field list for a node inside the instance being traversed.
    fn overrides(&self, node_id: &str) -> Option<&[String]>;

    /// Whether the traversal is inside a component or instance subtree.
    fn in_component(&self) -> bool;

    fn node(&self, id: &Uuid) -> Option<&Shape> {
        self.nodes().and_then(|nodes| nodes.get(id))
    }
}

fn insert_unique<T>(
    table: &mut BTreeMap<Uuid, T>,
    id: Uuid,
    value: T,
    kind: &'static str,
) -> Result<()> {
    if table.contains_key(&id) {
        return Err(ConvertError::DuplicateEntity {
            kind,
            id: id.to_string(),
        });
    }
    table.insert(id, value);
    Ok(())
}

pub struct DocumentScope<'m> {
    mapping: &'m mut IdMapping,
    file_id: Uuid,
    libraries: Libraries,
}

impl<'m> DocumentScope<'m> {
    pub fn new(mapping: &'m mut IdMapping, file_id: Uuid) -> Self {
        Self {
            mapping,
            file_id,
            libraries: Libraries::default(),
        }
    }

    pub fn new_page(&mut self, page_id: Uuid) -> PageScope<'_> {
        PageScope::new(self, page_id)
    }

    pub fn libraries(&self) -> &Libraries {
        &self.libraries
    }

    pub fn components_mut(&mut self) -> impl Iterator<Item = &mut Component> {
        self.libraries.components.values_mut()
    }

    pub fn into_libraries(self) -> Libraries {
        self.libraries
    }
}

impl Scope for DocumentScope<'_> {
    fn file_id(&self) -> Uuid {
        self.file_id
    }

    fn translate_id(&mut self, key: &str) -> Uuid {
        self.mapping.translate_id(key)
    }

    fn translate_media(&mut self, key: &str) -> Uuid {
        self.mapping.translate_media(key)
    }

    fn lookup_id(&self, key: &str) -> Result<Uuid> {
        self.mapping.lookup_id(key)
    }

    fn font_id(&self, key: &str) -> Option<Uuid> {
        self.mapping.font_id(key)
    }

    fn add_node(&mut self, shape: Shape) -> Result<()> {
        Err(ConvertError::OutsidePage(shape.id()))
    }

    fn nodes(&self) -> Option<&ObjectTable> {
        None
    }

    fn nodes_mut(&mut self) -> Option<&mut ObjectTable> {
        None
    }

    fn add_color(&mut self, color: LibraryColor) -> Result<()> {
        insert_unique(&mut self.libraries.colors, color.id, color, "color")
    }

    fn color(&self, id: &Uuid) -> Option<&LibraryColor> {
        self.libraries.colors.get(id)
    }

    fn add_typography(&mut self, typography: Typography) -> Result<()> {
        insert_unique(
            &mut self.libraries.typographies,
            typography.id,
            typography,
            "typography",
        )
    }

    fn typography(&self, id: &Uuid) -> Option<&Typography> {
        self.libraries.typographies.get(id)
    }

    fn add_component(&mut self, component: Component) -> Result<()> {
        insert_unique(
            &mut self.libraries.components,
            component.id,
            component,
            "component",
        )
    }

    fn component(&self, id: &Uuid) -> Option<&Component> {
        self.libraries.components.get(id)
    }

    fn add_media(&mut self, media: MediaEntry) {
        self.libraries.media.entry(media.id).or_insert(media);
    }

    fn overrides(&self, _node_id: &str) -> Option<&[String]> {
        None
    }

    fn in_component(&self) -> bool {
        false
    }
}

/// Forwards the library half of [`Scope`] to `self.parent`.
macro_rules! forward_library {
    () => {
        fn file_id(&self) -> Uuid {
            self.parent.file_id()
        }

        fn translate_id(&mut self, key: &str) -> Uuid {
            self.parent.translate_id(key)
        }

        fn translate_media(&mut self, key: &str) -> Uuid {
            self.parent.translate_media(key)
        }

        fn lookup_id(&self, key: &str) -> Result<Uuid> {
            self.parent.lookup_id(key)
        }

        fn font_id(&self, key: &str) -> Option<Uuid> {
            self.parent.font_id(key)
        }

        fn add_color(&mut self, color: LibraryColor) -> Result<()> {
            self.parent.add_color(color)
        }

        fn color(&self, id: &Uuid) -> Option<&LibraryColor> {
            self.parent.color(id)
        }

        fn add_typography(&mut self, typography: Typography) -> Result<()> {
            self.parent.add_typography(typography)
        }

        fn typography(&self, id: &Uuid) -> Option<&Typography> {
            self.parent.typography(id)
        }

        fn add_component(&mut self, component: Component) -> Result<()> {
            self.parent.add_component(component)
        }

        fn component(&self, id: &Uuid) -> Option<&Component> {
            self.parent.component(id)
        }

        fn add_media(&mut self, media: MediaEntry) {
            self.parent.add_media(media)
        }
    };
}

/// Forwards the node half of [`Scope`] to `self.parent`.
macro_rules! forward_nodes {
    () => {
        fn add_node(&mut self, shape: Shape) -> Result<()> {
            self.parent.add_node(shape)
        }

        fn nodes(&self) -> Option<&ObjectTable> {
            self.parent.nodes()
        }

        fn nodes_mut(&mut self) -> Option<&mut ObjectTable> {
            self.parent.nodes_mut()
        }
    };
}

pub struct PageScope<'p> {
    parent: &'p mut dyn Scope,
    page_id: Uuid,
    objects: ObjectTable,
}

impl<'p> PageScope<'p> {
    pub fn new(parent: &'p mut dyn Scope, page_id: Uuid) -> Self {
        Self {
            parent,
            page_id,
            objects: ObjectTable::new(),
        }
    }

    pub fn page_id(&self) -> Uuid {
        self.page_id
    }

    /// Ends the page, handing back its object table.
    pub fn finish(self) -> ObjectTable {
        self.objects
    }
}

impl Scope for PageScope<'_> {
    forward_library!();

    fn add_node(&mut self, shape: Shape) -> Result<()> {
        let base = &shape.base;
        if base.id != base.parent_id {
            for reference in [base.parent_id, base.frame_id] {
                if !self.objects.contains(&reference) {
                    return Err(ConvertError::UnregisteredNode(reference.to_string()));
                }
            }
        }
        self.objects.insert(shape)
    }

    fn nodes(&self) -> Option<&ObjectTable> {
        Some(&self.objects)
    }

    fn nodes_mut(&mut self) -> Option<&mut ObjectTable> {
        Some(&mut self.objects)
    }

    fn overrides(&self, _node_id: &str) -> Option<&[String]> {
        None
    }

    fn in_component(&self) -> bool {
        false
    }
}

/// Scope for the content of a component definition.
pub struct ComponentScope<'p> {
    parent: &'p mut dyn Scope,
}

impl<'p> ComponentScope<'p> {
    pub fn new(parent: &'p mut dyn Scope) -> Self {
        Self { parent }
    }
}

impl Scope for ComponentScope<'_> {
    forward_library!();
    forward_nodes!();

    fn overrides(&self, node_id: &str) -> Option<&[String]> {
        self.parent.overrides(node_id)
    }

    fn in_component(&self) -> bool {
        true
    }
}

/// Scope for the subtree of one instance, carrying the overrides it declares.
pub struct InstanceScope<'p> {
    parent: &'p mut dyn Scope,
    overrides: HashMap<String, Vec<String>>,
}

impl<'p> InstanceScope<'p> {
    pub fn new(parent: &'p mut dyn Scope, overrides: HashMap<String, Vec<String>>) -> Self {
        Self { parent, overrides }
    }
}

impl Scope for InstanceScope<'_> {
    forward_library!();
    forward_nodes!();

    fn overrides(&self, node_id: &str) -> Option<&[String]> {
        match self.overrides.get(node_id) {
            Some(fields) => Some(fields.as_slice()),
            None => self.parent.overrides(node_id),
        }
    }

    fn in_component(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, ShapeGeometry};
    use crate::target::{root_frame, Fill, RectAttrs, ShapeBase, ShapeKind, ROOT_FRAME_ID};

    fn child(id: Uuid, parent: Uuid) -> Shape {
        let geometry = ShapeGeometry::from_rect(Rect::new(0.0, 0.0, 5.0, 5.0));
        let mut base = ShapeBase::new("child", &geometry);
        base.id = id;
        base.parent_id = parent;
        base.frame_id = parent;
        Shape::new(base, ShapeKind::Rect(RectAttrs::default()))
    }

    #[test]
    fn nodes_added_in_nested_scopes_land_in_page() {
        let mut mapping = IdMapping::new();
        let mut doc = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let mut page = doc.new_page(Uuid::now_v7());
        page.add_node(root_frame(vec![Fill::solid("#FFFFFF", 1.0)])).unwrap();

        let id = page.translate_id("1:1");
        {
            let mut component = ComponentScope::new(&mut page);
            let mut instance = InstanceScope::new(&mut component, HashMap::new());
            instance.add_node(child(id, ROOT_FRAME_ID)).unwrap();
            assert!(instance.in_component());
        }
        assert!(!page.in_component());
        let objects = page.finish();
        assert_eq!(objects.len(), 2);
        assert!(objects.contains(&id));
        assert_eq!(mapping.lookup_id("1:1").unwrap(), id);
    }

    #[test]
    fn dangling_parent_is_rejected() {
        let mut mapping = IdMapping::new();
        let mut doc = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let mut page = doc.new_page(Uuid::now_v7());
        let err = page.add_node(child(Uuid::now_v7(), Uuid::now_v7()));
        assert!(matches!(err, Err(ConvertError::UnregisteredNode(_))));
    }

    #[test]
    fn document_scope_has_no_object_table() {
        let mut mapping = IdMapping::new();
        let mut doc = DocumentScope::new(&mut mapping, Uuid::now_v7());
        assert!(doc.nodes().is_none());
        assert!(matches!(
            doc.add_node(child(Uuid::now_v7(), ROOT_FRAME_ID)),
            Err(ConvertError::OutsidePage(_))
        ));
    }

    #[test]
    fn overrides_fall_back_to_enclosing_instance() {
        let mut mapping = IdMapping::new();
        let mut doc = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let mut page = doc.new_page(Uuid::now_v7());
        assert_eq!(page.overrides("I1:1;2:2"), None);

        let outer_map = HashMap::from([
            ("I1:1;2:2".to_string(), vec!["fills".to_string()]),
            ("I1:1;2:3".to_string(), vec![]),
        ]);
        let mut outer = InstanceScope::new(&mut page, outer_map);
        let inner_map = HashMap::from([("I1:1;4:4".to_string(), vec!["characters".to_string()])]);
        let inner = InstanceScope::new(&mut outer, inner_map);

        assert_eq!(
            inner.overrides("I1:1;2:2"),
            Some(&["fills".to_string()][..])
        );
        assert_eq!(inner.overrides("I1:1;2:3"), Some(&[][..]));
        assert_eq!(
            inner.overrides("I1:1;4:4"),
            Some(&["characters".to_string()][..])
        );
        assert_eq!(inner.overrides("9:9"), None);
    }

    #[test]
    fn duplicate_library_entries_are_errors() {
        let mut mapping = IdMapping::new();
        let mut doc = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let id = doc.translate_id("comp");
        let component = Component {
            id,
            name: "Button".to_string(),
            path: String::new(),
            main_instance_id: None,
            main_instance_page: None,
        };
        doc.add_component(component.clone()).unwrap();
        assert!(matches!(
            doc.add_component(component),
            Err(ConvertError::DuplicateEntity { kind: "component", .. })
        ));
    }
}
