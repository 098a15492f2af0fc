//! # Node Transformers
//!
//! Converts source nodes into target shapes, one page at a time.
//!
//! [`transform_node`] dispatches on the source kind to a per-kind transformer. A
//! transformer only builds the shape: geometry, paints and kind-specific attributes. The
//! dispatcher then assigns the three ids every shape needs:
//!
//! - `id`: the node's mapped id
//! - `parent-id`: the enclosing container
//! - `frame-id`: the closest enclosing *frame*, not the immediate parent, since the
//!   target groups shapes per frame
//!
//! and registers the shape before descending, so that a child's references always point
//! at shapes already in the page table. The container's `shapes` list is written once its
//! children are done.
//!
//! ## Coordinate spaces
//!
//! A source `relativeTransform` is relative to the closest ancestor that establishes a
//! coordinate space (frames, sections, components, instances). Groups and boolean
//! operations do not, so their children keep the transform of the group's own space.
//!
//! ## Masks
//!
//! A mask applies to itself and every later sibling up to the next mask. Each such run is
//! wrapped in a synthetic masked group whose id is derived from the mask's id; siblings
//! before the first mask stay direct children. A mask that is skipped as hidden leaves its
//! run unwrapped.
//!
//! Composite kinds (component, component set, instance) are built by the frame transformer
//! and then patched with component linkage. Unsupported kinds fail with
//! [`ConvertError::UnsupportedNodeKind`].

use crate::error::{ConvertError, Result};
use crate::geometry::{compose, ShapeGeometry, SourceTransform};
use crate::registry::{ComponentScope, InstanceScope, Scope};
use crate::source::{NodeKind, SourceFile, SourceNode};
use crate::target::{GroupAttrs, Shape, ShapeBase, ShapeKind};
use crate::text::FontCatalogs;
use std::collections::HashMap;
use uuid::Uuid;

pub mod clean;
pub mod component;
pub mod document;
pub mod frame;
pub mod group;
pub mod shapes;
pub mod text;

pub use document::{convert_document, Conversion, Notice, NoticeLevel};

/// Read-only inputs shared by every transformer during one conversion.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub file: &'a SourceFile,
    pub catalogs: &'a FontCatalogs,
    pub include_hidden: bool,
}

/// The target container children are being added to.
#[derive(Debug, Clone, Copy)]
pub struct Parent {
    pub id: Uuid,
    pub frame_id: Uuid,
    /// Absolute transform of the coordinate space children are positioned in.
    pub transform: SourceTransform,
}

/// Placement of a node with the given absolute transform.
pub fn node_geometry(node: &SourceNode, transform: &SourceTransform) -> Result<ShapeGeometry> {
    let bbox = node.bounding_box()?;
    let size = node.unrotated_size()?;
    Ok(ShapeGeometry::derive(&bbox, size, transform))
}

fn build_shape(
    cx: &Context,
    scope: &mut dyn Scope,
    node: &SourceNode,
    transform: &SourceTransform,
) -> Result<Shape> {
    match &node.kind {
        NodeKind::Rectangle => shapes::rectangle(scope, node, transform),
        NodeKind::Ellipse => shapes::ellipse(scope, node, transform),
        NodeKind::Vector | NodeKind::Star | NodeKind::RegularPolygon => {
            shapes::vector(scope, node, transform)
        }
        NodeKind::Line => shapes::line(scope, node, transform),
        NodeKind::BooleanOperation => shapes::boolean(scope, node, transform),
        NodeKind::Group => group::group(scope, node, transform),
        NodeKind::Frame | NodeKind::Section => frame::frame(scope, node, transform),
        NodeKind::Text => text::text(cx, scope, node, transform),
        NodeKind::Component => component::component(cx, scope, node, transform),
        NodeKind::ComponentSet => component::component_set(scope, node, transform),
        NodeKind::Instance => component::instance(cx, scope, node, transform),
        NodeKind::Document | NodeKind::Canvas | NodeKind::Unsupported(_) => {
            Err(ConvertError::UnsupportedNodeKind {
                node_id: node.id.clone(),
                kind: node.kind.as_str().to_string(),
            })
        }
    }
}

/// Transforms `node` and its subtree into the page held by `scope`. Returns the shape id,
/// or `None` when the node is skipped.
pub fn transform_node(
    cx: &Context,
    scope: &mut dyn Scope,
    node: &SourceNode,
    parent: &Parent,
) -> Result<Option<Uuid>> {
    if !node.visible && !cx.include_hidden {
        return Ok(None);
    }

    let transform = compose(&parent.transform, &node.transform());
    let mut shape = build_shape(cx, scope, node, &transform)?;
    let id = scope.translate_id(&node.id);
    shape.base.id = id;
    shape.base.parent_id = parent.id;
    shape.base.frame_id = parent.frame_id;

    let is_frame = shape.is_frame();
    let is_container = shape.shapes().is_some();
    scope.add_node(shape)?;

    if is_container && !node.children.is_empty() {
        let inner = Parent {
            id,
            frame_id: if is_frame { id } else { parent.frame_id },
            transform: if node.kind.establishes_space() {
                transform
            } else {
                parent.transform
            },
        };
        let children = match node.kind {
            NodeKind::Component => {
                let mut component_scope = ComponentScope::new(scope);
                transform_children(cx, &mut component_scope, &node.children, &inner)?
            }
            NodeKind::Instance => {
                let mut instance_scope = InstanceScope::new(scope, instance_overrides(node));
                transform_children(cx, &mut instance_scope, &node.children, &inner)?
            }
            _ => transform_children(cx, scope, &node.children, &inner)?,
        };
        set_children(scope, id, children)?;
    }

    Ok(Some(id))
}

fn instance_overrides(node: &SourceNode) -> HashMap<String, Vec<String>> {
    node.overrides
        .iter()
        .map(|o| (o.id.clone(), o.overridden_fields.clone()))
        .collect()
}

/// Writes a container's child list.
pub fn set_children(scope: &mut dyn Scope, id: Uuid, children: Vec<Uuid>) -> Result<()> {
    let shapes = scope
        .nodes_mut()
        .and_then(|nodes| nodes.get_mut(&id))
        .and_then(Shape::shapes_mut)
        .ok_or_else(|| ConvertError::UnregisteredNode(id.to_string()))?;
    *shapes = children;
    Ok(())
}

/// Transforms a sibling list, wrapping mask runs in masked groups. Returns the ids of the
/// direct children in order.
pub fn transform_children(
    cx: &Context,
    scope: &mut dyn Scope,
    children: &[SourceNode],
    parent: &Parent,
) -> Result<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(children.len());
    let mut rest = children;

    while !rest.is_empty() {
        match rest.iter().position(|c| c.is_mask) {
            None => {
                plain_children(cx, scope, rest, parent, &mut ids)?;
                break;
            }
            Some(0) => {
                let end = rest[1..]
                    .iter()
                    .position(|c| c.is_mask)
                    .map_or(rest.len(), |i| i + 1);
                masked_group(cx, scope, &rest[..end], parent, &mut ids)?;
                rest = &rest[end..];
            }
            Some(k) => {
                plain_children(cx, scope, &rest[..k], parent, &mut ids)?;
                rest = &rest[k..];
            }
        }
    }

    Ok(ids)
}

fn plain_children(
    cx: &Context,
    scope: &mut dyn Scope,
    children: &[SourceNode],
    parent: &Parent,
    ids: &mut Vec<Uuid>,
) -> Result<()> {
    for child in children {
        if let Some(id) = transform_node(cx, scope, child, parent)? {
            ids.push(id);
        }
    }
    Ok(())
}

/// Wraps `run` (a mask followed by the siblings it clips) in a masked group placed
/// where the mask is. When the mask itself is skipped, the clipped siblings are kept as
/// plain children of `parent`.
fn masked_group(
    cx: &Context,
    scope: &mut dyn Scope,
    run: &[SourceNode],
    parent: &Parent,
    ids: &mut Vec<Uuid>,
) -> Result<()> {
    let Some((mask, clipped)) = run.split_first() else {
        return Ok(());
    };
    if !mask.visible && !cx.include_hidden {
        return plain_children(cx, scope, clipped, parent, ids);
    }

    let transform = compose(&parent.transform, &mask.transform());
    let geometry = node_geometry(mask, &transform)?;
    let id = scope.translate_id(&format!("{}.mask-group", mask.id));

    let mut base = ShapeBase::new(&mask.name, &geometry);
    base.id = id;
    base.parent_id = parent.id;
    base.frame_id = parent.frame_id;
    scope.add_node(Shape::new(
        base,
        ShapeKind::Group(GroupAttrs {
            shapes: Vec::new(),
            masked_group: Some(true),
        }),
    ))?;

    let inner = Parent { id, ..*parent };
    let mut children = Vec::with_capacity(run.len());
    plain_children(cx, scope, run, &inner, &mut children)?;
    set_children(scope, id, children)?;
    ids.push(id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, IDENTITY_TRANSFORM};
    use crate::mapping::IdMapping;
    use crate::registry::DocumentScope;
    use crate::target::{root_frame, ROOT_FRAME_ID};
    use crate::test_utils::{frame_node, group_node, rect_node, source_file};

    fn root_parent() -> Parent {
        Parent {
            id: ROOT_FRAME_ID,
            frame_id: ROOT_FRAME_ID,
            transform: IDENTITY_TRANSFORM,
        }
    }

    fn run(
        children: Vec<SourceNode>,
        include_hidden: bool,
    ) -> (crate::target::ObjectTable, IdMapping, Vec<Uuid>) {
        let file = source_file(vec![]);
        let catalogs = FontCatalogs::default();
        let cx = Context {
            file: &file,
            catalogs: &catalogs,
            include_hidden,
        };
        let mut mapping = IdMapping::new();
        let (objects, ids) = {
            let mut doc = DocumentScope::new(&mut mapping, Uuid::now_v7());
            let mut page = doc.new_page(Uuid::now_v7());
            page.add_node(root_frame(vec![])).unwrap();
            let ids = transform_children(&cx, &mut page, &children, &root_parent()).unwrap();
            (page.finish(), ids)
        };
        (objects, mapping, ids)
    }

    #[test]
    fn frame_id_is_closest_frame_not_parent() {
        let rect = rect_node("3:1", Rect::new(10.0, 10.0, 5.0, 5.0));
        let group = group_node("2:1", vec![rect]);
        let frame = frame_node("1:1", Rect::new(0.0, 0.0, 100.0, 100.0), vec![group]);
        let (objects, mapping, ids) = run(vec![frame], true);

        let frame_id = mapping.lookup_id("1:1").unwrap();
        let group_id = mapping.lookup_id("2:1").unwrap();
        let rect_id = mapping.lookup_id("3:1").unwrap();
        assert_eq!(ids, vec![frame_id]);

        let rect = objects.get(&rect_id).unwrap();
        assert_eq!(rect.base.parent_id, group_id);
        assert_eq!(rect.base.frame_id, frame_id);
        assert_eq!(objects.get(&group_id).unwrap().base.frame_id, frame_id);
        assert_eq!(objects.get(&frame_id).unwrap().shapes(), Some(&[group_id][..]));
        assert_eq!(objects.ids().collect::<Vec<_>>()[1..], [frame_id, group_id, rect_id]);
    }

    #[test]
    fn mask_runs_become_masked_groups() {
        let mut first_mask = rect_node("1:2", Rect::new(0.0, 0.0, 10.0, 10.0));
        first_mask.is_mask = true;
        let mut second_mask = rect_node("1:4", Rect::new(0.0, 0.0, 10.0, 10.0));
        second_mask.is_mask = true;
        let children = vec![
            rect_node("1:1", Rect::new(0.0, 0.0, 10.0, 10.0)),
            first_mask,
            rect_node("1:3", Rect::new(0.0, 0.0, 10.0, 10.0)),
            second_mask,
            rect_node("1:5", Rect::new(0.0, 0.0, 10.0, 10.0)),
        ];
        let (objects, mapping, ids) = run(children, true);

        let plain = mapping.lookup_id("1:1").unwrap();
        let first_group = mapping.lookup_id("1:2.mask-group").unwrap();
        let second_group = mapping.lookup_id("1:4.mask-group").unwrap();
        assert_eq!(ids, vec![plain, first_group, second_group]);

        let group = objects.get(&first_group).unwrap();
        match &group.kind {
            ShapeKind::Group(attrs) => {
                assert_eq!(attrs.masked_group, Some(true));
                assert_eq!(
                    attrs.shapes,
                    vec![
                        mapping.lookup_id("1:2").unwrap(),
                        mapping.lookup_id("1:3").unwrap()
                    ]
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn hidden_mask_keeps_clipped_siblings() {
        let mut mask = rect_node("1:1", Rect::new(0.0, 0.0, 10.0, 10.0));
        mask.is_mask = true;
        mask.visible = false;
        let children = vec![mask, rect_node("1:2", Rect::new(0.0, 0.0, 10.0, 10.0))];
        let (objects, mapping, ids) = run(children, false);

        let sibling = mapping.lookup_id("1:2").unwrap();
        assert_eq!(ids, vec![sibling]);
        assert!(mapping.lookup_id("1:1.mask-group").is_err());
        assert_eq!(objects.len(), 2);
        assert_eq!(objects.get(&sibling).unwrap().base.parent_id, ROOT_FRAME_ID);
    }

    #[test]
    fn hidden_nodes_are_skipped_when_excluded() {
        let mut hidden = rect_node("1:1", Rect::new(0.0, 0.0, 10.0, 10.0));
        hidden.visible = false;
        let (objects, _, ids) = run(vec![hidden.clone()], false);
        assert!(ids.is_empty());
        assert_eq!(objects.len(), 1);

        let (objects, _, ids) = run(vec![hidden], true);
        assert_eq!(ids.len(), 1);
        assert!(objects.get(&ids[0]).unwrap().base.hidden);
    }

    #[test]
    fn unsupported_kinds_fail_with_node_id() {
        let mut widget = rect_node("7:7", Rect::new(0.0, 0.0, 1.0, 1.0));
        widget.kind = NodeKind::Unsupported("WIDGET".to_string());
        let file = source_file(vec![]);
        let catalogs = FontCatalogs::default();
        let cx = Context {
            file: &file,
            catalogs: &catalogs,
            include_hidden: true,
        };
        let mut mapping = IdMapping::new();
        let mut doc = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let mut page = doc.new_page(Uuid::now_v7());
        page.add_node(root_frame(vec![])).unwrap();
        let err = transform_node(&cx, &mut page, &widget, &root_parent()).unwrap_err();
        match err {
            ConvertError::UnsupportedNodeKind { node_id, kind } => {
                assert_eq!(node_id, "7:7");
                assert_eq!(kind, "WIDGET");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn children_of_frames_are_positioned_in_frame_space() {
        let mut rect = rect_node("2:1", Rect::new(110.0, 60.0, 10.0, 10.0));
        rect.relative_transform = Some([[1.0, 0.0, 10.0], [0.0, 1.0, 10.0]]);
        let mut frame = frame_node("1:1", Rect::new(100.0, 50.0, 50.0, 50.0), vec![rect]);
        frame.relative_transform = Some([[1.0, 0.0, 100.0], [0.0, 1.0, 50.0]]);
        let (objects, mapping, _) = run(vec![frame], true);

        let rect = objects.get(&mapping.lookup_id("2:1").unwrap()).unwrap();
        assert_eq!(rect.base.x, 110.0);
        assert_eq!(rect.base.rotation, 0.0);
    }
}
