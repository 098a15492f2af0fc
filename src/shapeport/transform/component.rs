//! Components, component sets and instances.
//!
//! All three are frames on the target. These transformers run the frame transformer and
//! then add the component linkage: which library component a shape belongs to, whether it
//! is the main shape of that component, and whether it roots a component subtree.
//!
//! An instance whose component is remote or missing from the library keeps its content
//! but is linked to the nil component in the nil file, the target's "unlinked" marker.

use crate::error::Result;
use crate::geometry::SourceTransform;
use crate::registry::Scope;
use crate::source::SourceNode;
use crate::target::{Shape, ShapeKind};
use uuid::Uuid;

use super::{frame, Context};

/// Library id of the component defined by the source node `node_id`, if the file
/// defines it locally.
pub fn library_component_id(cx: &Context, scope: &mut dyn Scope, node_id: &str) -> Option<Uuid> {
    let meta = cx.file.components.get(node_id)?;
    if meta.remote {
        return None;
    }
    let id = scope.translate_id(&meta.key);
    scope.component(&id).map(|_| id)
}

pub fn component(
    cx: &Context,
    scope: &mut dyn Scope,
    node: &SourceNode,
    transform: &SourceTransform,
) -> Result<Shape> {
    let mut shape = frame::frame(scope, node, transform)?;
    shape.base.component_id = library_component_id(cx, scope, &node.id);
    if shape.base.component_id.is_none() {
        log::warn!("component {} has no library entry", node.id);
    }
    shape.base.component_root = Some(true);
    shape.base.main_instance = Some(true);
    shape.base.component_file = Some(scope.file_id());
    Ok(shape)
}

pub fn component_set(
    scope: &mut dyn Scope,
    node: &SourceNode,
    transform: &SourceTransform,
) -> Result<Shape> {
    let mut shape = frame::frame(scope, node, transform)?;
    if let ShapeKind::Frame(attrs) = &mut shape.kind {
        attrs.is_variant_container = Some(true);
    }
    Ok(shape)
}

pub fn instance(
    cx: &Context,
    scope: &mut dyn Scope,
    node: &SourceNode,
    transform: &SourceTransform,
) -> Result<Shape> {
    let mut shape = frame::frame(scope, node, transform)?;
    let nested = scope.in_component();

    let linked = node
        .component_id
        .as_deref()
        .and_then(|component_node| {
            library_component_id(cx, scope, component_node).map(|id| (component_node, id))
        });

    match linked {
        Some((component_node, id)) => {
            shape.base.component_id = Some(id);
            shape.base.component_file = Some(scope.file_id());
            if shape.base.shape_ref.is_none() {
                shape.base.shape_ref = Some(scope.translate_id(component_node));
            }
        }
        None => {
            log::warn!(
                "instance {} references component {:?} which is not in this file, unlinked",
                node.id,
                node.component_id
            );
            shape.base.component_id = Some(Uuid::nil());
            shape.base.component_file = Some(Uuid::nil());
        }
    }
    shape.base.component_root = Some(!nested);
    Ok(shape)
}
