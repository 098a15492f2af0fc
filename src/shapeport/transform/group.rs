use crate::error::Result;
use crate::geometry::SourceTransform;
use crate::registry::Scope;
use crate::source::SourceNode;
use crate::target::{GroupAttrs, Shape, ShapeBase, ShapeKind};
use crate::translate::apply_common;

use super::node_geometry;

pub fn group(
    scope: &mut dyn Scope,
    node: &SourceNode,
    transform: &SourceTransform,
) -> Result<Shape> {
    let geometry = node_geometry(node, transform)?;
    let mut base = ShapeBase::new(&node.name, &geometry);
    apply_common(scope, node, &mut base, transform, false);
    Ok(Shape::new(base, ShapeKind::Group(GroupAttrs::default())))
}
