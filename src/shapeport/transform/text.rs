use crate::error::Result;
use crate::geometry::{Point, SourceTransform};
use crate::registry::Scope;
use crate::source::SourceNode;
use crate::target::{Shape, ShapeBase, ShapeKind, TextAttrs};
use crate::text::{grow_type, text_content};
use crate::translate::apply_common;

use super::{node_geometry, Context};

/// Text fills live on the content leaves, so the shape itself carries none.
pub fn text(
    cx: &Context,
    scope: &mut dyn Scope,
    node: &SourceNode,
    transform: &SourceTransform,
) -> Result<Shape> {
    let geometry = node_geometry(node, transform)?;
    let mut base = ShapeBase::new(&node.name, &geometry);
    apply_common(scope, node, &mut base, transform, false);
    base.fills.clear();

    let size = Point::new(base.width, base.height);
    let content = text_content(scope, cx.catalogs, node, size)?;
    let grow = grow_type(
        node.style
            .as_ref()
            .and_then(|style| style.text_auto_resize.as_deref()),
    );

    Ok(Shape::new(
        base,
        ShapeKind::Text(TextAttrs {
            content,
            grow_type: grow.to_string(),
        }),
    ))
}
