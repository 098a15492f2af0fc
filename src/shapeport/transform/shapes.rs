//! Leaf shapes: rectangles, ellipses, vectors, lines, and boolean operations.

use crate::error::{ConvertError, Result};
use crate::geometry::{apply_transform, parse_path, PathSegment, Point, SourceTransform};
use crate::registry::Scope;
use crate::source::{GeometryPath, SourceNode};
use crate::target::{BoolAttrs, CircleAttrs, PathAttrs, RectAttrs, Shape, ShapeBase, ShapeKind};
use crate::translate::{apply_common, corner_radius};

use super::node_geometry;

fn base(
    scope: &mut dyn Scope,
    node: &SourceNode,
    transform: &SourceTransform,
    open_path: bool,
) -> Result<ShapeBase> {
    let geometry = node_geometry(node, transform)?;
    let mut base = ShapeBase::new(&node.name, &geometry);
    apply_common(scope, node, &mut base, transform, open_path);
    Ok(base)
}

/// Parses the node's geometry paths into document-space segments.
fn path_content(
    node: &SourceNode,
    paths: &[GeometryPath],
    transform: &SourceTransform,
) -> Result<Vec<PathSegment>> {
    let mut content = Vec::new();
    for path in paths {
        let segments = parse_path(&path.path, transform).map_err(|source| {
            ConvertError::InvalidPath {
                node_id: node.id.clone(),
                source,
            }
        })?;
        content.extend(segments);
    }
    Ok(content)
}

/// Fill geometry, or stroke geometry for stroke-only vectors.
fn vector_content(node: &SourceNode, transform: &SourceTransform) -> Result<Vec<PathSegment>> {
    if node.fill_geometry.is_empty() {
        path_content(node, &node.stroke_geometry, transform)
    } else {
        path_content(node, &node.fill_geometry, transform)
    }
}

pub fn rectangle(
    scope: &mut dyn Scope,
    node: &SourceNode,
    transform: &SourceTransform,
) -> Result<Shape> {
    let base = base(scope, node, transform, false)?;
    let mut shape = Shape::new(base, ShapeKind::Rect(RectAttrs::default()));
    if let Some(radius) = corner_radius(node) {
        shape.set_radius(radius);
    }
    Ok(shape)
}

/// Full ellipses become circles. Arcs and donuts have no target primitive and keep
/// their outline as a path.
pub fn ellipse(
    scope: &mut dyn Scope,
    node: &SourceNode,
    transform: &SourceTransform,
) -> Result<Shape> {
    let partial = node
        .arc_data
        .as_ref()
        .is_some_and(|arc| !arc.is_full_ellipse());
    if partial && !node.fill_geometry.is_empty() {
        return vector(scope, node, transform);
    }
    let base = base(scope, node, transform, false)?;
    Ok(Shape::new(base, ShapeKind::Circle(CircleAttrs {})))
}

/// Vectors, stars and polygons.
pub fn vector(
    scope: &mut dyn Scope,
    node: &SourceNode,
    transform: &SourceTransform,
) -> Result<Shape> {
    let content = vector_content(node, transform)?;
    let base = base(scope, node, transform, true)?;
    Ok(Shape::new(base, ShapeKind::Path(PathAttrs { content })))
}

/// A line is a zero-height node along its local x axis.
pub fn line(
    scope: &mut dyn Scope,
    node: &SourceNode,
    transform: &SourceTransform,
) -> Result<Shape> {
    let size = node.unrotated_size()?;
    let start = apply_transform(transform, Point::new(0.0, 0.0));
    let end = apply_transform(transform, Point::new(size.x, 0.0));
    let content = vec![
        PathSegment::MoveTo {
            x: start.x,
            y: start.y,
        },
        PathSegment::LineTo { x: end.x, y: end.y },
    ];
    let base = base(scope, node, transform, true)?;
    Ok(Shape::new(base, ShapeKind::Path(PathAttrs { content })))
}

fn bool_type(operation: Option<&str>) -> &'static str {
    match operation {
        Some("SUBTRACT") => "difference",
        Some("INTERSECT") => "intersection",
        Some("EXCLUDE") => "exclude",
        _ => "union",
    }
}

pub fn boolean(
    scope: &mut dyn Scope,
    node: &SourceNode,
    transform: &SourceTransform,
) -> Result<Shape> {
    let content = path_content(node, &node.fill_geometry, transform)?;
    let base = base(scope, node, transform, false)?;
    Ok(Shape::new(
        base,
        ShapeKind::Bool(BoolAttrs {
            shapes: Vec::new(),
            bool_type: bool_type(node.boolean_operation.as_deref()).to_string(),
            content,
        }),
    ))
}
