use crate::error::Result;
use crate::geometry::SourceTransform;
use crate::registry::Scope;
use crate::source::SourceNode;
use crate::target::{FrameAttrs, Shape, ShapeBase, ShapeKind};
use crate::translate::{apply_common, corner_radius, flex_layout, show_content};

use super::node_geometry;

/// Frames and sections. Also the starting point for components and instances.
pub fn frame(
    scope: &mut dyn Scope,
    node: &SourceNode,
    transform: &SourceTransform,
) -> Result<Shape> {
    let geometry = node_geometry(node, transform)?;
    let mut base = ShapeBase::new(&node.name, &geometry);
    apply_common(scope, node, &mut base, transform, false);

    let mut attrs = FrameAttrs {
        show_content: show_content(node),
        ..FrameAttrs::default()
    };
    flex_layout(node, &mut attrs);

    let mut shape = Shape::new(base, ShapeKind::Frame(attrs));
    if let Some(radius) = corner_radius(node) {
        shape.set_radius(radius);
    }
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::mapping::IdMapping;
    use crate::registry::DocumentScope;
    use crate::test_utils::frame_node;
    use uuid::Uuid;

    #[test]
    fn clipping_auto_layout_frame() {
        let mut node = frame_node("1:1", Rect::new(0.0, 0.0, 200.0, 80.0), vec![]);
        node.clips_content = Some(true);
        node.layout_mode = Some("VERTICAL".to_string());
        node.corner_radius = Some(12.0);

        let mut mapping = IdMapping::new();
        let mut scope = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let shape = frame(&mut scope, &node, &node.transform()).unwrap();
        match shape.kind {
            ShapeKind::Frame(attrs) => {
                assert!(!attrs.show_content);
                assert_eq!(attrs.layout_flex_dir.as_deref(), Some("column"));
                assert_eq!(attrs.r4, Some(12.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
