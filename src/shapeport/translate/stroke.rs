use crate::geometry::Point;
use crate::registry::Scope;
use crate::source::SourceNode;
use crate::target::Stroke;

use super::fill::translate_paint;

fn alignment(align: Option<&str>) -> &'static str {
    match align {
        Some("INSIDE") => "inner",
        Some("OUTSIDE") => "outer",
        _ => "center",
    }
}

/// Target cap for a source stroke cap. Arrowheads and markers only exist on open paths.
pub fn stroke_cap(cap: Option<&str>) -> Option<String> {
    let cap = match cap? {
        "ROUND" => "round",
        "SQUARE" => "square",
        "LINE_ARROW" | "ARROW_LINES" => "line-arrow",
        "TRIANGLE_ARROW" | "TRIANGLE_FILLED" | "ARROW_EQUILATERAL" => "triangle-arrow",
        "DIAMOND_FILLED" => "diamond-marker",
        "CIRCLE_FILLED" => "circle-marker",
        _ => return None,
    };
    Some(cap.to_string())
}

pub fn translate_strokes(
    scope: &mut dyn Scope,
    node: &SourceNode,
    size: Point,
    open_path: bool,
) -> Vec<Stroke> {
    let style = if node.stroke_dashes.is_empty() {
        "solid"
    } else {
        "dashed"
    };
    let cap = if open_path {
        stroke_cap(node.stroke_cap.as_deref())
    } else {
        None
    };

    node.strokes
        .iter()
        .rev()
        .filter_map(|paint| translate_paint(scope, paint, size))
        .map(|value| Stroke {
            stroke_color: value.color,
            stroke_opacity: value.opacity,
            stroke_color_gradient: value.gradient,
            stroke_image: value.image,
            stroke_color_ref_id: value.ref_id,
            stroke_color_ref_file: value.ref_file,
            stroke_style: style.to_string(),
            stroke_alignment: alignment(node.stroke_align.as_deref()).to_string(),
            stroke_width: node.stroke_weight.unwrap_or(1.0),
            stroke_cap_start: cap.clone(),
            stroke_cap_end: cap.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::IdMapping;
    use crate::registry::DocumentScope;
    use crate::source::{Color, NodeKind, Paint};
    use uuid::Uuid;

    fn stroked(kind: NodeKind) -> SourceNode {
        let mut node = SourceNode::new("1:1", "Line", kind);
        node.strokes = vec![Paint::solid(Color::rgba(0.0, 0.0, 0.0, 1.0))];
        node.stroke_weight = Some(2.0);
        node.stroke_align = Some("INSIDE".to_string());
        node.stroke_cap = Some("LINE_ARROW".to_string());
        node.stroke_dashes = vec![4.0, 2.0];
        node
    }

    #[test]
    fn dashed_inner_stroke_with_arrows() {
        let mut mapping = IdMapping::new();
        let mut scope = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let node = stroked(NodeKind::Line);
        let strokes = translate_strokes(&mut scope, &node, Point::new(10.0, 0.0), true);
        assert_eq!(strokes.len(), 1);
        let stroke = &strokes[0];
        assert_eq!(stroke.stroke_style, "dashed");
        assert_eq!(stroke.stroke_alignment, "inner");
        assert_eq!(stroke.stroke_width, 2.0);
        assert_eq!(stroke.stroke_cap_end.as_deref(), Some("line-arrow"));
    }

    #[test]
    fn closed_shapes_have_no_caps() {
        let mut mapping = IdMapping::new();
        let mut scope = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let node = stroked(NodeKind::Rectangle);
        let strokes = translate_strokes(&mut scope, &node, Point::new(10.0, 10.0), false);
        assert_eq!(strokes[0].stroke_cap_start, None);
    }

    #[test]
    fn plain_caps_map_through() {
        assert_eq!(stroke_cap(Some("ROUND")).as_deref(), Some("round"));
        assert_eq!(stroke_cap(Some("NONE")), None);
        assert_eq!(stroke_cap(None), None);
    }
}
