//! Auto layout: container flex attributes and per-child sizing.

use crate::source::SourceNode;
use crate::target::{FrameAttrs, LayoutGap, LayoutPadding, ShapeBase};

fn justify(value: Option<&str>) -> String {
    match value {
        Some("CENTER") => "center",
        Some("MAX") => "end",
        Some("SPACE_BETWEEN") => "space-between",
        _ => "start",
    }
    .to_string()
}

fn align(value: Option<&str>) -> String {
    match value {
        Some("CENTER") => "center",
        Some("MAX") => "end",
        _ => "start",
    }
    .to_string()
}

fn sizing(value: Option<&str>) -> Option<String> {
    let mapped = match value? {
        "FIXED" => "fix",
        "HUG" => "auto",
        "FILL" => "fill",
        _ => return None,
    };
    Some(mapped.to_string())
}

/// Flex attributes for an auto-layout container. Frames without a layout mode are left alone.
pub fn flex_layout(node: &SourceNode, attrs: &mut FrameAttrs) {
    let direction = match node.layout_mode.as_deref() {
        Some("HORIZONTAL") => "row",
        Some("VERTICAL") => "column",
        _ => return,
    };

    let item = node.item_spacing.unwrap_or(0.0);
    let counter = node.counter_axis_spacing.unwrap_or(0.0);
    let gap = if direction == "row" {
        LayoutGap {
            row_gap: counter,
            column_gap: item,
        }
    } else {
        LayoutGap {
            row_gap: item,
            column_gap: counter,
        }
    };

    let padding = LayoutPadding {
        p1: node.padding_top.unwrap_or(0.0),
        p2: node.padding_right.unwrap_or(0.0),
        p3: node.padding_bottom.unwrap_or(0.0),
        p4: node.padding_left.unwrap_or(0.0),
    };
    let padding_type = if padding.p1 == padding.p3 && padding.p2 == padding.p4 {
        "simple"
    } else {
        "multiple"
    };

    attrs.layout = Some("flex".to_string());
    attrs.layout_flex_dir = Some(direction.to_string());
    attrs.layout_wrap_type = Some(
        match node.layout_wrap.as_deref() {
            Some("WRAP") => "wrap",
            _ => "nowrap",
        }
        .to_string(),
    );
    attrs.layout_gap = Some(gap);
    attrs.layout_padding_type = Some(padding_type.to_string());
    attrs.layout_padding = Some(padding);
    attrs.layout_justify_content = Some(justify(node.primary_axis_align_items.as_deref()));
    attrs.layout_align_items = Some(align(node.counter_axis_align_items.as_deref()));
}

/// Sizing and positioning of a node inside an auto-layout parent.
pub fn layout_child(node: &SourceNode, base: &mut ShapeBase) {
    base.layout_item_h_sizing = sizing(node.layout_sizing_horizontal.as_deref());
    base.layout_item_v_sizing = sizing(node.layout_sizing_vertical.as_deref());
    if node.layout_positioning.as_deref() == Some("ABSOLUTE") {
        base.layout_item_absolute = Some(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, ShapeGeometry};
    use crate::source::NodeKind;

    #[test]
    fn row_layout_with_padding() {
        let mut node = SourceNode::new("1:1", "Row", NodeKind::Frame);
        node.layout_mode = Some("HORIZONTAL".to_string());
        node.item_spacing = Some(8.0);
        node.padding_top = Some(4.0);
        node.padding_bottom = Some(4.0);
        node.padding_left = Some(2.0);
        node.padding_right = Some(6.0);
        node.primary_axis_align_items = Some("SPACE_BETWEEN".to_string());
        node.counter_axis_align_items = Some("CENTER".to_string());

        let mut attrs = FrameAttrs::default();
        flex_layout(&node, &mut attrs);
        assert_eq!(attrs.layout.as_deref(), Some("flex"));
        assert_eq!(attrs.layout_flex_dir.as_deref(), Some("row"));
        assert_eq!(attrs.layout_gap.unwrap().column_gap, 8.0);
        assert_eq!(attrs.layout_padding_type.as_deref(), Some("multiple"));
        assert_eq!(attrs.layout_padding.unwrap().p4, 2.0);
        assert_eq!(attrs.layout_justify_content.as_deref(), Some("space-between"));
        assert_eq!(attrs.layout_align_items.as_deref(), Some("center"));
    }

    #[test]
    fn frames_without_layout_are_untouched() {
        let node = SourceNode::new("1:1", "Plain", NodeKind::Frame);
        let mut attrs = FrameAttrs::default();
        flex_layout(&node, &mut attrs);
        assert_eq!(attrs, FrameAttrs::default());
    }

    #[test]
    fn child_sizing() {
        let mut node = SourceNode::new("1:2", "Item", NodeKind::Rectangle);
        node.layout_sizing_horizontal = Some("FILL".to_string());
        node.layout_sizing_vertical = Some("HUG".to_string());
        node.layout_positioning = Some("ABSOLUTE".to_string());
        let mut base = ShapeBase::new(
            "Item",
            &ShapeGeometry::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0)),
        );
        layout_child(&node, &mut base);
        assert_eq!(base.layout_item_h_sizing.as_deref(), Some("fill"));
        assert_eq!(base.layout_item_v_sizing.as_deref(), Some("auto"));
        assert_eq!(base.layout_item_absolute, Some(true));
    }
}
