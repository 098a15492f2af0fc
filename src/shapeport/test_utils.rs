//! Source node builders for tests. Nodes are unrotated and placed through their bounding
//! box, the way the source API reports top-level layers.

use crate::geometry::{Point, Rect};
use crate::source::{NodeKind, SourceFile, SourceNode, TypeStyle};
use std::collections::BTreeMap;

fn placed(id: &str, name: &str, kind: NodeKind, rect: Rect) -> SourceNode {
    let mut node = SourceNode::new(id, name, kind);
    node.absolute_bounding_box = Some(rect);
    node.size = Some(Point::new(rect.width, rect.height));
    node.relative_transform = Some([[1.0, 0.0, rect.x], [0.0, 1.0, rect.y]]);
    node
}

pub fn rect_node(id: &str, rect: Rect) -> SourceNode {
    placed(id, "Rectangle", NodeKind::Rectangle, rect)
}

pub fn frame_node(id: &str, rect: Rect, children: Vec<SourceNode>) -> SourceNode {
    let mut node = placed(id, "Frame", NodeKind::Frame, rect);
    node.children = children;
    node
}

/// A group sized to the union of its children.
pub fn group_node(id: &str, children: Vec<SourceNode>) -> SourceNode {
    let bounds = children
        .iter()
        .filter_map(|child| child.absolute_bounding_box)
        .reduce(|acc, rect| acc.union(&rect))
        .unwrap_or_default();
    let mut node = placed(id, "Group", NodeKind::Group, bounds);
    node.children = children;
    node
}

/// A text node styled with 16px Inter Regular.
pub fn text_node(id: &str, rect: Rect, characters: &str) -> SourceNode {
    let mut node = placed(id, characters, NodeKind::Text, rect);
    node.characters = Some(characters.to_string());
    node.style = Some(TypeStyle {
        font_family: Some("Inter".to_string()),
        font_post_script_name: Some("Inter-Regular".to_string()),
        font_size: Some(16.0),
        ..Default::default()
    });
    node
}

pub fn canvas(id: &str, name: &str, children: Vec<SourceNode>) -> SourceNode {
    let mut node = SourceNode::new(id, name, NodeKind::Canvas);
    node.children = children;
    node
}

/// A file with document `0:0` and a single page `0:1` named "Page 1".
pub fn source_file(children: Vec<SourceNode>) -> SourceFile {
    let mut document = SourceNode::new("0:0", "Document", NodeKind::Document);
    document.children = vec![canvas("0:1", "Page 1", children)];
    SourceFile {
        name: "Test File".to_string(),
        document,
        components: BTreeMap::new(),
        component_sets: BTreeMap::new(),
        styles: BTreeMap::new(),
    }
}
