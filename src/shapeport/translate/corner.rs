use crate::source::SourceNode;

/// Corner radii as `[r1, r2, r3, r4]` (top-left, top-right, bottom-right, bottom-left).
pub fn corner_radius(node: &SourceNode) -> Option<[f64; 4]> {
    match (node.rectangle_corner_radii, node.corner_radius) {
        (Some(radii), _) => Some(radii),
        (None, Some(radius)) => Some([radius; 4]),
        (None, None) => None,
    }
}
