use crate::source::SourceNode;
use crate::target::ShapeBase;

pub fn visibility(node: &SourceNode, base: &mut ShapeBase) {
    base.hidden = !node.visible;
    base.blocked = node.locked;
    base.opacity = node.opacity.unwrap_or(1.0);
}

/// Frames show content outside their bounds unless the source clips it.
pub fn show_content(node: &SourceNode) -> bool {
    !node.clips_content.unwrap_or(false)
}
