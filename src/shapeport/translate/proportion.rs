use crate::source::SourceNode;
use crate::target::ShapeBase;

pub fn proportion(node: &SourceNode, base: &mut ShapeBase) {
    base.proportion = if base.height > 0.0 {
        base.width / base.height
    } else {
        1.0
    };
    base.proportion_lock = node.preserve_ratio;
}
