//! # Attribute Translators
//!
//! Each submodule maps one group of source attributes onto its target counterpart.
//! Translators are independent of each other and of the node kind; the node transformers
//! pick the ones that apply to the shape they build.
//!
//! [`apply_common`] runs the groups every shape kind shares.

use crate::geometry::{Point, SourceTransform};
use crate::registry::Scope;
use crate::source::SourceNode;
use crate::target::ShapeBase;

pub mod blend;
pub mod color;
pub mod constraint;
pub mod corner;
pub mod effect;
pub mod fill;
pub mod flip;
pub mod inheritance;
pub mod layout;
pub mod proportion;
pub mod stroke;
pub mod visibility;

pub use blend::blend_mode;
pub use color::{bound_color, split_path};
pub use constraint::constraints;
pub use corner::corner_radius;
pub use effect::translate_effects;
pub use fill::{translate_fills, translate_gradient, translate_paint, PaintValue};
pub use flip::flip_x;
pub use inheritance::{shape_ref, sync_group, touched};
pub use layout::{flex_layout, layout_child};
pub use proportion::proportion;
pub use stroke::{stroke_cap, translate_strokes};
pub use visibility::{show_content, visibility};

/// Fills, strokes, effects, blending, visibility, constraints, layout-child sizing,
/// proportion, flip and inheritance. `transform` is the node's absolute transform and
/// `open_path` enables line caps.
pub fn apply_common(
    scope: &mut dyn Scope,
    node: &SourceNode,
    base: &mut ShapeBase,
    transform: &SourceTransform,
    open_path: bool,
) {
    let size = Point::new(base.width, base.height);

    base.fills = translate_fills(scope, &node.fills, size);
    base.strokes = translate_strokes(scope, node, size, open_path);
    let (shadow, blur) = translate_effects(scope, node);
    base.shadow = shadow;
    base.blur = blur;
    base.blend_mode = blend_mode(node.blend_mode.as_deref());

    visibility(node, base);
    let (h, v) = constraints(node.constraints.as_ref());
    base.constraints_h = h;
    base.constraints_v = v;
    layout_child(node, base);
    proportion(node, base);
    base.flip_x = flip_x(transform);

    base.touched = touched(scope, node);
    base.shape_ref = shape_ref(scope, node);
}
