//! Paint → fill translation, shared with strokes.
//!
//! Source paint lists are bottom-to-top, target fill lists top-to-bottom, so lists are
//! reversed. Invisible paints are dropped. Angular and diamond gradients have no target
//! equivalent and are approximated as radial. Video and emoji paints are logged and omitted.

use crate::geometry::{gradient_geometry, GradientKind, Point};
use crate::registry::Scope;
use crate::source::Paint;
use crate::target::{Fill, Gradient, GradientStop, ImageRef, MediaEntry};
use uuid::Uuid;

use super::color::bound_color;

/// A translated paint, before it is shaped into a fill or a stroke.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaintValue {
    pub color: Option<String>,
    pub opacity: Option<f64>,
    pub gradient: Option<Gradient>,
    pub image: Option<ImageRef>,
    pub ref_id: Option<Uuid>,
    pub ref_file: Option<Uuid>,
}

impl From<PaintValue> for Fill {
    fn from(value: PaintValue) -> Self {
        Fill {
            fill_color: value.color,
            fill_opacity: value.opacity,
            fill_color_gradient: value.gradient,
            fill_image: value.image,
            fill_color_ref_id: value.ref_id,
            fill_color_ref_file: value.ref_file,
        }
    }
}

fn gradient_kind(paint_kind: &str) -> Option<GradientKind> {
    match paint_kind {
        "GRADIENT_LINEAR" => Some(GradientKind::Linear),
        "GRADIENT_RADIAL" | "GRADIENT_ANGULAR" | "GRADIENT_DIAMOND" => Some(GradientKind::Radial),
        _ => None,
    }
}

pub fn translate_gradient(paint: &Paint, kind: GradientKind, size: Point) -> Gradient {
    let geometry = gradient_geometry(kind, &paint.gradient_handle_positions, size);
    let stops = paint
        .gradient_stops
        .iter()
        .map(|stop| GradientStop {
            color: stop.color.to_hex(),
            opacity: stop.color.a,
            offset: stop.position,
        })
        .collect();
    Gradient {
        kind: match kind {
            GradientKind::Linear => "linear".to_string(),
            GradientKind::Radial => "radial".to_string(),
        },
        start_x: geometry.start.x,
        start_y: geometry.start.y,
        end_x: geometry.end.x,
        end_y: geometry.end.y,
        width: match kind {
            GradientKind::Linear => 1.0,
            GradientKind::Radial => geometry.width_ratio(),
        },
        stops,
    }
}

/// Translates one paint. `size` is the node's unrotated size, used to place gradients
/// and to size image references. Returns `None` for paints with no target equivalent.
pub fn translate_paint(scope: &mut dyn Scope, paint: &Paint, size: Point) -> Option<PaintValue> {
    if !paint.visible {
        return None;
    }

    let mut value = PaintValue::default();
    match paint.kind.as_str() {
        "SOLID" => {
            let color = paint.color?;
            value.color = Some(color.to_hex());
            value.opacity = Some(paint.opacity * color.a);
            if let Some((ref_id, ref_file)) = bound_color(scope, paint) {
                value.ref_id = Some(ref_id);
                value.ref_file = Some(ref_file);
            }
        }
        "IMAGE" => {
            let Some(image_ref) = paint.image_ref.as_deref() else {
                log::warn!("image paint without an image reference, omitted");
                return None;
            };
            let id = scope.translate_media(image_ref);
            scope.add_media(MediaEntry {
                id,
                source_ref: image_ref.to_string(),
                width: size.x,
                height: size.y,
                mtype: "image/png".to_string(),
            });
            value.opacity = Some(paint.opacity);
            value.image = Some(ImageRef {
                id,
                width: size.x,
                height: size.y,
                mtype: "image/png".to_string(),
                name: None,
                keep_aspect_ratio: paint.scale_mode.as_deref() != Some("STRETCH"),
            });
        }
        other => match gradient_kind(other) {
            Some(kind) => {
                value.opacity = Some(paint.opacity);
                value.gradient = Some(translate_gradient(paint, kind, size));
            }
            None => {
                log::warn!("paint type {} has no target equivalent, omitted", other);
                return None;
            }
        },
    }
    Some(value)
}

pub fn translate_fills(scope: &mut dyn Scope, paints: &[Paint], size: Point) -> Vec<Fill> {
    paints
        .iter()
        .rev()
        .filter_map(|paint| translate_paint(scope, paint, size))
        .map(Fill::from)
        .collect()
}
