use crate::geometry::{Matrix, PathSegment, Point, SelRect, ShapeGeometry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::text::TextContent;

fn one() -> f64 {
    1.0
}

fn normal() -> String {
    "normal".to_string()
}

fn is_false(v: &bool) -> bool {
    !*v
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GradientStop {
    pub color: String,
    pub opacity: f64,
    pub offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Gradient {
    #[serde(rename = "type")]
    pub kind: String,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub width: f64,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImageRef {
    pub id: Uuid,
    pub width: f64,
    pub height: f64,
    pub mtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub keep_aspect_ratio: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Fill {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color_gradient: Option<Gradient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_image: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color_ref_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color_ref_file: Option<Uuid>,
}

impl Fill {
    pub fn solid(color: impl Into<String>, opacity: f64) -> Self {
        Self {
            fill_color: Some(color.into()),
            fill_opacity: Some(opacity),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Stroke {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color_gradient: Option<Gradient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_image: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color_ref_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color_ref_file: Option<Uuid>,
    pub stroke_style: String,
    pub stroke_alignment: String,
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_cap_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_cap_end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ShadowColor {
    pub color: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Shadow {
    pub id: Uuid,
    pub style: String,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    pub hidden: bool,
    pub color: ShadowColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Blur {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: f64,
    pub hidden: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayoutGap {
    pub row_gap: f64,
    pub column_gap: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPadding {
    pub p1: f64,
    pub p2: f64,
    pub p3: f64,
    pub p4: f64,
}

/// Attributes every target shape carries, whatever its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ShapeBase {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Uuid,
    pub frame_id: Uuid,

    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    pub selrect: SelRect,
    pub points: [Point; 4],
    #[serde(default)]
    pub transform: Matrix,
    #[serde(default)]
    pub transform_inverse: Matrix,

    #[serde(default)]
    pub fills: Vec<Fill>,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shadow: Vec<Shadow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<Blur>,

    #[serde(default = "one")]
    pub opacity: f64,
    #[serde(default = "normal")]
    pub blend_mode: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub blocked: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints_h: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints_v: Option<String>,
    #[serde(default = "one")]
    pub proportion: f64,
    #[serde(default)]
    pub proportion_lock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip_x: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip_y: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_item_h_sizing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_item_v_sizing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_item_absolute: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_file: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_root: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_instance: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_ref: Option<Uuid>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub touched: BTreeSet<String>,
}

impl ShapeBase {
    /// A base with placement filled in and ids left nil for the caller to assign.
    pub fn new(name: impl Into<String>, geometry: &ShapeGeometry) -> Self {
        Self {
            id: Uuid::nil(),
            name: name.into(),
            parent_id: Uuid::nil(),
            frame_id: Uuid::nil(),
            x: geometry.x,
            y: geometry.y,
            width: geometry.width,
            height: geometry.height,
            rotation: geometry.rotation,
            selrect: geometry.selrect,
            points: geometry.points,
            transform: geometry.transform,
            transform_inverse: geometry.transform_inverse,
            fills: Vec::new(),
            strokes: Vec::new(),
            shadow: Vec::new(),
            blur: None,
            opacity: 1.0,
            blend_mode: normal(),
            hidden: false,
            blocked: false,
            constraints_h: None,
            constraints_v: None,
            proportion: 1.0,
            proportion_lock: false,
            flip_x: None,
            flip_y: None,
            layout_item_h_sizing: None,
            layout_item_v_sizing: None,
            layout_item_absolute: None,
            component_id: None,
            component_file: None,
            component_root: None,
            main_instance: None,
            shape_ref: None,
            touched: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FrameAttrs {
    #[serde(default)]
    pub shapes: Vec<Uuid>,
    #[serde(default)]
    pub show_content: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r4: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_flex_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_wrap_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_gap: Option<LayoutGap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_padding_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_padding: Option<LayoutPadding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_justify_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_align_items: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_variant_container: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupAttrs {
    #[serde(default)]
    pub shapes: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masked_group: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BoolAttrs {
    #[serde(default)]
    pub shapes: Vec<Uuid>,
    pub bool_type: String,
    #[serde(default)]
    pub content: Vec<PathSegment>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RectAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r4: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CircleAttrs {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathAttrs {
    #[serde(default)]
    pub content: Vec<PathSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TextAttrs {
    pub content: TextContent,
    pub grow_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ShapeKind {
    Frame(FrameAttrs),
    Group(GroupAttrs),
    Bool(BoolAttrs),
    Rect(RectAttrs),
    Circle(CircleAttrs),
    Path(PathAttrs),
    Text(TextAttrs),
}

impl ShapeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ShapeKind::Frame(_) => "frame",
            ShapeKind::Group(_) => "group",
            ShapeKind::Bool(_) => "bool",
            ShapeKind::Rect(_) => "rect",
            ShapeKind::Circle(_) => "circle",
            ShapeKind::Path(_) => "path",
            ShapeKind::Text(_) => "text",
        }
    }
}

/// One object of a page's object table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(flatten)]
    pub base: ShapeBase,
    #[serde(flatten)]
    pub kind: ShapeKind,
}

impl Shape {
    pub fn new(base: ShapeBase, kind: ShapeKind) -> Self {
        Self { base, kind }
    }

    pub fn id(&self) -> Uuid {
        self.base.id
    }

    /// Child ids for container kinds.
    pub fn shapes(&self) -> Option<&[Uuid]> {
        match &self.kind {
            ShapeKind::Frame(attrs) => Some(&attrs.shapes),
            ShapeKind::Group(attrs) => Some(&attrs.shapes),
            ShapeKind::Bool(attrs) => Some(&attrs.shapes),
            _ => None,
        }
    }

    pub fn shapes_mut(&mut self) -> Option<&mut Vec<Uuid>> {
        match &mut self.kind {
            ShapeKind::Frame(attrs) => Some(&mut attrs.shapes),
            ShapeKind::Group(attrs) => Some(&mut attrs.shapes),
            ShapeKind::Bool(attrs) => Some(&mut attrs.shapes),
            _ => None,
        }
    }

    pub fn is_frame(&self) -> bool {
        matches!(self.kind, ShapeKind::Frame(_))
    }

    /// Applies a corner radius to the kinds that support one.
    pub fn set_radius(&mut self, radius: [f64; 4]) {
        let [r1, r2, r3, r4] = radius.map(Some);
        match &mut self.kind {
            ShapeKind::Frame(attrs) => {
                (attrs.r1, attrs.r2, attrs.r3, attrs.r4) = (r1, r2, r3, r4);
            }
            ShapeKind::Rect(attrs) => {
                (attrs.r1, attrs.r2, attrs.r3, attrs.r4) = (r1, r2, r3, r4);
            }
            _ => {}
        }
    }
}
