//! # Source Document Model
//!
//! Serde mirror of the source platform's file-read response. Only the fields the converter
//! reads are modelled; everything else in the payload is ignored on deserialization.
//!
//! Nodes keep a single struct shape with optional per-kind data, as the API does. The
//! `type` discriminant is parsed into [`NodeKind`] with a catch-all so that an unknown
//! kind still deserializes and is rejected by the transformer with its node id attached.

use crate::geometry::{Point, Rect, SourceTransform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod library;
pub mod paint;
pub mod style;

pub use library::{
    ComponentMeta, ComponentSetMeta, SourceLibraries, StyleMeta, TextStyle, Variable,
    VariableAlias, VariableCollection, VariableMode, VariableValue,
};
pub use paint::{Color, ColorStop, Effect, Paint, PaintBindings};
pub use style::TypeStyle;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Document,
    Canvas,
    Frame,
    Section,
    Group,
    Rectangle,
    Ellipse,
    BooleanOperation,
    Vector,
    Line,
    Star,
    RegularPolygon,
    Text,
    Component,
    ComponentSet,
    Instance,
    Unsupported(String),
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "DOCUMENT" => NodeKind::Document,
            "CANVAS" => NodeKind::Canvas,
            "FRAME" => NodeKind::Frame,
            "SECTION" => NodeKind::Section,
            "GROUP" => NodeKind::Group,
            "RECTANGLE" => NodeKind::Rectangle,
            "ELLIPSE" => NodeKind::Ellipse,
            "BOOLEAN_OPERATION" => NodeKind::BooleanOperation,
            "VECTOR" => NodeKind::Vector,
            "LINE" => NodeKind::Line,
            "STAR" => NodeKind::Star,
            "REGULAR_POLYGON" => NodeKind::RegularPolygon,
            "TEXT" => NodeKind::Text,
            "COMPONENT" => NodeKind::Component,
            "COMPONENT_SET" => NodeKind::ComponentSet,
            "INSTANCE" => NodeKind::Instance,
            _ => NodeKind::Unsupported(value),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Document => "DOCUMENT",
            NodeKind::Canvas => "CANVAS",
            NodeKind::Frame => "FRAME",
            NodeKind::Section => "SECTION",
            NodeKind::Group => "GROUP",
            NodeKind::Rectangle => "RECTANGLE",
            NodeKind::Ellipse => "ELLIPSE",
            NodeKind::BooleanOperation => "BOOLEAN_OPERATION",
            NodeKind::Vector => "VECTOR",
            NodeKind::Line => "LINE",
            NodeKind::Star => "STAR",
            NodeKind::RegularPolygon => "REGULAR_POLYGON",
            NodeKind::Text => "TEXT",
            NodeKind::Component => "COMPONENT",
            NodeKind::ComponentSet => "COMPONENT_SET",
            NodeKind::Instance => "INSTANCE",
            NodeKind::Unsupported(raw) => raw,
        }
    }

    /// Kinds whose children are positioned relative to the node itself. Groups and
    /// boolean operations do not establish a coordinate space.
    pub fn establishes_space(&self) -> bool {
        matches!(
            self,
            NodeKind::Frame
                | NodeKind::Section
                | NodeKind::Component
                | NodeKind::ComponentSet
                | NodeKind::Instance
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConstraint {
    pub vertical: String,
    pub horizontal: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryPath {
    pub path: String,
    #[serde(default)]
    pub winding_rule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceOverride {
    pub id: String,
    #[serde(default)]
    pub overridden_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentProperty {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcData {
    pub starting_angle: f64,
    pub ending_angle: f64,
    pub inner_radius: f64,
}

impl ArcData {
    pub fn is_full_ellipse(&self) -> bool {
        let sweep = (self.ending_angle - self.starting_angle).abs();
        self.inner_radius == 0.0 && (sweep - std::f64::consts::TAU).abs() < 1e-6
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub children: Vec<SourceNode>,

    // Placement
    #[serde(default)]
    pub absolute_bounding_box: Option<Rect>,
    #[serde(default)]
    pub relative_transform: Option<SourceTransform>,
    #[serde(default)]
    pub size: Option<Point>,
    #[serde(default)]
    pub constraints: Option<LayoutConstraint>,
    #[serde(default)]
    pub preserve_ratio: bool,

    // Appearance
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub blend_mode: Option<String>,
    #[serde(default)]
    pub is_mask: bool,
    #[serde(default)]
    pub fills: Vec<Paint>,
    #[serde(default)]
    pub strokes: Vec<Paint>,
    #[serde(default)]
    pub stroke_weight: Option<f64>,
    #[serde(default)]
    pub stroke_align: Option<String>,
    #[serde(default)]
    pub stroke_cap: Option<String>,
    #[serde(default)]
    pub stroke_dashes: Vec<f64>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub corner_radius: Option<f64>,
    #[serde(default)]
    pub rectangle_corner_radii: Option<[f64; 4]>,
    #[serde(default)]
    pub clips_content: Option<bool>,
    #[serde(default)]
    pub background_color: Option<Color>,
    #[serde(default)]
    pub styles: BTreeMap<String, String>,

    // Auto layout (container)
    #[serde(default)]
    pub layout_mode: Option<String>,
    #[serde(default)]
    pub layout_wrap: Option<String>,
    #[serde(default)]
    pub item_spacing: Option<f64>,
    #[serde(default)]
    pub counter_axis_spacing: Option<f64>,
    #[serde(default)]
    pub padding_left: Option<f64>,
    #[serde(default)]
    pub padding_right: Option<f64>,
    #[serde(default)]
    pub padding_top: Option<f64>,
    #[serde(default)]
    pub padding_bottom: Option<f64>,
    #[serde(default)]
    pub primary_axis_align_items: Option<String>,
    #[serde(default)]
    pub counter_axis_align_items: Option<String>,

    // Auto layout (child)
    #[serde(default)]
    pub layout_sizing_horizontal: Option<String>,
    #[serde(default)]
    pub layout_sizing_vertical: Option<String>,
    #[serde(default)]
    pub layout_positioning: Option<String>,

    // Vector data
    #[serde(default)]
    pub fill_geometry: Vec<GeometryPath>,
    #[serde(default)]
    pub stroke_geometry: Vec<GeometryPath>,
    #[serde(default)]
    pub boolean_operation: Option<String>,
    #[serde(default)]
    pub arc_data: Option<ArcData>,

    // Text
    #[serde(default)]
    pub characters: Option<String>,
    #[serde(default)]
    pub style: Option<TypeStyle>,
    #[serde(default)]
    pub character_style_overrides: Vec<usize>,
    #[serde(default)]
    pub style_override_table: BTreeMap<String, TypeStyle>,

    // Components
    #[serde(default)]
    pub component_id: Option<String>,
    #[serde(default)]
    pub component_properties: BTreeMap<String, ComponentProperty>,
    #[serde(default)]
    pub component_property_references: BTreeMap<String, String>,
    #[serde(default)]
    pub overrides: Vec<InstanceOverride>,
}

impl SourceNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            visible: true,
            locked: false,
            children: Vec::new(),
            absolute_bounding_box: None,
            relative_transform: None,
            size: None,
            constraints: None,
            preserve_ratio: false,
            opacity: None,
            blend_mode: None,
            is_mask: false,
            fills: Vec::new(),
            strokes: Vec::new(),
            stroke_weight: None,
            stroke_align: None,
            stroke_cap: None,
            stroke_dashes: Vec::new(),
            effects: Vec::new(),
            corner_radius: None,
            rectangle_corner_radii: None,
            clips_content: None,
            background_color: None,
            styles: BTreeMap::new(),
            layout_mode: None,
            layout_wrap: None,
            item_spacing: None,
            counter_axis_spacing: None,
            padding_left: None,
            padding_right: None,
            padding_top: None,
            padding_bottom: None,
            primary_axis_align_items: None,
            counter_axis_align_items: None,
            layout_sizing_horizontal: None,
            layout_sizing_vertical: None,
            layout_positioning: None,
            fill_geometry: Vec::new(),
            stroke_geometry: Vec::new(),
            boolean_operation: None,
            arc_data: None,
            characters: None,
            style: None,
            character_style_overrides: Vec::new(),
            style_override_table: BTreeMap::new(),
            component_id: None,
            component_properties: BTreeMap::new(),
            component_property_references: BTreeMap::new(),
            overrides: Vec::new(),
        }
    }

    pub fn bounding_box(&self) -> crate::error::Result<Rect> {
        self.absolute_bounding_box
            .ok_or_else(|| crate::error::ConvertError::missing(&self.id, "absoluteBoundingBox"))
    }

    /// Unrotated size, falling back to the bounding box for kinds that omit it.
    pub fn unrotated_size(&self) -> crate::error::Result<Point> {
        match (self.size, self.absolute_bounding_box) {
            (Some(size), _) => Ok(size),
            (None, Some(bbox)) => Ok(Point::new(bbox.width, bbox.height)),
            (None, None) => Err(crate::error::ConvertError::missing(&self.id, "size")),
        }
    }

    pub fn transform(&self) -> SourceTransform {
        self.relative_transform
            .unwrap_or(crate::geometry::IDENTITY_TRANSFORM)
    }

    /// Id of the definition-side node this instance descendant mirrors, i.e. the last
    /// `;`-separated segment of an instance-scoped id like `I1:2;3:4`.
    pub fn definition_id(&self) -> Option<&str> {
        if !self.id.starts_with('I') {
            return None;
        }
        self.id.rsplit(';').next()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub name: String,
    pub document: SourceNode,
    #[serde(default)]
    pub components: BTreeMap<String, ComponentMeta>,
    #[serde(default)]
    pub component_sets: BTreeMap<String, ComponentSetMeta>,
    #[serde(default)]
    pub styles: BTreeMap<String, StyleMeta>,
}

impl SourceFile {
    pub fn pages(&self) -> impl Iterator<Item = &SourceNode> {
        self.document
            .children
            .iter()
            .filter(|node| node.kind == NodeKind::Canvas)
    }
}
