use crate::geometry::Point;
use serde::{Deserialize, Serialize};

use super::library::VariableAlias;

/// RGBA, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl Color {
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb`, lowercase, alpha dropped.
    pub fn to_hex(&self) -> String {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintBindings {
    #[serde(default)]
    pub color: Option<VariableAlias>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "opaque")]
    pub opacity: f64,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub blend_mode: Option<String>,
    #[serde(default)]
    pub gradient_handle_positions: Vec<Point>,
    #[serde(default)]
    pub gradient_stops: Vec<ColorStop>,
    #[serde(default)]
    pub scale_mode: Option<String>,
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub bound_variables: PaintBindings,
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Self {
            kind: "SOLID".to_string(),
            visible: true,
            opacity: 1.0,
            color: Some(color),
            blend_mode: None,
            gradient_handle_positions: Vec::new(),
            gradient_stops: Vec::new(),
            scale_mode: None,
            image_ref: None,
            bound_variables: PaintBindings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub offset: Option<Point>,
    #[serde(default)]
    pub spread: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_rounds_and_clamps() {
        assert_eq!(Color::rgba(1.0, 0.0, 0.5, 1.0).to_hex(), "#ff0080");
        assert_eq!(Color::rgba(1.2, -0.1, 0.0, 1.0).to_hex(), "#ff0000");
    }

    #[test]
    fn paint_defaults() {
        let paint: Paint = serde_json::from_str(r#"{"type": "SOLID"}"#).unwrap();
        assert!(paint.visible);
        assert_eq!(paint.opacity, 1.0);
        assert!(paint.bound_variables.color.is_none());
    }
}
