use serde::{Deserialize, Serialize};

use super::paint::Paint;

/// Character style. Every field is optional so that per-run override entries, which only
/// carry what they change, use the same type as the node's base style.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_post_script_name: Option<String>,
    #[serde(default)]
    pub font_weight: Option<f64>,
    #[serde(default)]
    pub italic: Option<bool>,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub text_case: Option<String>,
    #[serde(default)]
    pub text_decoration: Option<String>,
    #[serde(default)]
    pub text_auto_resize: Option<String>,
    #[serde(default)]
    pub text_align_horizontal: Option<String>,
    #[serde(default)]
    pub text_align_vertical: Option<String>,
    #[serde(default)]
    pub letter_spacing: Option<f64>,
    #[serde(default)]
    pub line_height_px: Option<f64>,
    #[serde(default)]
    pub line_height_percent_font_size: Option<f64>,
    #[serde(default)]
    pub line_height_unit: Option<String>,
    #[serde(default)]
    pub fills: Option<Vec<Paint>>,
}

impl TypeStyle {
    /// Layers `over` on top of `self`: every field `over` sets wins.
    pub fn merged_with(&self, over: &TypeStyle) -> TypeStyle {
        macro_rules! pick {
            ($field:ident) => {
                over.$field.clone().or_else(|| self.$field.clone())
            };
        }
        TypeStyle {
            font_family: pick!(font_family),
            font_post_script_name: pick!(font_post_script_name),
            font_weight: pick!(font_weight),
            italic: pick!(italic),
            font_size: pick!(font_size),
            text_case: pick!(text_case),
            text_decoration: pick!(text_decoration),
            text_auto_resize: pick!(text_auto_resize),
            text_align_horizontal: pick!(text_align_horizontal),
            text_align_vertical: pick!(text_align_vertical),
            letter_spacing: pick!(letter_spacing),
            line_height_px: pick!(line_height_px),
            line_height_percent_font_size: pick!(line_height_percent_font_size),
            line_height_unit: pick!(line_height_unit),
            fills: pick!(fills),
        }
    }

    pub fn is_italic(&self) -> bool {
        self.italic.unwrap_or(false)
    }

    pub fn weight(&self) -> u32 {
        self.font_weight.map(|w| w.round() as u32).unwrap_or(400)
    }
}
