use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::shape::Fill;

/// Character attributes shared by paragraphs and leaves. Numeric values are strings,
/// as the target platform stores them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TextStyleAttrs {
    pub font_id: String,
    pub font_family: String,
    pub font_variant_id: String,
    pub font_size: String,
    pub font_weight: String,
    pub font_style: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(default)]
    pub letter_spacing: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<String>,
    #[serde(default)]
    pub fills: Vec<Fill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography_ref_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography_ref_file: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLeaf {
    pub text: String,
    #[serde(flatten)]
    pub style: TextStyleAttrs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Paragraph {
    #[serde(rename = "type")]
    pub kind: String,
    pub text_align: String,
    #[serde(flatten)]
    pub style: TextStyleAttrs,
    pub children: Vec<TextLeaf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphSet {
    #[serde(rename = "type")]
    pub kind: String,
    pub children: Vec<Paragraph>,
}

/// Root of a text shape's content tree: root → paragraph-set → paragraph → leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub vertical_align: String,
    pub children: Vec<ParagraphSet>,
}

impl TextContent {
    pub fn new(vertical_align: impl Into<String>, paragraphs: Vec<Paragraph>) -> Self {
        Self {
            kind: "root".to_string(),
            vertical_align: vertical_align.into(),
            children: vec![ParagraphSet {
                kind: "paragraph-set".to_string(),
                children: paragraphs,
            }],
        }
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.children.iter().flat_map(|set| set.children.iter())
    }

    /// Concatenated leaf text, paragraphs joined by newlines.
    pub fn plain_text(&self) -> String {
        self.paragraphs()
            .map(|p| p.children.iter().map(|l| l.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Paragraph {
    pub fn new(
        text_align: impl Into<String>,
        style: TextStyleAttrs,
        leaves: Vec<TextLeaf>,
    ) -> Self {
        Self {
            kind: "paragraph".to_string(),
            text_align: text_align.into(),
            style,
            children: leaves,
        }
    }
}

/// Formats a number the way the target platform writes text attributes: no trailing
/// `.0` on integral values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.4}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(text: &str) -> TextLeaf {
        TextLeaf {
            text: text.to_string(),
            style: TextStyleAttrs::default(),
        }
    }

    #[test]
    fn plain_text_joins_paragraphs() {
        let content = TextContent::new(
            "top",
            vec![
                Paragraph::new(
                    "left",
                    TextStyleAttrs::default(),
                    vec![leaf("Hello "), leaf("you")],
                ),
                Paragraph::new("left", TextStyleAttrs::default(), vec![leaf("there")]),
            ],
        );
        assert_eq!(content.plain_text(), "Hello you\nthere");
    }

    #[test]
    fn serializes_nested_types() {
        let content = TextContent::new("center", vec![]);
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["type"], "root");
        assert_eq!(json["vertical-align"], "center");
        assert_eq!(json["children"][0]["type"], "paragraph-set");
    }

    #[test]
    fn numbers_drop_trailing_zeros() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(0.125), "0.125");
        assert_eq!(format_number(-2.0), "-2");
    }
}
