//! # Text & Fonts
//!
//! A source text node is one string plus a per-character list of style override indices
//! (UTF-16 positions) into an override table. The target wants a tree of paragraphs, each
//! holding leaves of uniformly styled text.
//!
//! [`segment`] walks the characters once:
//!
//! - a new leaf starts whenever the override index changes
//! - a `\n` ends the paragraph (the newline itself is not kept)
//! - U+2028 (line separator) is written as `\n` inside the leaf and does not end the
//!   paragraph
//!
//! Each leaf's style is the node style with the override merged on top, except that an
//! `italic` override is dropped when it comes with a different PostScript name than the
//! base: the substituted font file already is the italic, and keeping the flag would
//! italicize it twice.

use crate::error::Result;
use crate::geometry::Point;
use crate::registry::Scope;
use crate::source::{SourceNode, TypeStyle};
use crate::target::text::format_number;
use crate::target::{Paragraph, TextContent, TextLeaf, TextStyleAttrs};
use crate::translate::translate_fills;
use std::collections::BTreeMap;
use uuid::Uuid;

pub mod font;
pub mod typography;

pub use font::{resolve_font, FontCatalogs, FontSource, ResolvedFont};
pub use typography::translate_typographies;

const LINE_SEPARATOR: char = '\u{2028}';

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub style_index: usize,
    pub style: TypeStyle,
}

/// Merges an override entry onto the base style.
pub fn merge_style(base: &TypeStyle, over: &TypeStyle) -> TypeStyle {
    let mut merged = base.merged_with(over);
    let substituted = over.font_post_script_name.is_some()
        && over.font_post_script_name != base.font_post_script_name;
    if over.italic.is_some() && substituted {
        merged.italic = base.italic;
    }
    merged
}

fn style_for(base: &TypeStyle, table: &BTreeMap<String, TypeStyle>, index: usize) -> TypeStyle {
    if index == 0 {
        return base.clone();
    }
    match table.get(&index.to_string()) {
        Some(over) => merge_style(base, over),
        None => base.clone(),
    }
}

/// Splits text into paragraphs of styled segments. Every paragraph has at least one
/// segment, possibly empty.
pub fn segment(
    characters: &str,
    overrides: &[usize],
    table: &BTreeMap<String, TypeStyle>,
    base: &TypeStyle,
) -> Vec<Vec<Segment>> {
    let mut paragraphs: Vec<Vec<Segment>> = Vec::new();
    let mut current: Vec<Segment> = Vec::new();
    let mut position = 0usize;

    for c in characters.chars() {
        let index = overrides.get(position).copied().unwrap_or(0);
        position += c.len_utf16();

        if c == '\n' {
            if current.is_empty() {
                current.push(Segment {
                    text: String::new(),
                    style_index: index,
                    style: style_for(base, table, index),
                });
            }
            paragraphs.push(std::mem::take(&mut current));
            continue;
        }

        let needs_new = current
            .last()
            .map_or(true, |segment| segment.style_index != index);
        if needs_new {
            current.push(Segment {
                text: String::new(),
                style_index: index,
                style: style_for(base, table, index),
            });
        }
        if let Some(segment) = current.last_mut() {
            segment
                .text
                .push(if c == LINE_SEPARATOR { '\n' } else { c });
        }
    }

    if current.is_empty() {
        let index = overrides.get(position).copied().unwrap_or(0);
        current.push(Segment {
            text: String::new(),
            style_index: index,
            style: style_for(base, table, index),
        });
    }
    paragraphs.push(current);
    paragraphs
}

pub fn text_align(value: Option<&str>) -> &'static str {
    match value {
        Some("CENTER") => "center",
        Some("RIGHT") => "right",
        Some("JUSTIFIED") => "justify",
        _ => "left",
    }
}

pub fn vertical_align(value: Option<&str>) -> &'static str {
    match value {
        Some("CENTER") => "center",
        Some("BOTTOM") => "bottom",
        _ => "top",
    }
}

pub fn grow_type(value: Option<&str>) -> &'static str {
    match value {
        Some("WIDTH_AND_HEIGHT") => "auto-width",
        Some("HEIGHT") => "auto-height",
        _ => "fixed",
    }
}

fn text_decoration(value: Option<&str>) -> Option<String> {
    match value {
        Some("UNDERLINE") => Some("underline".to_string()),
        Some("STRIKETHROUGH") => Some("line-through".to_string()),
        _ => None,
    }
}

fn text_transform(value: Option<&str>) -> Option<String> {
    match value {
        Some("UPPER") => Some("uppercase".to_string()),
        Some("LOWER") => Some("lowercase".to_string()),
        Some("TITLE") => Some("capitalize".to_string()),
        _ => None,
    }
}

/// Line height as a multiple of the font size.
pub fn line_height(style: &TypeStyle) -> Option<f64> {
    if style.line_height_unit.as_deref() == Some("INTRINSIC_%") {
        return None;
    }
    if let Some(percent) = style.line_height_percent_font_size {
        return Some(percent / 100.0);
    }
    match (style.line_height_px, style.font_size) {
        (Some(px), Some(size)) if size > 0.0 => Some(px / size),
        _ => None,
    }
}

/// Font and character attributes shared by typographies and text leaves.
pub struct CharacterAttrs {
    pub font: ResolvedFont,
    pub font_size: String,
    pub line_height: Option<String>,
    pub letter_spacing: String,
    pub text_decoration: Option<String>,
    pub text_transform: Option<String>,
}

pub fn character_attrs(
    catalogs: &FontCatalogs,
    scope: &dyn Scope,
    node_id: &str,
    style: &TypeStyle,
) -> Result<CharacterAttrs> {
    Ok(CharacterAttrs {
        font: resolve_font(catalogs, scope, node_id, style)?,
        font_size: format_number(style.font_size.unwrap_or(14.0)),
        line_height: line_height(style).map(format_number),
        letter_spacing: format_number(style.letter_spacing.unwrap_or(0.0)),
        text_decoration: text_decoration(style.text_decoration.as_deref()),
        text_transform: text_transform(style.text_case.as_deref()),
    })
}

fn leaf_style(
    scope: &mut dyn Scope,
    catalogs: &FontCatalogs,
    node: &SourceNode,
    segment: &Segment,
    size: Point,
    typography: Option<Uuid>,
) -> Result<TextStyleAttrs> {
    let attrs = character_attrs(catalogs, scope, &node.id, &segment.style)?;
    let paints = segment.style.fills.as_ref().unwrap_or(&node.fills);
    let fills = translate_fills(scope, paints, size);
    let typography_ref = if segment.style_index == 0 { typography } else { None };

    Ok(TextStyleAttrs {
        font_id: attrs.font.font_id,
        font_family: attrs.font.font_family,
        font_variant_id: attrs.font.font_variant_id,
        font_size: attrs.font_size,
        font_weight: attrs.font.font_weight,
        font_style: attrs.font.font_style,
        line_height: attrs.line_height,
        letter_spacing: attrs.letter_spacing,
        text_decoration: attrs.text_decoration,
        text_transform: attrs.text_transform,
        fills,
        typography_ref_id: typography_ref,
        typography_ref_file: typography_ref.map(|_| scope.file_id()),
    })
}

/// Builds the content tree of a text node.
pub fn text_content(
    scope: &mut dyn Scope,
    catalogs: &FontCatalogs,
    node: &SourceNode,
    size: Point,
) -> Result<TextContent> {
    let base = node.style.clone().unwrap_or_default();
    let characters = node.characters.as_deref().unwrap_or_default();
    let typography = node
        .styles
        .get("text")
        .and_then(|style_id| scope.lookup_id(style_id).ok())
        .filter(|id| scope.typography(id).is_some());

    let mut paragraphs = Vec::new();
    for segments in segment(
        characters,
        &node.character_style_overrides,
        &node.style_override_table,
        &base,
    ) {
        let mut leaves = Vec::with_capacity(segments.len());
        for segment in &segments {
            leaves.push(TextLeaf {
                text: segment.text.clone(),
                style: leaf_style(scope, catalogs, node, segment, size, typography)?,
            });
        }
        let first = segments.first().map(|s| &s.style).unwrap_or(&base);
        let style = leaves
            .first()
            .map(|leaf| leaf.style.clone())
            .unwrap_or_default();
        paragraphs.push(Paragraph::new(
            text_align(first.text_align_horizontal.as_deref()),
            style,
            leaves,
        ));
    }

    Ok(TextContent::new(
        vertical_align(base.text_align_vertical.as_deref()),
        paragraphs,
    ))
}
