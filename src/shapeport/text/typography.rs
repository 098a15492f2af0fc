use crate::error::Result;
use crate::registry::Scope;
use crate::source::TextStyle;
use crate::target::Typography;
use crate::translate::split_path;

use super::{character_attrs, FontCatalogs};

/// Registers one library typography per source text style.
pub fn translate_typographies(
    scope: &mut dyn Scope,
    catalogs: &FontCatalogs,
    styles: &[TextStyle],
) -> Result<()> {
    for style in styles {
        let attrs = character_attrs(catalogs, scope, &style.id, &style.style)?;
        let (path, name) = split_path(&style.name);
        let id = scope.translate_id(&style.id);
        scope.add_typography(Typography {
            id,
            name,
            path,
            font_id: attrs.font.font_id,
            font_family: attrs.font.font_family,
            font_variant_id: attrs.font.font_variant_id,
            font_size: attrs.font_size,
            font_weight: attrs.font.font_weight,
            font_style: attrs.font.font_style,
            line_height: attrs.line_height,
            letter_spacing: attrs.letter_spacing,
            text_transform: attrs.text_transform,
        })?;
    }
    log::debug!("registered {} typographies", styles.len());
    Ok(())
}
