//! Font resolution.
//!
//! A source style names a family, a weight, an italic flag and the PostScript name of the
//! file the source actually rendered with. The target needs a font id and a variant id from
//! one of three places, tried in order:
//!
//! 1. the hosted catalog (web fonts the target serves itself), by exact family;
//! 2. the local catalog (fonts bundled with the target instance), by family;
//! 3. fonts uploaded to the team, by a `"<family>-<variant>"` key in the mapping's font
//!    table.
//!
//! Only the third step can fail: nothing can be substituted for a custom font, so the
//! operator has to upload it and run again.

use crate::error::{ConvertError, Result};
use crate::registry::Scope;
use crate::source::TypeStyle;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

static REGULAR_VARIANT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(regular|400)$").expect("valid regex"));

static POSTSCRIPT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-([A-Za-z0-9]+)$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FontVariant {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub weight: String,
    pub style: String,
    /// PostScript name suffix of the file behind this variant, e.g. `SemiBoldItalic`.
    #[serde(default)]
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CatalogFont {
    pub id: String,
    pub family: String,
    #[serde(default)]
    pub variants: Vec<FontVariant>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FontCatalogs {
    #[serde(default)]
    pub hosted: Vec<CatalogFont>,
    #[serde(default)]
    pub local: Vec<CatalogFont>,
}

impl FontCatalogs {
    /// Loads catalogs from a JSON file. A missing file yields empty catalogs.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(ConvertError::Io)?;
        serde_json::from_str(&content).map_err(ConvertError::Serialization)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Hosted,
    Local,
    Custom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFont {
    pub source: FontSource,
    pub font_id: String,
    pub font_family: String,
    pub font_variant_id: String,
    pub font_weight: String,
    pub font_style: String,
}

fn by_weight_and_style<'a>(
    font: &'a CatalogFont,
    weight: &str,
    style: &str,
) -> Option<&'a FontVariant> {
    font.variants
        .iter()
        .find(|v| v.weight == weight && v.style == style)
}

fn resolved(source: FontSource, font: &CatalogFont, variant: &FontVariant) -> ResolvedFont {
    ResolvedFont {
        source,
        font_id: font.id.clone(),
        font_family: font.family.clone(),
        font_variant_id: variant.id.clone(),
        font_weight: variant.weight.clone(),
        font_style: variant.style.clone(),
    }
}

/// Variant id the target would give an uploaded font: `regular`, `italic`, `700`,
/// `700italic`.
pub fn custom_variant_id(weight: u32, italic: bool) -> String {
    match (weight, italic) {
        (400, false) => "regular".to_string(),
        (400, true) => "italic".to_string(),
        (w, false) => w.to_string(),
        (w, true) => format!("{}italic", w),
    }
}

/// `SemiBoldItalic` out of `Inter-SemiBoldItalic`.
pub fn postscript_suffix(postscript_name: &str) -> Option<&str> {
    POSTSCRIPT_SUFFIX
        .captures(postscript_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Resolves the font of `style`. `node_id` is only used in error reports.
pub fn resolve_font(
    catalogs: &FontCatalogs,
    scope: &dyn Scope,
    node_id: &str,
    style: &TypeStyle,
) -> Result<ResolvedFont> {
    let family = style
        .font_family
        .as_deref()
        .ok_or_else(|| ConvertError::missing(node_id, "style.fontFamily"))?;
    let weight = style.weight().to_string();
    let font_style = if style.is_italic() { "italic" } else { "normal" };

    if let Some(font) = catalogs.hosted.iter().find(|f| f.family == family) {
        let variant = by_weight_and_style(font, &weight, font_style)
            .or_else(|| font.variants.iter().find(|v| REGULAR_VARIANT.is_match(&v.id)))
            .or_else(|| font.variants.first());
        if let Some(variant) = variant {
            return Ok(resolved(FontSource::Hosted, font, variant));
        }
    }

    if let Some(font) = catalogs
        .local
        .iter()
        .find(|f| f.family.eq_ignore_ascii_case(family))
    {
        let suffix = style
            .font_post_script_name
            .as_deref()
            .and_then(postscript_suffix);
        let variant = by_weight_and_style(font, &weight, font_style)
            .or_else(|| {
                let suffix = suffix?;
                font.variants.iter().find(|v| {
                    v.suffix
                        .as_deref()
                        .is_some_and(|s| s.eq_ignore_ascii_case(suffix))
                })
            })
            .or_else(|| {
                let raw = suffix?.to_lowercase();
                font.variants.iter().find(|v| v.id == raw)
            });
        if let Some(variant) = variant {
            return Ok(resolved(FontSource::Local, font, variant));
        }
    }

    let variant_id = custom_variant_id(style.weight(), style.is_italic());
    let key = format!("{}-{}", family, variant_id);
    match scope.font_id(&key) {
        Some(id) => Ok(ResolvedFont {
            source: FontSource::Custom,
            font_id: format!("custom-{}", id),
            font_family: family.to_string(),
            font_variant_id: variant_id,
            font_weight: weight,
            font_style: font_style.to_string(),
        }),
        None => Err(ConvertError::MissingFont {
            family: family.to_string(),
            variant: variant_id,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::IdMapping;
    use crate::registry::DocumentScope;
    use uuid::Uuid;

    fn variant(id: &str, weight: &str, style: &str, suffix: Option<&str>) -> FontVariant {
        FontVariant {
            id: id.to_string(),
            name: id.to_string(),
            weight: weight.to_string(),
            style: style.to_string(),
            suffix: suffix.map(str::to_string),
        }
    }

    fn catalogs() -> FontCatalogs {
        FontCatalogs {
            hosted: vec![CatalogFont {
                id: "gfont-inter".to_string(),
                family: "Inter".to_string(),
                variants: vec![
                    variant("100", "100", "normal", None),
                    variant("regular", "400", "normal", None),
                    variant("700", "700", "normal", None),
                ],
            }],
            local: vec![
                CatalogFont {
                    id: "local-inter".to_string(),
                    family: "Inter".to_string(),
                    variants: vec![variant("bold", "700", "normal", Some("Bold"))],
                },
                CatalogFont {
                    id: "sourcesanspro".to_string(),
                    family: "Source Sans Pro".to_string(),
                    variants: vec![
                        variant("regular", "400", "normal", Some("Regular")),
                        variant("semibold", "600", "normal", Some("Semibold")),
                        variant("black", "900", "normal", None),
                    ],
                },
            ],
        }
    }

    fn style(family: &str, weight: f64, italic: bool, postscript: Option<&str>) -> TypeStyle {
        TypeStyle {
            font_family: Some(family.to_string()),
            font_weight: Some(weight),
            italic: Some(italic),
            font_post_script_name: postscript.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn hosted_catalog_wins_over_local() {
        let mut mapping = IdMapping::new();
        let scope = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let font = resolve_font(&catalogs(), &scope, "1:1", &style("Inter", 700.0, false, None))
            .unwrap();
        assert_eq!(font.source, FontSource::Hosted);
        assert_eq!(font.font_id, "gfont-inter");
        assert_eq!(font.font_variant_id, "700");
    }

    #[test]
    fn hosted_falls_back_to_regular() {
        let mut mapping = IdMapping::new();
        let scope = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let font = resolve_font(&catalogs(), &scope, "1:1", &style("Inter", 500.0, true, None))
            .unwrap();
        assert_eq!(font.font_variant_id, "regular");
    }

    #[test]
    fn local_catalog_by_postscript_suffix_then_raw_id() {
        let mut mapping = IdMapping::new();
        let scope = DocumentScope::new(&mut mapping, Uuid::now_v7());

        let by_suffix = resolve_font(
            &catalogs(),
            &scope,
            "1:1",
            &style("Source Sans Pro", 650.0, false, Some("SourceSansPro-Semibold")),
        )
        .unwrap();
        assert_eq!(by_suffix.source, FontSource::Local);
        assert_eq!(by_suffix.font_variant_id, "semibold");

        let by_raw = resolve_font(
            &catalogs(),
            &scope,
            "1:1",
            &style("Source Sans Pro", 950.0, false, Some("SourceSansPro-Black")),
        )
        .unwrap();
        assert_eq!(by_raw.font_variant_id, "black");
    }

    #[test]
    fn custom_font_from_mapping() {
        let mut mapping = IdMapping::new();
        let id = Uuid::now_v7();
        mapping.register_font("Brand Sans-700italic", id);
        let scope = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let font = resolve_font(
            &catalogs(),
            &scope,
            "1:1",
            &style("Brand Sans", 700.0, true, None),
        )
        .unwrap();
        assert_eq!(font.source, FontSource::Custom);
        assert_eq!(font.font_id, format!("custom-{}", id));
        assert_eq!(font.font_style, "italic");
    }

    #[test]
    fn missing_custom_font_names_the_font() {
        let mut mapping = IdMapping::new();
        let scope = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let err = resolve_font(
            &catalogs(),
            &scope,
            "1:1",
            &style("Brand Sans", 400.0, false, None),
        )
        .unwrap_err();
        match err {
            ConvertError::MissingFont { family, variant } => {
                assert_eq!(family, "Brand Sans");
                assert_eq!(variant, "regular");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_family_is_a_missing_field() {
        let mut mapping = IdMapping::new();
        let scope = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let err = resolve_font(&catalogs(), &scope, "4:4", &TypeStyle::default()).unwrap_err();
        assert!(matches!(err, ConvertError::MissingField { .. }));
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalogs = FontCatalogs::load(dir.path().join("fonts.json")).unwrap();
        assert_eq!(catalogs, FontCatalogs::default());
    }

    #[test]
    fn variant_ids() {
        assert_eq!(custom_variant_id(400, false), "regular");
        assert_eq!(custom_variant_id(400, true), "italic");
        assert_eq!(custom_variant_id(300, true), "300italic");
        assert_eq!(postscript_suffix("Inter-SemiBoldItalic"), Some("SemiBoldItalic"));
        assert_eq!(postscript_suffix("Inter"), None);
    }
}
