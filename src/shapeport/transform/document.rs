//! # Document Conversion
//!
//! Orchestrates one conversion run:
//!
//! 1. repair the source payload ([`super::clean`])
//! 2. open the document scope over the identity mapping
//! 3. build the shared libraries: colors from variables, typographies from text styles,
//!    and one library component per local component
//! 4. convert each page: a root frame painted with the page background, then the page's
//!    children beneath it
//! 5. link every library component to its main instance, which is only known once all
//!    pages are done
//!
//! Conditions the operator can act on are returned as [`Notice`]s next to the document.
//! Everything else is logged.

use crate::error::Result;
use crate::geometry::IDENTITY_TRANSFORM;
use crate::mapping::IdMapping;
use crate::registry::{DocumentScope, Scope};
use crate::source::{Color, SourceFile, SourceLibraries, Variable, VariableValue};
use crate::target::{root_frame, Component, Fill, LibraryColor, Page, TargetDocument, ROOT_FRAME_ID};
use crate::text::{translate_typographies, FontCatalogs};
use crate::translate::split_path;
use std::collections::HashMap;
use uuid::Uuid;

use super::{clean::clean, set_children, transform_children, Context, Parent};

/// Alias chains longer than this are treated as cycles.
const MAX_ALIAS_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A condition worth showing to whoever runs the conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub content: String,
}

impl Notice {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: TargetDocument,
    pub notices: Vec<Notice>,
}

/// Converts a source file into a target document, minting ids into `mapping` for every
/// source key seen for the first time.
pub fn convert_document(
    file: &SourceFile,
    libraries: &SourceLibraries,
    catalogs: &FontCatalogs,
    include_hidden: bool,
    mapping: &mut IdMapping,
) -> Result<Conversion> {
    let file = clean(file);
    let mut notices = Vec::new();

    let file_id = mapping.translate_id(&file.document.id);
    let mut document = TargetDocument::new(file_id, &file.name);
    let mut scope = DocumentScope::new(mapping, file_id);

    translate_colors(&mut scope, libraries, &mut notices)?;
    translate_typographies(&mut scope, catalogs, &libraries.text_styles)?;
    register_components(&mut scope, &file)?;

    let cx = Context {
        file: &file,
        catalogs,
        include_hidden,
    };
    for canvas in file.pages() {
        let page_id = scope.translate_id(&canvas.id);
        let background = canvas
            .background_color
            .map(|color| Fill::solid(color.to_hex(), color.a))
            .unwrap_or_else(|| Fill::solid("#FFFFFF", 1.0));

        let mut page = scope.new_page(page_id);
        page.add_node(root_frame(vec![background]))?;
        let root = Parent {
            id: ROOT_FRAME_ID,
            frame_id: ROOT_FRAME_ID,
            transform: IDENTITY_TRANSFORM,
        };
        let children = transform_children(&cx, &mut page, &canvas.children, &root)?;
        set_children(&mut page, ROOT_FRAME_ID, children)?;
        let objects = page.finish();

        log::debug!("page {} ({}): {} objects", canvas.name, page_id, objects.len());
        document.add_page(Page {
            id: page_id,
            name: canvas.name.clone(),
            objects,
        })?;
    }

    link_main_instances(&mut scope, &document);

    let libraries = scope.into_libraries();
    document.data.colors = libraries.colors;
    document.data.typographies = libraries.typographies;
    document.data.components = libraries.components;
    document.data.media = libraries.media;

    log::info!(
        "converted {} pages of {}, {} new ids",
        document.data.pages.len(),
        file.name,
        mapping.minted()
    );
    Ok(Conversion { document, notices })
}

fn translate_colors(
    scope: &mut dyn Scope,
    libraries: &SourceLibraries,
    notices: &mut Vec<Notice>,
) -> Result<()> {
    let Some(variables) = libraries.variables.as_ref() else {
        notices.push(Notice::warning(
            "Color variables are not accessible for this file. Paints bound to variables \
             are converted as plain colors. Grant the token variable read access to keep \
             them linked.",
        ));
        return Ok(());
    };

    let by_id: HashMap<&str, &Variable> = variables.iter().map(|v| (v.id.as_str(), v)).collect();
    let default_modes: HashMap<&str, &str> = libraries
        .variable_collections
        .iter()
        .map(|c| (c.id.as_str(), c.default_mode_id.as_str()))
        .collect();

    for variable in variables
        .iter()
        .filter(|v| !v.remote && v.resolved_type == "COLOR")
    {
        let Some(color) = resolve_color(variable, &by_id, &default_modes) else {
            log::warn!("color variable {} does not resolve to a color", variable.name);
            notices.push(Notice::warning(format!(
                "Color variable \"{}\" could not be resolved and was left out of the library.",
                variable.name
            )));
            continue;
        };
        let (path, name) = split_path(&variable.name);
        let id = scope.translate_id(&variable.id);
        scope.add_color(LibraryColor {
            id,
            name,
            path,
            color: Some(color.to_hex()),
            opacity: Some(color.a),
            gradient: None,
        })?;
    }
    Ok(())
}

/// Value of a color variable in its collection's default mode, following aliases.
fn resolve_color(
    variable: &Variable,
    by_id: &HashMap<&str, &Variable>,
    default_modes: &HashMap<&str, &str>,
) -> Option<Color> {
    let mut current = variable;
    for _ in 0..MAX_ALIAS_DEPTH {
        let value = default_modes
            .get(current.variable_collection_id.as_str())
            .and_then(|mode| current.values_by_mode.get(*mode))
            .or_else(|| current.values_by_mode.values().next())?;
        match value {
            VariableValue::Color(color) => return Some(*color),
            VariableValue::Alias(alias) => current = by_id.get(alias.id.as_str()).copied()?,
            _ => return None,
        }
    }
    None
}

fn register_components(scope: &mut dyn Scope, file: &SourceFile) -> Result<()> {
    for meta in file.components.values().filter(|meta| !meta.remote) {
        let set = meta
            .component_set_id
            .as_ref()
            .and_then(|id| file.component_sets.get(id));
        // Variants are grouped under their set.
        let (path, name) = match set {
            Some(set) => (set.name.clone(), meta.name.clone()),
            None => split_path(&meta.name),
        };
        let id = scope.translate_id(&meta.key);
        scope.add_component(Component {
            id,
            name,
            path,
            main_instance_id: None,
            main_instance_page: None,
        })?;
    }
    Ok(())
}

fn link_main_instances(scope: &mut DocumentScope, document: &TargetDocument) {
    let mut mains: HashMap<Uuid, (Uuid, Uuid)> = HashMap::new();
    for page in document.pages() {
        for shape in page.objects.iter() {
            if shape.base.main_instance != Some(true) {
                continue;
            }
            if let Some(component_id) = shape.base.component_id {
                mains.entry(component_id).or_insert((shape.id(), page.id));
            }
        }
    }

    for component in scope.components_mut() {
        match mains.get(&component.id) {
            Some(&(shape, page)) => {
                component.main_instance_id = Some(shape);
                component.main_instance_page = Some(page);
            }
            None => log::warn!("component {} has no main instance", component.name),
        }
    }
}
