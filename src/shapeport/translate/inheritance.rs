//! Component inheritance bookkeeping for instance descendants.
//!
//! The target tracks which attribute groups of an instance copy diverge from the main
//! component (`touched`) and which main shape each copy mirrors (`shape-ref`).

use crate::registry::Scope;
use crate::source::SourceNode;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Target sync group for an overridden source field.
pub fn sync_group(field: &str) -> Option<&'static str> {
    let group = match field {
        "name" => "name-group",
        "fills" => "fill-group",
        "strokes" | "strokeWeight" | "strokeAlign" | "strokeDashes" | "strokeCap" => {
            "stroke-group"
        }
        "characters" | "style" | "characterStyleOverrides" | "styleOverrideTable"
        | "textStyleId" => "text-content-group",
        "cornerRadius" | "rectangleCornerRadii" | "topLeftRadius" | "topRightRadius"
        | "bottomLeftRadius" | "bottomRightRadius" => "radius-group",
        "opacity" | "blendMode" => "layer-effects-group",
        "visible" => "visibility-group",
        "width" | "height" | "size" => "geometry-group",
        "constraints" => "constraints-group",
        "layoutMode" | "itemSpacing" | "counterAxisSpacing" | "paddingLeft" | "paddingRight"
        | "paddingTop" | "paddingBottom" | "primaryAxisAlignItems" | "counterAxisAlignItems"
        | "layoutWrap" => "layout-container",
        "layoutSizingHorizontal" | "layoutSizingVertical" | "layoutPositioning" => {
            "layout-item-container"
        }
        _ => return None,
    };
    Some(group)
}

/// Touched groups for a node: the overrides its instance declares for it, plus the
/// component properties it is bound to.
pub fn touched(scope: &dyn Scope, node: &SourceNode) -> BTreeSet<String> {
    let mut groups = BTreeSet::new();

    let mut add = |field: &str| match sync_group(field) {
        Some(group) => {
            groups.insert(group.to_string());
        }
        None => log::debug!("override of {} on {} has no sync group", field, node.id),
    };

    if let Some(fields) = scope.overrides(&node.id) {
        fields.iter().for_each(|field| add(field));
    }
    if node.definition_id().is_some() {
        for property in node.component_property_references.keys() {
            add(property);
        }
    }

    groups
}

/// Main-component shape mirrored by an instance descendant.
pub fn shape_ref(scope: &mut dyn Scope, node: &SourceNode) -> Option<Uuid> {
    node.definition_id().map(|id| scope.translate_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::IdMapping;
    use crate::registry::{DocumentScope, InstanceScope};
    use crate::source::NodeKind;
    use std::collections::HashMap;

    #[test]
    fn overrides_become_sync_groups() {
        let mut mapping = IdMapping::new();
        let mut doc = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let mut page = doc.new_page(Uuid::now_v7());
        let overrides = HashMap::from([(
            "I1:1;2:2".to_string(),
            vec![
                "fills".to_string(),
                "strokeWeight".to_string(),
                "pluginData".to_string(),
            ],
        )]);
        let scope = InstanceScope::new(&mut page, overrides);

        let mut node = SourceNode::new("I1:1;2:2", "Label", NodeKind::Text);
        node.component_property_references
            .insert("characters".to_string(), "Label#1:0".to_string());

        let groups: Vec<_> = touched(&scope, &node).into_iter().collect();
        assert_eq!(groups, vec!["fill-group", "stroke-group", "text-content-group"]);
    }

    #[test]
    fn shape_ref_follows_definition_id() {
        let mut mapping = IdMapping::new();
        let mut doc = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let node = SourceNode::new("I1:1;2:2", "Label", NodeKind::Text);
        let expected = doc.translate_id("2:2");
        assert_eq!(shape_ref(&mut doc, &node), Some(expected));
        let plain = SourceNode::new("2:2", "Label", NodeKind::Text);
        assert_eq!(shape_ref(&mut doc, &plain), None);
    }
}
