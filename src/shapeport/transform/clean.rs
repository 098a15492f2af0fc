//! Repairs known defects of source payloads before conversion.
//!
//! - zero or negative sizes, which the target rejects, are raised to [`MIN_SIZE`]
//! - `characterStyleOverrides` is trimmed of trailing zeros by the source API, so it is
//!   padded back to the character count (UTF-16 units) and cut if longer
//! - components may name a component set that is not part of the file

use crate::geometry::{Point, Rect};
use crate::source::{SourceFile, SourceNode};
use crate::target::MIN_SIZE;

/// Returns a repaired copy of `file`.
pub fn clean(file: &SourceFile) -> SourceFile {
    let mut cleaned = file.clone();
    clean_node(&mut cleaned.document);

    let sets = &cleaned.component_sets;
    for (id, meta) in cleaned.components.iter_mut() {
        let dangling = meta
            .component_set_id
            .as_ref()
            .is_some_and(|set| !sets.contains_key(set));
        if dangling {
            log::debug!("component {} names a missing component set", id);
            meta.component_set_id = None;
        }
    }
    cleaned
}

fn clean_node(node: &mut SourceNode) {
    if let Some(size) = node.size.as_mut() {
        clamp_size(size);
    }
    if let Some(bbox) = node.absolute_bounding_box.as_mut() {
        clamp_rect(bbox);
    }

    if let Some(characters) = node.characters.as_deref() {
        let len = characters.encode_utf16().count();
        if !node.character_style_overrides.is_empty() {
            node.character_style_overrides.resize(len, 0);
        }
    }

    for child in &mut node.children {
        clean_node(child);
    }
}

fn clamp_size(size: &mut Point) {
    if size.x <= 0.0 {
        size.x = MIN_SIZE;
    }
    if size.y <= 0.0 {
        size.y = MIN_SIZE;
    }
}

fn clamp_rect(rect: &mut Rect) {
    if rect.width <= 0.0 {
        rect.width = MIN_SIZE;
    }
    if rect.height <= 0.0 {
        rect.height = MIN_SIZE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ComponentMeta, InstanceOverride};
    use crate::test_utils::{rect_node, source_file, text_node};

    #[test]
    fn zero_sized_lines_get_minimum_height() {
        let mut line = rect_node("1:1", Rect::new(0.0, 0.0, 40.0, 0.0));
        line.size = Some(Point::new(40.0, 0.0));
        let file = clean(&source_file(vec![line]));

        let node = &file.document.children[0].children[0];
        assert_eq!(node.size, Some(Point::new(40.0, MIN_SIZE)));
        assert_eq!(node.bounding_box().unwrap().height, MIN_SIZE);
    }

    #[test]
    fn style_overrides_are_padded_to_utf16_length() {
        let mut text = text_node("1:2", Rect::new(0.0, 0.0, 10.0, 10.0), "a😀b");
        text.character_style_overrides = vec![1];
        let mut long = text_node("1:3", Rect::new(0.0, 0.0, 10.0, 10.0), "ab");
        long.character_style_overrides = vec![1, 1, 1, 1];
        let file = clean(&source_file(vec![text, long]));

        let page = &file.document.children[0];
        assert_eq!(page.children[0].character_style_overrides, vec![1, 0, 0, 0]);
        assert_eq!(page.children[1].character_style_overrides, vec![1, 1]);
    }

    #[test]
    fn keeps_empty_overrides_and_drops_dangling_sets() {
        let mut instance = rect_node("1:4", Rect::new(0.0, 0.0, 10.0, 10.0));
        instance.overrides = vec![
            InstanceOverride {
                id: "I1:4;2:1".to_string(),
                overridden_fields: vec![],
            },
            InstanceOverride {
                id: "I1:4;2:2".to_string(),
                overridden_fields: vec!["fills".to_string()],
            },
        ];
        let mut file = source_file(vec![instance]);
        file.components.insert(
            "2:0".to_string(),
            ComponentMeta {
                key: "k".to_string(),
                name: "Button".to_string(),
                description: String::new(),
                component_set_id: Some("9:9".to_string()),
                remote: false,
            },
        );

        let cleaned = clean(&file);
        let node = &cleaned.document.children[0].children[0];
        // An empty field list still means "nothing overridden here".
        assert_eq!(node.overrides.len(), 2);
        assert!(node.overrides[0].overridden_fields.is_empty());
        assert_eq!(cleaned.components["2:0"].component_set_id, None);
        // The input is left untouched.
        assert_eq!(file.components["2:0"].component_set_id.as_deref(), Some("9:9"));
    }
}
