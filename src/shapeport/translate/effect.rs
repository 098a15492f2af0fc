use crate::registry::Scope;
use crate::source::{Color, SourceNode};
use crate::target::{Blur, Shadow, ShadowColor};

/// Shadows and layer blur for a node. Background blur has no target equivalent.
pub fn translate_effects(scope: &mut dyn Scope, node: &SourceNode) -> (Vec<Shadow>, Option<Blur>) {
    let mut shadows = Vec::new();
    let mut blur = None;

    for (index, effect) in node.effects.iter().enumerate() {
        let style = match effect.kind.as_str() {
            "DROP_SHADOW" => "drop-shadow",
            "INNER_SHADOW" => "inner-shadow",
            "LAYER_BLUR" => {
                blur = Some(Blur {
                    id: scope.translate_id(&format!("{}.blur", node.id)),
                    kind: "layer-blur".to_string(),
                    value: effect.radius,
                    hidden: !effect.visible,
                });
                continue;
            }
            "BACKGROUND_BLUR" => {
                log::warn!("background blur on {} is not supported, omitted", node.id);
                continue;
            }
            other => {
                log::warn!("effect type {} on {} is not supported, omitted", other, node.id);
                continue;
            }
        };

        let color = effect.color.unwrap_or(Color::rgba(0.0, 0.0, 0.0, 0.25));
        let offset = effect.offset.unwrap_or_default();
        shadows.push(Shadow {
            id: scope.translate_id(&format!("{}.shadow.{}", node.id, index)),
            style: style.to_string(),
            offset_x: offset.x,
            offset_y: offset.y,
            blur: effect.radius,
            spread: effect.spread,
            hidden: !effect.visible,
            color: ShadowColor {
                color: color.to_hex(),
                opacity: color.a,
            },
        });
    }

    (shadows, blur)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::mapping::IdMapping;
    use crate::registry::DocumentScope;
    use crate::source::{Effect, NodeKind};
    use uuid::Uuid;

    fn effect(kind: &str) -> Effect {
        Effect {
            kind: kind.to_string(),
            visible: true,
            radius: 4.0,
            color: Some(Color::rgba(0.0, 0.0, 0.0, 0.5)),
            offset: Some(Point::new(0.0, 2.0)),
            spread: 0.0,
        }
    }

    #[test]
    fn shadows_and_blur() {
        let mut mapping = IdMapping::new();
        let mut scope = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let mut node = SourceNode::new("1:1", "Card", NodeKind::Rectangle);
        node.effects = vec![
            effect("DROP_SHADOW"),
            effect("BACKGROUND_BLUR"),
            effect("INNER_SHADOW"),
            effect("LAYER_BLUR"),
        ];

        let (shadows, blur) = translate_effects(&mut scope, &node);
        assert_eq!(shadows.len(), 2);
        assert_eq!(shadows[0].style, "drop-shadow");
        assert_eq!(shadows[0].offset_y, 2.0);
        assert_eq!(shadows[0].color.opacity, 0.5);
        assert_eq!(shadows[1].style, "inner-shadow");
        assert_eq!(blur.unwrap().value, 4.0);
    }

    #[test]
    fn shadow_ids_are_stable() {
        let mut mapping = IdMapping::new();
        let mut scope = DocumentScope::new(&mut mapping, Uuid::now_v7());
        let mut node = SourceNode::new("1:1", "Card", NodeKind::Rectangle);
        node.effects = vec![effect("DROP_SHADOW")];
        let (first, _) = translate_effects(&mut scope, &node);
        let (second, _) = translate_effects(&mut scope, &node);
        assert_eq!(first, second);
    }
}
