use crate::source::LayoutConstraint;

fn horizontal(value: &str) -> Option<String> {
    let mapped = match value {
        "LEFT" => "left",
        "RIGHT" => "right",
        "CENTER" => "center",
        "LEFT_RIGHT" => "leftright",
        "SCALE" => "scale",
        _ => return None,
    };
    Some(mapped.to_string())
}

fn vertical(value: &str) -> Option<String> {
    let mapped = match value {
        "TOP" => "top",
        "BOTTOM" => "bottom",
        "CENTER" => "center",
        "TOP_BOTTOM" => "topbottom",
        "SCALE" => "scale",
        _ => return None,
    };
    Some(mapped.to_string())
}

/// `(constraints-h, constraints-v)`.
pub fn constraints(constraint: Option<&LayoutConstraint>) -> (Option<String>, Option<String>) {
    match constraint {
        Some(c) => (horizontal(&c.horizontal), vertical(&c.vertical)),
        None => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_both_axes() {
        let c = LayoutConstraint {
            vertical: "TOP_BOTTOM".to_string(),
            horizontal: "SCALE".to_string(),
        };
        assert_eq!(
            constraints(Some(&c)),
            (Some("scale".to_string()), Some("topbottom".to_string()))
        );
        assert_eq!(constraints(None), (None, None));
    }
}
