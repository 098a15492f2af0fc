use crate::error::Result;
use serde::Serialize;
use serde_json::Value;

use super::ops::AttrChange;

/// Numbers closer than this are the same value. Geometry goes through float math on
/// both sides and is only stable to a few decimals.
const NUMBER_EPSILON: f64 = 1e-6;

/// Attribute-level changes turning `previous` into `fresh`. Both must serialize to JSON
/// objects. Attributes are listed in key order, changed or added ones first, then the
/// ones `fresh` no longer has.
pub fn field_delta<T: Serialize>(previous: &T, fresh: &T) -> Result<Vec<AttrChange>> {
    let previous = serde_json::to_value(previous)?;
    let fresh = serde_json::to_value(fresh)?;

    let (Value::Object(previous), Value::Object(fresh)) = (&previous, &fresh) else {
        return Ok(if values_equal(&previous, &fresh) {
            Vec::new()
        } else {
            vec![AttrChange {
                attr: String::new(),
                val: fresh.clone(),
            }]
        });
    };

    let mut changes = Vec::new();
    for (attr, val) in fresh {
        let unchanged = previous
            .get(attr)
            .is_some_and(|old| values_equal(old, val));
        if !unchanged {
            changes.push(AttrChange {
                attr: attr.clone(),
                val: val.clone(),
            });
        }
    }
    for attr in previous.keys().filter(|attr| !fresh.contains_key(*attr)) {
        changes.push(AttrChange {
            attr: attr.clone(),
            val: Value::Null,
        });
    }
    Ok(changes)
}

/// Structural equality with a tolerance on numbers.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => (x - y).abs() < NUMBER_EPSILON,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_within_epsilon_are_equal() {
        assert!(values_equal(&json!(0.1 + 0.2), &json!(0.3)));
        assert!(values_equal(&json!([1, {"x": 2.0}]), &json!([1.0, {"x": 2}])));
        assert!(!values_equal(&json!(1.0), &json!(1.001)));
        assert!(!values_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }

    #[test]
    fn delta_lists_changed_added_and_removed_attrs() {
        let previous = json!({"name": "A", "x": 1.0, "hidden": true});
        let fresh = json!({"name": "B", "x": 1.0000001, "opacity": 0.5});
        let delta = field_delta(&previous, &fresh).unwrap();
        assert_eq!(
            delta,
            vec![
                AttrChange {
                    attr: "name".to_string(),
                    val: json!("B")
                },
                AttrChange {
                    attr: "opacity".to_string(),
                    val: json!(0.5)
                },
                AttrChange {
                    attr: "hidden".to_string(),
                    val: Value::Null
                },
            ]
        );
    }

    #[test]
    fn identical_values_have_no_delta() {
        let value = json!({"shapes": ["a", "b"], "fills": [{"fill-color": "#FFFFFF"}]});
        assert!(field_delta(&value, &value).unwrap().is_empty());
    }
}
