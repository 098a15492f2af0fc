use crate::registry::Scope;
use crate::source::Paint;
use uuid::Uuid;

/// Splits a slash-delimited library name into `(path, name)`. Segments are trimmed and
/// empty ones dropped; the path keeps the target's `" / "` separator.
pub fn split_path(full: &str) -> (String, String) {
    let mut segments: Vec<&str> = full
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let name = segments.pop().unwrap_or_default().to_string();
    (segments.join(" / "), name)
}

/// Library color referenced by a paint's bound color variable, as `(ref-id, ref-file)`.
pub fn bound_color(scope: &dyn Scope, paint: &Paint) -> Option<(Uuid, Uuid)> {
    let alias = paint.bound_variables.color.as_ref()?;
    match scope.lookup_id(&alias.id) {
        Ok(id) if scope.color(&id).is_some() => Some((id, scope.file_id())),
        _ => {
            log::warn!("bound color variable {} is not in the color library", alias.id);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_group_path() {
        assert_eq!(
            split_path("Brand/ Primary /500"),
            ("Brand / Primary".to_string(), "500".to_string())
        );
        assert_eq!(split_path("Solo"), (String::new(), "Solo".to_string()));
        assert_eq!(split_path(""), (String::new(), String::new()));
    }
}
