/// Target blend mode for a source blend mode. The linear modes have no target
/// counterpart and map to their nearest non-linear mode.
pub fn blend_mode(mode: Option<&str>) -> String {
    match mode {
        None | Some("PASS_THROUGH") | Some("NORMAL") => "normal".to_string(),
        Some("LINEAR_BURN") => "color-burn".to_string(),
        Some("LINEAR_DODGE") => "color-dodge".to_string(),
        Some(other) => other.to_lowercase().replace('_', "-"),
    }
}
