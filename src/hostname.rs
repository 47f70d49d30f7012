/// Replaces spaces, underscores and slashes with hyphens.
///
/// No other characters are touched: case is preserved and the length is
/// not checked.
pub fn normalize_hostname(hostname: &str) -> String {
    hostname.replace([' ', '_', '/'], "-")
}
