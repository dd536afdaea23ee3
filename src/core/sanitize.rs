//! Filesystem-safe name cleaning.

/// Keep only letters, digits, spaces, hyphens and underscores, then trim.
///
/// Letters and digits follow Unicode, so "Björk" survives intact.
pub fn sanitize(input: &str) -> String {
    let kept: String = input
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    kept.trim().to_string()
}
