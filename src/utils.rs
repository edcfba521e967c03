//! Common utility functions shared across the codebase.

/// Checks if `name` can be written as a bare JS property key.
///
/// ASCII letters, digits, `_` and `$` only; the first character is not a digit.
///
/// # Examples
///
/// ```
/// use intlx::utils::is_identifier_name;
///
/// assert!(is_identifier_name("title"));
/// assert!(is_identifier_name("$count_2"));
/// assert!(!is_identifier_name("home.title"));
/// assert!(!is_identifier_name("2fa"));
/// assert!(!is_identifier_name(""));
/// ```
pub fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
