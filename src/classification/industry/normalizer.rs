/// Lowercases and drops everything that is not a letter or digit.
///
/// `"Tech Bank, Inc."` becomes `"techbankinc"`; CJK text is kept as-is.
pub(crate) fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
