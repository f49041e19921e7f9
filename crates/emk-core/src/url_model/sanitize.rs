//! Filename sanitization for path components built from emoji or code points.

/// Sanitizes one path component so it is safe on Linux, macOS and Windows.
///
/// - Replaces NUL, `/`, `\`, Windows-reserved `<>:"|?*`, whitespace and control characters with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing spaces, dots and underscores
/// - Limits length to 255 bytes (NAME_MAX) on a char boundary
pub fn sanitize_component(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let replacement = if c == '\0'
            || c == '/'
            || c == '\\'
            || "<>:\"|?*".contains(c)
            || c.is_control()
            || c.is_whitespace()
        {
            '_'
        } else {
            c
        };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.' || c == '_');

    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_separators_and_reserved() {
        assert_eq!(sanitize_component("a/b\\c:d?.png"), "a_b_c_d_.png");
    }

    #[test]
    fn keeps_emoji_intact() {
        assert_eq!(sanitize_component("😀_🐶"), "😀_🐶");
        assert_eq!(sanitize_component("❤️"), "❤️");
    }

    #[test]
    fn trims_dots_and_spaces() {
        assert_eq!(sanitize_component("  ..  name  .. "), "name");
    }

    #[test]
    fn truncates_on_char_boundary() {
        let long = "😀".repeat(100);
        let out = sanitize_component(&long);
        assert!(out.len() <= 255);
        assert!(out.chars().all(|c| c == '😀'));
    }
}
