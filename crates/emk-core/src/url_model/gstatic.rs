//! Google static CDN URLs for pre-rendered combinations.

/// Root of the Emoji Kitchen image tree on gstatic.
pub const GSTATIC_BASE_URL: &str = "https://www.gstatic.com/android/keyboard/emojikitchen";

/// Formats a code point (`2764-fe0f`) the way the CDN path does (`u2764-ufe0f`).
fn cdn_codepoint(codepoint: &str) -> String {
    codepoint
        .split('-')
        .map(|p| format!("u{}", p))
        .collect::<Vec<_>>()
        .join("-")
}

/// `{base}/{date}/u{left}/u{left}_u{right}.png`. Used when a catalog entry
/// carries a date but no explicit URL.
pub fn gstatic_url(date: &str, left_codepoint: &str, right_codepoint: &str) -> String {
    let left = cdn_codepoint(left_codepoint);
    let right = cdn_codepoint(right_codepoint);
    format!("{}/{}/{}/{}_{}.png", GSTATIC_BASE_URL, date, left, left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_pair() {
        assert_eq!(
            gstatic_url("20201001", "1f600", "1f601"),
            "https://www.gstatic.com/android/keyboard/emojikitchen/20201001/u1f600/u1f600_u1f601.png"
        );
    }

    #[test]
    fn sequence_codepoints_are_prefixed_per_part() {
        assert_eq!(
            gstatic_url("20230301", "2764-fe0f", "1f525"),
            "https://www.gstatic.com/android/keyboard/emojikitchen/20230301/u2764-ufe0f/u2764-ufe0f_u1f525.png"
        );
    }
}
