//! Emoji tokens, code point conversion, and pair lists.
//!
//! Emoji Kitchen keys everything by lowercase hex code points joined with
//! `-` (e.g. `❤️` is `2764-fe0f`). Pairs come from the command line, from a
//! pair file (one `left right` per line), or from the Cartesian product of a
//! set of emoji.

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;

/// Variation selector 16; present on some emoji and absent on others in the catalog.
pub const VS16: char = '\u{fe0f}';

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EmojiError {
    #[error("empty emoji token")]
    Empty,
    #[error("not an emoji: {0:?}")]
    NotEmoji(String),
    #[error("invalid code point: {0:?}")]
    BadCodepoint(String),
    #[error("line {line}: expected two emoji, got {got:?}")]
    BadPairLine { line: usize, got: String },
}

/// Validates a single emoji token. Rejects empty input, whitespace, and
/// anything below U+00A0 (ASCII and C1 controls). The one exception is the
/// base of a keycap sequence like `#️⃣` or `1️⃣`.
pub fn validate_emoji(token: &str) -> Result<(), EmojiError> {
    if token.is_empty() {
        return Err(EmojiError::Empty);
    }
    if token
        .chars()
        .any(|c| (c < '\u{a0}' && !is_keycap_base(token, c)) || c.is_whitespace())
    {
        return Err(EmojiError::NotEmoji(token.to_string()));
    }
    Ok(())
}

fn is_keycap_base(token: &str, c: char) -> bool {
    (c.is_ascii_digit() || c == '#' || c == '*') && token.contains('\u{20e3}')
}

/// `😀` → `1f600`, `❤️` → `2764-fe0f`.
pub fn emoji_to_codepoint(emoji: &str) -> String {
    emoji
        .chars()
        .map(|c| format!("{:x}", c as u32))
        .collect::<Vec<_>>()
        .join("-")
}

/// Inverse of [`emoji_to_codepoint`]. Accepts `u`/`U+` prefixes and `-`, `_`
/// or space separators (`u1f600`, `U+2764 U+FE0F`, `1f600_1f603`). The
/// decoded text must pass [`validate_emoji`], so `41` (`A`) is rejected.
pub fn codepoint_to_emoji(codepoint: &str) -> Result<String, EmojiError> {
    let mut out = String::new();
    for part in codepoint
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|p| !p.is_empty())
    {
        let hex = part
            .trim_start_matches("U+")
            .trim_start_matches("u+")
            .trim_start_matches(['u', 'U']);
        let value = u32::from_str_radix(hex, 16)
            .map_err(|_| EmojiError::BadCodepoint(codepoint.to_string()))?;
        let c = char::from_u32(value).ok_or_else(|| EmojiError::BadCodepoint(codepoint.to_string()))?;
        out.push(c);
    }
    validate_emoji(&out).map_err(|_| EmojiError::BadCodepoint(codepoint.to_string()))?;
    Ok(out)
}

/// Accepts either a literal emoji or a code point spelling and returns the emoji.
pub fn normalize_token(token: &str) -> Result<String, EmojiError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(EmojiError::Empty);
    }
    if token.chars().all(|c| c.is_ascii_hexdigit() || "-_uU+ ".contains(c)) {
        return codepoint_to_emoji(token);
    }
    validate_emoji(token)?;
    Ok(token.to_string())
}

/// Code point with every `fe0f` removed; used for tolerant catalog lookups.
pub fn strip_vs16(codepoint: &str) -> String {
    codepoint
        .split('-')
        .filter(|p| *p != "fe0f")
        .collect::<Vec<_>>()
        .join("-")
}

/// An ordered pair of emoji. Order matters for the file layout (the left
/// emoji names the directory) but not for whether a combination exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmojiPair {
    pub left: String,
    pub right: String,
}

impl EmojiPair {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Builds a pair from user input, accepting emoji or code point spellings.
    pub fn parse(left: &str, right: &str) -> Result<Self, EmojiError> {
        Ok(Self::new(normalize_token(left)?, normalize_token(right)?))
    }
}

impl fmt::Display for EmojiPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.left, self.right)
    }
}

/// Parses one line of a pair file. Returns `Ok(None)` for blank lines and
/// `#` comments. Tokens are separated by whitespace and/or `+`; extra
/// tokens after the first two are ignored.
pub fn parse_pair_line(line: &str, line_no: usize) -> Result<Option<EmojiPair>, EmojiError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut tokens = line
        .split(|c: char| c.is_whitespace() || c == '+')
        .filter(|t| !t.is_empty());
    match (tokens.next(), tokens.next()) {
        (Some(a), Some(b)) => EmojiPair::parse(a, b).map(Some),
        _ => Err(EmojiError::BadPairLine {
            line: line_no,
            got: line.to_string(),
        }),
    }
}

pub fn parse_pair_list(text: &str) -> Result<Vec<EmojiPair>, EmojiError> {
    let mut pairs = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if let Some(pair) = parse_pair_line(line, i + 1)? {
            pairs.push(pair);
        }
    }
    Ok(pairs)
}

pub fn read_pair_file(path: &Path) -> Result<Vec<EmojiPair>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read pair file: {}", path.display()))?;
    parse_pair_list(&text).with_context(|| format!("parse pair file: {}", path.display()))
}

/// Every ordered pair of `emojis`, self-pairs included (n² pairs).
pub fn all_pairs(emojis: &[String]) -> Vec<EmojiPair> {
    let mut out = Vec::with_capacity(emojis.len() * emojis.len());
    for left in emojis {
        for right in emojis {
            out.push(EmojiPair::new(left.clone(), right.clone()));
        }
    }
    out
}

/// Default emoji set for bulk mode: 100 commonly used emoji, grouped loosely by category.
pub const TOP_EMOJIS: [&str; 100] = [
    // smileys
    "😀", "😃", "😄", "😁", "😆", "😅", "🤣", "😂", "🙂", "🙃",
    "😉", "😊", "😇", "🥰", "😍", "🤩", "😘", "😗", "😚", "😙",
    "🥲", "😋", "😛", "😜", "🤪",
    "😝", "🤑", "🤗", "🤭", "🤫", "🤔", "🤐", "🤨", "😐", "😑",
    "😶", "😏", "😒", "🙄", "😬",
    "😮", "🤯", "😳", "🥺", "😢", "😭", "😤", "😠", "😡", "🤬",
    "😈", "👿", "💀", "☠️", "💩",
    // hearts
    "❤️", "🧡", "💛", "💚", "💙", "💜", "🖤", "🤍", "🤎", "💔",
    // hands
    "👍", "👎", "👊", "✊", "🤛", "🤜", "👏", "🙌", "👐", "🤲",
    "🤝", "🙏", "✌️", "🤞", "🤟",
    // animals
    "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯",
    // food
    "🍎", "🍕", "🍔", "🌮", "🍦",
    // nature
    "🌈", "⭐", "🌙", "☀️", "🔥",
];

pub fn top_emojis() -> Vec<String> {
    TOP_EMOJIS.iter().map(|e| e.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codepoint_single_and_sequence() {
        assert_eq!(emoji_to_codepoint("😀"), "1f600");
        assert_eq!(emoji_to_codepoint("❤️"), "2764-fe0f");
    }

    #[test]
    fn codepoint_inverse_accepts_prefixes() {
        assert_eq!(codepoint_to_emoji("1f600").unwrap(), "😀");
        assert_eq!(codepoint_to_emoji("u1f600").unwrap(), "😀");
        assert_eq!(codepoint_to_emoji("U+2764 U+FE0F").unwrap(), "❤️");
        assert_eq!(codepoint_to_emoji("2764-fe0f").unwrap(), "❤️");
        assert!(codepoint_to_emoji("zz").is_err());
        assert!(codepoint_to_emoji("").is_err());
    }

    #[test]
    fn codepoints_below_emoji_range_are_rejected() {
        for cp in ["41", "a", "20", "u0009", "7f", "85"] {
            assert_eq!(
                codepoint_to_emoji(cp),
                Err(EmojiError::BadCodepoint(cp.to_string())),
                "{}",
                cp
            );
        }
        // Keycap sequences keep their ASCII base.
        assert_eq!(codepoint_to_emoji("0023-fe0f-20e3").unwrap(), "#\u{fe0f}\u{20e3}");
        assert_eq!(codepoint_to_emoji("a9").unwrap(), "\u{a9}");
    }

    #[test]
    fn normalize_token_rejects_ascii_codepoints() {
        assert!(normalize_token("a").is_err());
        assert!(normalize_token("41").is_err());
        assert!(normalize_token("U+0020").is_err());
        assert!(parse_pair_line("a 20", 1).is_err());
        assert!(validate_emoji("\u{85}").is_err());
        validate_emoji("1\u{fe0f}\u{20e3}").unwrap();
    }

    #[test]
    fn normalize_token_accepts_both_spellings() {
        assert_eq!(normalize_token("1f436").unwrap(), "🐶");
        assert_eq!(normalize_token(" 🐶 ").unwrap(), "🐶");
        assert_eq!(normalize_token("dog"), Err(EmojiError::NotEmoji("dog".into())));
        assert_eq!(normalize_token("  "), Err(EmojiError::Empty));
    }

    #[test]
    fn strip_vs16_removes_selector() {
        assert_eq!(strip_vs16("2764-fe0f"), "2764");
        assert_eq!(strip_vs16("1f600"), "1f600");
    }

    #[test]
    fn pair_lines_skip_comments_and_blanks() {
        let text = "# header\n\n😀 😃\n🐶+🐱\n  ❤️   🔥  extra\n";
        let pairs = parse_pair_list(text).unwrap();
        assert_eq!(
            pairs,
            vec![
                EmojiPair::new("😀", "😃"),
                EmojiPair::new("🐶", "🐱"),
                EmojiPair::new("❤️", "🔥"),
            ]
        );
    }

    #[test]
    fn pair_line_with_one_token_is_an_error() {
        let err = parse_pair_list("😀 😃\n😀\n").unwrap_err();
        assert_eq!(
            err,
            EmojiError::BadPairLine {
                line: 2,
                got: "😀".into()
            }
        );
    }

    #[test]
    fn all_pairs_is_square_with_self_pairs() {
        let set = vec!["😀".to_string(), "🐶".to_string(), "🔥".to_string()];
        let pairs = all_pairs(&set);
        assert_eq!(pairs.len(), 9);
        assert!(pairs.contains(&EmojiPair::new("🐶", "🐶")));
        assert!(pairs.contains(&EmojiPair::new("🔥", "😀")));
    }

    #[test]
    fn top_emojis_are_unique_and_valid() {
        let set: std::collections::HashSet<_> = TOP_EMOJIS.iter().collect();
        assert_eq!(set.len(), 100);
        for e in TOP_EMOJIS {
            validate_emoji(e).unwrap();
        }
    }

    #[test]
    fn read_pair_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs.txt");
        std::fs::write(&path, "😀 😃\n").unwrap();
        assert_eq!(read_pair_file(&path).unwrap().len(), 1);
        let missing = dir.path().join("missing.txt");
        let err = read_pair_file(&missing).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.txt"));
    }
}
