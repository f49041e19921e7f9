//! On-disk naming of combination images.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::emoji::emoji_to_codepoint;
use crate::url_model::sanitize_component;

/// How emoji are spelled in directory and file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilenameFormat {
    /// Literal emoji (`😀/😀_🐶.png`).
    Emoji,
    /// Hex code points (`1f600/1f600_1f436.png`).
    Codepoint,
    /// Codepoint on Windows, emoji elsewhere.
    #[default]
    Auto,
}

impl FilenameFormat {
    /// Resolves `Auto` for the current platform.
    pub fn resolve(self) -> FilenameFormat {
        match self {
            FilenameFormat::Auto if cfg!(windows) => FilenameFormat::Codepoint,
            FilenameFormat::Auto => FilenameFormat::Emoji,
            other => other,
        }
    }

    /// Spelling of a single emoji as a path component.
    pub fn component(self, emoji: &str) -> String {
        let raw = match self.resolve() {
            FilenameFormat::Codepoint => emoji_to_codepoint(emoji),
            _ => emoji.to_string(),
        };
        let clean = sanitize_component(&raw);
        if clean.is_empty() {
            // Only reachable for tokens that are entirely separators.
            emoji_to_codepoint(emoji)
        } else {
            clean
        }
    }

    pub fn file_name(self, left: &str, right: &str) -> String {
        format!("{}_{}.png", self.component(left), self.component(right))
    }
}

impl fmt::Display for FilenameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FilenameFormat::Emoji => "emoji",
            FilenameFormat::Codepoint => "codepoint",
            FilenameFormat::Auto => "auto",
        };
        f.write_str(s)
    }
}

impl FromStr for FilenameFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "emoji" => Ok(FilenameFormat::Emoji),
            "codepoint" => Ok(FilenameFormat::Codepoint),
            "auto" => Ok(FilenameFormat::Auto),
            other => Err(format!("unknown filename format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codepoint_names() {
        let f = FilenameFormat::Codepoint;
        assert_eq!(f.component("❤️"), "2764-fe0f");
        assert_eq!(f.file_name("😀", "🐶"), "1f600_1f436.png");
    }

    #[test]
    fn emoji_names() {
        let f = FilenameFormat::Emoji;
        assert_eq!(f.file_name("😀", "🐶"), "😀_🐶.png");
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("CODEPOINT".parse::<FilenameFormat>().unwrap(), FilenameFormat::Codepoint);
        assert_eq!(FilenameFormat::Auto.to_string(), "auto");
        assert!("hex".parse::<FilenameFormat>().is_err());
    }

    #[test]
    fn auto_resolves_to_concrete_format() {
        assert_ne!(FilenameFormat::Auto.resolve(), FilenameFormat::Auto);
    }
}
