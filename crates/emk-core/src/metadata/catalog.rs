//! In-memory view of the combination catalog.
//!
//! The catalog is keyed by code point: `data[cp].combinations[partner_cp]`
//! lists every rendered revision of that pair. Keys sometimes carry `fe0f`
//! and sometimes do not, so every lookup goes through an alias table built
//! from the selector-stripped spelling.

use serde::Deserialize;
use std::collections::HashMap;

use crate::emoji::{codepoint_to_emoji, emoji_to_codepoint, strip_vs16, validate_emoji, EmojiPair};
use crate::url_model::gstatic_url;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawCatalog {
    #[serde(default)]
    known_supported_emoji: Vec<String>,
    #[serde(default)]
    data: HashMap<String, EmojiEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmojiEntry {
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub emoji_codepoint: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub combinations: HashMap<String, Vec<CombinationEntry>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationEntry {
    #[serde(default)]
    pub g_static_url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub left_emoji: String,
    #[serde(default)]
    pub left_emoji_codepoint: String,
    #[serde(default)]
    pub right_emoji: String,
    #[serde(default)]
    pub right_emoji_codepoint: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub is_latest: bool,
}

/// One downloadable combination resolved from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub pair: EmojiPair,
    pub url: String,
    pub date: String,
}

#[derive(Debug, Default)]
pub struct Catalog {
    known: Vec<String>,
    data: HashMap<String, EmojiEntry>,
    aliases: HashMap<String, String>,
}

impl Catalog {
    pub(crate) fn from_raw(raw: RawCatalog) -> Self {
        let aliases = raw
            .data
            .keys()
            .map(|k| (strip_vs16(k), k.clone()))
            .collect();
        Self {
            known: raw.known_supported_emoji,
            data: raw.data,
            aliases,
        }
    }

    pub fn from_json_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice::<RawCatalog>(bytes).map(Self::from_raw)
    }

    /// Number of base emoji with at least one catalog entry.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Supported emoji as characters, in catalog order. Falls back to the
    /// data keys (sorted) when the catalog has no explicit list.
    pub fn supported_emoji(&self) -> Vec<String> {
        let codepoints: Vec<String> = if self.known.is_empty() {
            let mut keys: Vec<String> = self.data.keys().cloned().collect();
            keys.sort();
            keys
        } else {
            self.known.clone()
        };
        codepoints
            .iter()
            .filter_map(|cp| codepoint_to_emoji(cp).ok())
            .collect()
    }

    fn resolve_key(&self, emoji: &str) -> Option<&str> {
        let cp = emoji_to_codepoint(emoji);
        if let Some((k, _)) = self.data.get_key_value(&cp) {
            return Some(k.as_str());
        }
        self.aliases.get(&strip_vs16(&cp)).map(String::as_str)
    }

    pub fn entry(&self, emoji: &str) -> Option<&EmojiEntry> {
        self.resolve_key(emoji).and_then(|k| self.data.get(k))
    }

    fn revisions(&self, left: &str, right: &str) -> Option<&[CombinationEntry]> {
        let entry = self.entry(left)?;
        let want = strip_vs16(&emoji_to_codepoint(right));
        entry
            .combinations
            .iter()
            .find(|(cp, _)| strip_vs16(cp) == want)
            .map(|(_, revs)| revs.as_slice())
    }

    /// Whether the catalog lists a rendered image for the pair, in either order.
    pub fn is_valid_combination(&self, a: &str, b: &str) -> bool {
        self.revisions(a, b).is_some_and(|r| !r.is_empty())
            || self.revisions(b, a).is_some_and(|r| !r.is_empty())
    }

    /// Latest revision of the pair, looked up in either order.
    pub fn combination(&self, a: &str, b: &str) -> Option<Combination> {
        self.revisions(a, b)
            .and_then(pick_latest)
            .and_then(to_combination)
            .or_else(|| {
                self.revisions(b, a)
                    .and_then(pick_latest)
                    .and_then(to_combination)
            })
    }

    /// Every combination involving `emoji`, latest revision per partner,
    /// ordered by partner code point. Entries whose emoji cannot be
    /// recovered are skipped.
    pub fn find_combinations(&self, emoji: &str) -> Vec<Combination> {
        let Some(entry) = self.entry(emoji) else {
            return Vec::new();
        };
        let mut partners: Vec<(&String, &Vec<CombinationEntry>)> = entry.combinations.iter().collect();
        partners.sort_by(|a, b| a.0.cmp(b.0));
        partners
            .into_iter()
            .filter_map(|(_, revs)| pick_latest(revs))
            .filter_map(to_combination)
            .collect()
    }
}

fn pick_latest(revs: &[CombinationEntry]) -> Option<&CombinationEntry> {
    revs.iter()
        .find(|r| r.is_latest)
        .or_else(|| revs.iter().max_by(|a, b| a.date.cmp(&b.date)))
}

/// Emoji for one side of an entry: the literal if present, else decoded
/// from the code point. `None` if neither yields a valid emoji.
fn side(literal: &str, codepoint: &str) -> Option<String> {
    if literal.is_empty() {
        codepoint_to_emoji(codepoint).ok()
    } else {
        validate_emoji(literal).ok().map(|()| literal.to_string())
    }
}

fn to_combination(rev: &CombinationEntry) -> Option<Combination> {
    let left = side(&rev.left_emoji, &rev.left_emoji_codepoint)?;
    let right = side(&rev.right_emoji, &rev.right_emoji_codepoint)?;
    let url = if rev.g_static_url.is_empty() {
        gstatic_url(&rev.date, &rev.left_emoji_codepoint, &rev.right_emoji_codepoint)
    } else {
        rev.g_static_url.clone()
    };
    Some(Combination {
        pair: EmojiPair::new(left, right),
        url,
        date: rev.date.clone(),
    })
}
