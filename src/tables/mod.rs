//! Transliteration lookup tables, embedded as TOML and parsed once at startup.
//!
//! The table contents are data, not logic: the scan only ever queries them by
//! exact codepoint or codepoint-sequence key. `Tables::global()` returns the
//! process-wide read-only instance; nothing mutates it after construction, so
//! concurrent readers need no synchronization.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use serde::Deserialize;

pub const CHAR_MAP_TOML: &str = include_str!("data/char_map.toml");
pub const DIACRITICS_TOML: &str = include_str!("data/diacritics.toml");
pub const LANG_CHARS_TOML: &str = include_str!("data/lang_chars.toml");
pub const SYMBOLS_TOML: &str = include_str!("data/symbols.toml");

/// URI-reserved characters (RFC 2396 `reserved`).
pub const URIC_CHARS: &[char] = &[';', '?', ':', '@', '&', '=', '+', '$', ',', '/'];

/// URI-reserved characters without the path separator.
pub const URIC_NO_SLASH_CHARS: &[char] = &[';', '?', ':', '@', '&', '=', '+', '$', ','];

/// RFC 2396 `mark` punctuation.
pub const MARK_CHARS: &[char] = &['.', '!', '~', '*', '\'', '(', ')'];

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("TOML parse error in {file}: {message}")]
    Parse { file: &'static str, message: String },
    #[error("{file}: table is empty")]
    Empty { file: &'static str },
    #[error("{file}: key {key:?} must be a single codepoint")]
    MultiCodepointKey { file: &'static str, key: String },
    #[error("{file}: lookahead marker {marker:?} must be a single codepoint")]
    BadLookaheadMarker { file: &'static str, marker: String },
    #[error("{file}: diacritic key {key:?} exceeds {max} codepoints")]
    KeyTooLong {
        file: &'static str,
        key: String,
        max: usize,
    },
}

/// Longest diacritic-map key, in codepoints. The scan's longest-match loop is
/// bounded by this.
pub const MAX_DIACRITIC_KEY_LEN: usize = 5;

#[derive(Deserialize)]
struct MappingsFile {
    mappings: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct DiacriticsFile {
    lookahead: Vec<String>,
    mappings: BTreeMap<String, String>,
}

pub struct Tables {
    char_map: BTreeMap<char, String>,
    lang_char_maps: BTreeMap<String, BTreeMap<char, String>>,
    symbol_maps: BTreeMap<String, BTreeMap<char, String>>,
    diacritic_map: BTreeMap<String, String>,
    /// Every codepoint appearing in any diacritic-map key.
    diacritic_components: BTreeSet<char>,
    lookahead: BTreeSet<char>,
}

impl Tables {
    /// Get or initialize the global singleton.
    pub fn global() -> &'static Tables {
        static INSTANCE: OnceLock<Tables> = OnceLock::new();
        INSTANCE.get_or_init(|| Tables::from_embedded().expect("embedded table data must be valid"))
    }

    /// Parse and validate the embedded TOML data.
    pub fn from_embedded() -> Result<Tables, TableError> {
        let char_map = parse_char_map(CHAR_MAP_TOML, "char_map.toml")?;
        let (lookahead, diacritic_map) = parse_diacritics(DIACRITICS_TOML, "diacritics.toml")?;
        let lang_char_maps = parse_per_lang(LANG_CHARS_TOML, "lang_chars.toml")?;
        let symbol_maps = parse_per_lang(SYMBOLS_TOML, "symbols.toml")?;

        let diacritic_components = diacritic_map.keys().flat_map(|k| k.chars()).collect();

        Ok(Tables {
            char_map,
            lang_char_maps,
            symbol_maps,
            diacritic_map,
            diacritic_components,
            lookahead,
        })
    }

    /// General Unicode-to-ASCII transliteration lookup.
    pub fn base(&self, c: char) -> Option<&str> {
        self.char_map.get(&c).map(String::as_str)
    }

    /// Per-language override map, empty when the language has no overrides.
    /// Unknown codes resolve to `None` (no overrides).
    pub fn lang_chars(&self, code: &str) -> Option<&BTreeMap<char, String>> {
        self.lang_char_maps.get(code)
    }

    /// Per-language symbol words. An empty map means the language opts out of
    /// symbol words entirely (no English fallback).
    pub fn symbols(&self, code: &str) -> Option<&BTreeMap<char, String>> {
        self.symbol_maps.get(code)
    }

    pub fn is_lookahead(&self, c: char) -> bool {
        self.lookahead.contains(&c)
    }

    /// Whether `c` appears in any diacritic-composition key.
    pub fn is_diacritic_component(&self, c: char) -> bool {
        self.diacritic_components.contains(&c)
    }

    /// Resolve an accumulated codepoint sequence against the diacritic map,
    /// greedy longest match: the full sequence first, then successively
    /// shorter prefixes. `None` when no prefix is a key.
    pub fn resolve_diacritic(&self, seq: &str) -> Option<&str> {
        if let Some(mapped) = self.diacritic_map.get(seq) {
            return Some(mapped);
        }
        let chars: Vec<char> = seq.chars().collect();
        for len in (1..chars.len()).rev() {
            let prefix: String = chars[..len].iter().collect();
            if let Some(mapped) = self.diacritic_map.get(&prefix) {
                return Some(mapped);
            }
        }
        None
    }
}

fn single_codepoint(key: &str, file: &'static str) -> Result<char, TableError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(TableError::MultiCodepointKey {
            file,
            key: key.to_string(),
        }),
    }
}

fn parse_char_map(toml_str: &str, file: &'static str) -> Result<BTreeMap<char, String>, TableError> {
    let parsed: MappingsFile = toml::from_str(toml_str).map_err(|e| TableError::Parse {
        file,
        message: e.to_string(),
    })?;
    if parsed.mappings.is_empty() {
        return Err(TableError::Empty { file });
    }
    let mut map = BTreeMap::new();
    for (key, value) in parsed.mappings {
        map.insert(single_codepoint(&key, file)?, value);
    }
    Ok(map)
}

fn parse_diacritics(
    toml_str: &str,
    file: &'static str,
) -> Result<(BTreeSet<char>, BTreeMap<String, String>), TableError> {
    let parsed: DiacriticsFile = toml::from_str(toml_str).map_err(|e| TableError::Parse {
        file,
        message: e.to_string(),
    })?;
    if parsed.mappings.is_empty() {
        return Err(TableError::Empty { file });
    }
    let mut lookahead = BTreeSet::new();
    for marker in &parsed.lookahead {
        let c = single_codepoint(marker, file).map_err(|_| TableError::BadLookaheadMarker {
            file,
            marker: marker.clone(),
        })?;
        lookahead.insert(c);
    }
    for key in parsed.mappings.keys() {
        let len = key.chars().count();
        if len == 0 || len > MAX_DIACRITIC_KEY_LEN {
            return Err(TableError::KeyTooLong {
                file,
                key: key.clone(),
                max: MAX_DIACRITIC_KEY_LEN,
            });
        }
    }
    Ok((lookahead, parsed.mappings))
}

fn parse_per_lang(
    toml_str: &str,
    file: &'static str,
) -> Result<BTreeMap<String, BTreeMap<char, String>>, TableError> {
    let parsed: BTreeMap<String, BTreeMap<String, String>> =
        toml::from_str(toml_str).map_err(|e| TableError::Parse {
            file,
            message: e.to_string(),
        })?;
    if parsed.is_empty() {
        return Err(TableError::Empty { file });
    }
    let mut maps = BTreeMap::new();
    for (code, entries) in parsed {
        let mut map = BTreeMap::new();
        for (key, value) in entries {
            map.insert(single_codepoint(&key, file)?, value);
        }
        maps.insert(code, map);
    }
    Ok(maps)
}
