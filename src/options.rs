//! Caller options and their resolution into an immutable per-call config.
//!
//! Every field of [`Options`] is optional; [`Options::resolve`] merges the
//! supplied values over the documented defaults and never fails. Field names
//! deserialize in camelCase (`maintainCase`, `uricNoSlash`, ...) so config
//! files use the option names consumers already know.

use indexmap::IndexMap;
use serde::Deserialize;

pub const DEFAULT_SEPARATOR: &str = "-";
pub const DEFAULT_LANG: &str = "en";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Token separator, default `-`. An empty string falls back to the default.
    pub separator: Option<String>,
    /// Language code, or `false` to disable language overrides and symbol
    /// words entirely.
    pub lang: Option<LangOpt>,
    /// Substitute symbol words (`&` -> "and"), default `true`.
    pub symbols: Option<bool>,
    /// Skip the final lowercase fold, default `false`.
    pub maintain_case: Option<bool>,
    /// Title-case the result, or a list of tokens to pin lowercase while
    /// title-casing everything else.
    pub title_case: Option<TitleCaseOpt>,
    /// Maximum result length in codepoints, `0` = unlimited.
    pub truncate: Option<usize>,
    /// Allow URI-reserved characters through sanitization.
    pub uric: Option<bool>,
    /// Allow URI-reserved characters except `/`.
    pub uric_no_slash: Option<bool>,
    /// Allow RFC 2396 mark punctuation.
    pub mark: Option<bool>,
    /// Literal replacements applied before transliteration, in insertion
    /// order. A plain list marks each token as its own replacement.
    pub custom: Option<CustomOpt>,
}

/// Language selection: a code like `"de"`, or a boolean where `false`
/// disables language handling and `true` means the default language.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LangOpt {
    Enabled(bool),
    Code(String),
}

/// `titleCase` accepts a boolean or a list of exempt tokens.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TitleCaseOpt {
    Enabled(bool),
    ExemptTokens(Vec<String>),
}

/// `custom` accepts a pattern->replacement mapping or a plain token list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CustomOpt {
    List(Vec<String>),
    Map(IndexMap<String, String>),
}

/// Resolved language: either an ISO-639-1-like code or disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lang {
    Code(String),
    Disabled,
}

impl Lang {
    pub fn code(&self) -> Option<&str> {
        match self {
            Lang::Code(code) => Some(code),
            Lang::Disabled => None,
        }
    }
}

/// Immutable configuration for one slugify call.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub separator: String,
    pub lang: Lang,
    /// False when `symbols` is off or `lang` is disabled.
    pub convert_symbols: bool,
    pub maintain_case: bool,
    pub title_case: bool,
    pub truncate: usize,
    pub uric: bool,
    pub uric_no_slash: bool,
    pub mark: bool,
    /// Custom replacements in insertion order. Title-case exempt tokens and
    /// plain-list custom entries appear here as identity mappings.
    pub custom: Vec<(String, String)>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Options::default().resolve()
    }
}

impl Options {
    /// Merge these options over the defaults. Total: malformed values fall
    /// back to their defaults instead of failing.
    pub fn resolve(&self) -> ResolvedConfig {
        let separator = match &self.separator {
            Some(s) if !s.is_empty() => s.clone(),
            _ => DEFAULT_SEPARATOR.to_string(),
        };

        let lang = match &self.lang {
            Some(LangOpt::Enabled(false)) => Lang::Disabled,
            Some(LangOpt::Code(code)) if !code.is_empty() => Lang::Code(code.clone()),
            _ => Lang::Code(DEFAULT_LANG.to_string()),
        };

        let convert_symbols = self.symbols.unwrap_or(true) && lang != Lang::Disabled;

        let mut custom: Vec<(String, String)> = Vec::new();
        match &self.custom {
            Some(CustomOpt::Map(map)) => {
                for (pattern, replacement) in map {
                    custom.push((pattern.clone(), replacement.clone()));
                }
            }
            Some(CustomOpt::List(tokens)) => {
                for token in tokens {
                    custom.push((token.clone(), token.clone()));
                }
            }
            None => {}
        }

        let title_case = match &self.title_case {
            Some(TitleCaseOpt::Enabled(enabled)) => *enabled,
            Some(TitleCaseOpt::ExemptTokens(tokens)) => {
                for token in tokens {
                    custom.push((token.clone(), token.clone()));
                }
                true
            }
            None => false,
        };

        ResolvedConfig {
            separator,
            lang,
            convert_symbols,
            maintain_case: self.maintain_case.unwrap_or(false),
            title_case,
            truncate: self.truncate.unwrap_or(0),
            uric: self.uric.unwrap_or(false),
            uric_no_slash: self.uric_no_slash.unwrap_or(false),
            mark: self.mark.unwrap_or(false),
            custom,
        }
    }
}
