//! The transliteration scan: a per-codepoint state machine over the
//! replaced input.
//!
//! Each position is classified against the lookup tables in strict priority
//! order (protected literal, language override, base map, diacritic
//! accumulation, symbol word, fallback); the first match wins and emits zero
//! or more characters. Multi-codepoint diacritic clusters are handled with an
//! explicit accumulator state rather than ad hoc concatenation so that
//! longest-match resolution stays correct at end of input.

use std::collections::BTreeMap;

use tracing::debug_span;

use crate::options::ResolvedConfig;
use crate::replace;
use crate::tables::{Tables, MARK_CHARS, URIC_CHARS, URIC_NO_SLASH_CHARS};

/// Diacritic accumulation state carried across scan positions.
enum DiacriticState {
    Idle,
    /// A base-map character was deferred because the next codepoint is a
    /// lookahead marker; the marker will decide the compound rendering.
    Accumulating(String),
    /// A full cluster has been collected; the next emission combines with
    /// its resolved text.
    Pending(String),
}

impl DiacriticState {
    /// Take the accumulated buffer, leaving `Idle` behind.
    fn take_buf(&mut self) -> String {
        match std::mem::replace(self, DiacriticState::Idle) {
            DiacriticState::Idle => String::new(),
            DiacriticState::Accumulating(buf) | DiacriticState::Pending(buf) => buf,
        }
    }
}

fn is_ascii_alnum(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// "Alphanumeric" for spacing decisions: the mapped text contains at least
/// one ASCII alphanumeric character.
fn contains_alnum(s: &str) -> bool {
    s.chars().any(is_ascii_alnum)
}

/// Produce the intermediate slug for the replaced input. Total over any
/// input: unknown codepoints fall through to the sanitization filter.
pub(crate) fn transliterate(input: &str, cfg: &ResolvedConfig, tables: &Tables) -> String {
    let _span = debug_span!("transliterate", len = input.len()).entered();

    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());

    let lang_map: Option<&BTreeMap<char, String>> =
        cfg.lang.code().and_then(|code| tables.lang_chars(code));
    let symbol_map: Option<&BTreeMap<char, String>> = if cfg.convert_symbols {
        let code = cfg.lang.code().unwrap_or("en");
        tables
            .symbols(code)
            .or_else(|| tables.symbols("en"))
    } else {
        None
    };

    let mut state = DiacriticState::Idle;
    let mut last_was_symbol = false;

    for (i, &c) in chars.iter().enumerate() {
        // text produced for this position, before sanitization
        let mut emitted = String::new();

        if replace::is_protected_literal(c, &cfg.custom) {
            emitted.push(c);
            last_was_symbol = false;
        } else if let Some(mapped) = lang_map.and_then(|m| m.get(&c)) {
            if last_was_symbol && contains_alnum(mapped) {
                emitted.push(' ');
            }
            emitted.push_str(mapped);
            last_was_symbol = false;
        } else if let Some(mapped) = tables.base(c) {
            let next_is_lookahead = chars
                .get(i + 1)
                .is_some_and(|&next| tables.is_lookahead(next));
            if next_is_lookahead {
                // defer: the marker at the next position selects the
                // compound rendering
                let mut buf = state.take_buf();
                buf.push(c);
                state = DiacriticState::Accumulating(buf);
            } else if matches!(state, DiacriticState::Pending(_)) {
                let buf = state.take_buf();
                if let Some(resolved) = tables.resolve_diacritic(&buf) {
                    emitted.push_str(resolved);
                }
                emitted.push_str(mapped);
            } else {
                if last_was_symbol && contains_alnum(mapped) {
                    emitted.push(' ');
                }
                emitted.push_str(mapped);
            }
            last_was_symbol = false;
        } else if tables.is_diacritic_component(c) {
            let mut buf = state.take_buf();
            buf.push(c);
            if i == chars.len() - 1 {
                // end of input: resolve immediately, longest key wins
                if let Some(resolved) = tables.resolve_diacritic(&buf) {
                    emitted.push_str(resolved);
                }
            }
            state = DiacriticState::Pending(buf);
        } else if let Some(word) = symbol_lookup(symbol_map, c, cfg) {
            if last_was_symbol || out.chars().last().is_some_and(is_ascii_alnum) {
                emitted.push_str(&cfg.separator);
            }
            emitted.push_str(word);
            if chars.get(i + 1).copied().is_some_and(is_ascii_alnum) {
                emitted.push_str(&cfg.separator);
            }
            last_was_symbol = true;
        } else {
            if matches!(state, DiacriticState::Pending(_)) {
                let buf = state.take_buf();
                if let Some(resolved) = tables.resolve_diacritic(&buf) {
                    emitted.push_str(resolved);
                }
                emitted.push(c);
            } else {
                if last_was_symbol
                    && (is_ascii_alnum(c) || out.chars().last().is_some_and(is_ascii_alnum))
                {
                    emitted.push(' ');
                }
                emitted.push(c);
            }
            last_was_symbol = false;
        }

        sanitize_into(&mut out, &emitted, cfg);
    }

    out
}

/// Symbol-word lookup, skipped when an enabled URI-reserved allowance
/// protects the character (it then falls through to the sanitize filter,
/// which lets it pass).
fn symbol_lookup<'t>(
    symbol_map: Option<&'t BTreeMap<char, String>>,
    c: char,
    cfg: &ResolvedConfig,
) -> Option<&'t str> {
    let map = symbol_map?;
    if cfg.uric && URIC_CHARS.contains(&c) {
        return None;
    }
    if cfg.uric_no_slash && URIC_NO_SLASH_CHARS.contains(&c) {
        return None;
    }
    map.get(&c).map(String::as_str)
}

/// Per produced character: anything that is not a word character, whitespace,
/// `-`, the configured separator, or explicitly allowed is replaced by the
/// separator.
fn sanitize_into(out: &mut String, emitted: &str, cfg: &ResolvedConfig) {
    for c in emitted.chars() {
        if is_sanitize_allowed(c, cfg) {
            out.push(c);
        } else {
            out.push_str(&cfg.separator);
        }
    }
}

fn is_sanitize_allowed(c: char, cfg: &ResolvedConfig) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c == '-'
        || c.is_whitespace()
        || cfg.separator.contains(c)
        || (cfg.uric && URIC_CHARS.contains(&c))
        || (cfg.uric_no_slash && URIC_NO_SLASH_CHARS.contains(&c))
        || (cfg.mark && MARK_CHARS.contains(&c))
}
