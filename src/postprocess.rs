//! Post-processing passes over the intermediate slug: title casing,
//! separator collapsing, truncation, case folding.

use tracing::debug_span;

use crate::options::ResolvedConfig;

/// Run the pipeline tail: title case, collapse, trim, truncate, fold.
pub(crate) fn run(intermediate: &str, cfg: &ResolvedConfig) -> String {
    let _span = debug_span!("postprocess", len = intermediate.len()).entered();

    let mut result = if cfg.title_case {
        title_case(intermediate, &cfg.custom)
    } else {
        intermediate.to_string()
    };
    result = collapse_whitespace(&result, &cfg.separator);
    result = collapse_separator_runs(&result, &cfg.separator);
    result = trim_separators(&result, &cfg.separator);
    result = truncate_at_boundary(&result, cfg.truncate, &cfg.separator);
    if !cfg.maintain_case && !cfg.title_case {
        result = result.to_lowercase();
    }
    result
}

/// Uppercase the first character of each maximal non-whitespace run starting
/// at a word character. A run whose lowercase form is a recognized
/// custom-replacement pattern is forced to lowercase instead, which lets
/// callers pin small words ("of", "the") under title casing.
pub(crate) fn title_case(s: &str, custom: &[(String, String)]) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_alphanumeric() || c == '_' {
            let mut j = i;
            while j < chars.len() && !chars[j].is_whitespace() {
                j += 1;
            }
            let token: String = chars[i..j].iter().collect();
            let lowered = token.to_lowercase();
            if custom.iter().any(|(pattern, _)| *pattern == lowered) {
                out.push_str(&lowered);
            } else {
                let mut rest = token.chars();
                if let Some(first) = rest.next() {
                    out.extend(first.to_uppercase());
                    out.push_str(rest.as_str());
                }
            }
            i = j;
        } else {
            out.push(c);
            i += 1;
        }
    }
    out
}

/// Replace every run of whitespace with a single separator.
fn collapse_whitespace(s: &str, separator: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push_str(separator);
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Collapse adjacent occurrences of the full separator string to one.
fn collapse_separator_runs(s: &str, separator: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find(separator) {
        out.push_str(&rest[..pos + separator.len()]);
        rest = &rest[pos + separator.len()..];
        while let Some(stripped) = rest.strip_prefix(separator) {
            rest = stripped;
        }
    }
    out.push_str(rest);
    out
}

/// Strip leading and trailing separator occurrences.
fn trim_separators(s: &str, separator: &str) -> String {
    let mut t = s;
    while let Some(stripped) = t.strip_prefix(separator) {
        t = stripped;
    }
    while let Some(stripped) = t.strip_suffix(separator) {
        t = stripped;
    }
    t.to_string()
}

/// Cut the result to at most `limit` codepoints. A cut lands on a separator
/// boundary when one exists: cleanly when the separator sits exactly at the
/// boundary, otherwise at the last separator before it. With no separator
/// before the boundary the result is hard-cut at the boundary.
pub(crate) fn truncate_at_boundary(s: &str, limit: usize, separator: &str) -> String {
    if limit == 0 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= limit {
        return s.to_string();
    }
    let sep_len = separator.chars().count();
    let clean = chars[limit..]
        .iter()
        .take(sep_len)
        .collect::<String>()
        == separator;
    let prefix: String = chars[..limit].iter().collect();
    if clean {
        return prefix;
    }
    match prefix.rfind(separator) {
        Some(pos) => prefix[..pos].to_string(),
        None => prefix,
    }
}
