//! Caller-supplied literal replacements, applied before transliteration.

use regex::{NoExpand, Regex};

/// Apply each `(pattern, replacement)` in insertion order; later patterns see
/// the output of earlier ones. Multi-character patterns match only on word
/// boundaries, single-character patterns anywhere. Patterns are matched
/// literally.
pub(crate) fn apply(input: &str, custom: &[(String, String)]) -> String {
    let mut text = input.to_string();
    for (pattern, replacement) in custom {
        if pattern.is_empty() {
            continue;
        }
        let escaped = regex::escape(pattern);
        let expr = if pattern.chars().count() > 1 {
            format!(r"\b{escaped}\b")
        } else {
            escaped
        };
        // escaped literals always compile; skip rather than fail if not
        let Ok(re) = Regex::new(&expr) else { continue };
        text = re.replace_all(&text, NoExpand(replacement)).into_owned();
    }
    text
}

/// Whether `c` is exactly one of the literal replacement values. The scan
/// passes such characters through without transliterating them.
pub(crate) fn is_protected_literal(c: char, custom: &[(String, String)]) -> bool {
    let mut buf = [0u8; 4];
    let s: &str = c.encode_utf8(&mut buf);
    custom.iter().any(|(_, replacement)| replacement == s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(p, r)| (p.to_string(), r.to_string()))
            .collect()
    }

    #[test]
    fn single_char_matches_anywhere() {
        let custom = pairs(&[("*", "star")]);
        assert_eq!(apply("foo*bar", &custom), "foostarbar");
    }

    #[test]
    fn multi_char_needs_word_boundary() {
        let custom = pairs(&[("and", "und")]);
        assert_eq!(apply("foo and bar", &custom), "foo und bar");
        assert_eq!(apply("sandwich", &custom), "sandwich");
    }

    #[test]
    fn insertion_order_chains() {
        let custom = pairs(&[("a", "b"), ("b", "c")]);
        assert_eq!(apply("a", &custom), "c");
    }

    #[test]
    fn metacharacters_are_literal() {
        let custom = pairs(&[(".", "dot"), ("(x)", "y")]);
        assert_eq!(apply("a.b", &custom), "adotb");
        assert_eq!(apply("c d", &custom), "c d");
    }

    #[test]
    fn replacement_text_is_verbatim() {
        let custom = pairs(&[("x", "$1")]);
        assert_eq!(apply("x", &custom), "$1");
    }

    #[test]
    fn protected_literal_detection() {
        let custom = pairs(&[("*", "*"), ("&", "und")]);
        assert!(is_protected_literal('*', &custom));
        assert!(!is_protected_literal('&', &custom));
        assert!(!is_protected_literal('u', &custom));
    }
}
