//! URL slug generation with table-driven transliteration.
//!
//! Converts arbitrary human-readable text into a normalized, URL-safe slug:
//! ASCII tokens joined by a configurable separator, with diacritics,
//! non-Latin scripts, currency and math symbols, and punctuation replaced
//! according to priority-ordered lookup tables.
//!
//! ```
//! use slug_engine::{slugify, Options};
//!
//! assert_eq!(slugify("Hello, World!", &Options::default()), "hello-world");
//! assert_eq!(slugify("Déjà Vu", &Options::default()), "deja-vu");
//! ```
//!
//! The engine is a pure synchronous computation: the lookup tables are built
//! once behind a `OnceLock` and only ever read, per-call state is never
//! shared, and no input can make it fail.

pub mod options;
mod postprocess;
mod replace;
mod scan;
pub mod tables;

use tracing::debug_span;

pub use options::{CustomOpt, Lang, LangOpt, Options, ResolvedConfig, TitleCaseOpt};
pub use tables::{TableError, Tables};

/// Slugify `input` under the given options. Empty input returns an empty
/// slug immediately.
pub fn slugify(input: &str, options: &Options) -> String {
    if input.is_empty() {
        return String::new();
    }
    slugify_with(input, &options.resolve())
}

/// Slugify with an already-resolved configuration. Useful when one config
/// drives many titles; resolution work is done once by the caller.
pub fn slugify_with(input: &str, cfg: &ResolvedConfig) -> String {
    if input.is_empty() {
        return String::new();
    }
    let _span = debug_span!("slugify", len = input.len()).entered();

    let tables = Tables::global();
    let replaced = replace::apply(input, &cfg.custom);
    let trimmed = replaced.trim_matches(' ');
    let intermediate = scan::transliterate(trimmed, cfg, tables);
    postprocess::run(&intermediate, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(input: &str) -> String {
        slugify(input, &Options::default())
    }

    #[test]
    fn basic() {
        assert_eq!(slug("Hello, World!"), "hello-world");
        assert_eq!(slug("Déjà Vu"), "deja-vu");
        assert_eq!(slug(""), "");
    }

    #[test]
    fn german_transliteration() {
        assert_eq!(
            slug("Schöner Titel läßt grüßen!? Bel été !"),
            "schoener-titel-laesst-gruessen-bel-ete"
        );
    }

    #[test]
    fn symbol_word_with_boundary_spacing() {
        assert_eq!(slug("C & C"), "c-and-c");
        assert_eq!(slug("a&b"), "a-and-b");
        assert_eq!(slug("Foo & Bar"), "foo-and-bar");
    }

    #[test]
    fn unknown_symbols_collapse() {
        assert_eq!(slug("100% Organic"), "100-organic");
    }

    #[test]
    fn turkish_language_override() {
        let tr = Options {
            lang: Some(LangOpt::Code("tr".into())),
            ..Default::default()
        };
        assert_eq!(slugify("İstanbul", &tr), "istanbul");
        assert_eq!(slugify("Ünlü", &tr), "unlu");
    }

    #[test]
    fn cyrillic() {
        assert_eq!(slug("Привет мир"), "privet-mir");
    }

    #[test]
    fn greek() {
        assert_eq!(slug("Καλημέρα"), "kalimera");
    }

    #[test]
    fn currency() {
        assert_eq!(slug("10 € off"), "10-eur-off");
        assert_eq!(slug("$100"), "usd100");
    }

    #[test]
    fn custom_separator() {
        let opts = Options {
            separator: Some("_".into()),
            ..Default::default()
        };
        assert_eq!(slugify("Hello World", &opts), "hello_world");
    }

    #[test]
    fn maintain_case() {
        let opts = Options {
            maintain_case: Some(true),
            ..Default::default()
        };
        assert_eq!(slugify("Foo Bar", &opts), "Foo-Bar");
    }

    #[test]
    fn title_case() {
        let opts = Options {
            title_case: Some(TitleCaseOpt::Enabled(true)),
            ..Default::default()
        };
        assert_eq!(slugify("Hello World", &opts), "Hello-World");
    }

    #[test]
    fn title_case_with_exempt_tokens() {
        let opts = Options {
            title_case: Some(TitleCaseOpt::ExemptTokens(vec!["the".into(), "of".into()])),
            ..Default::default()
        };
        assert_eq!(slugify("king of the hill", &opts), "King-of-the-Hill");
    }

    #[test]
    fn custom_replacements() {
        let mut map = indexmap::IndexMap::new();
        map.insert("and".to_string(), "und".to_string());
        let opts = Options {
            custom: Some(CustomOpt::Map(map)),
            ..Default::default()
        };
        assert_eq!(slugify("foo and bar", &opts), "foo-und-bar");
        // multi-character patterns only match whole words
        assert_eq!(slugify("sandwich", &opts), "sandwich");
    }

    #[test]
    fn custom_single_char_replacement() {
        let mut map = indexmap::IndexMap::new();
        map.insert("*".to_string(), "star".to_string());
        let opts = Options {
            custom: Some(CustomOpt::Map(map)),
            ..Default::default()
        };
        assert_eq!(slugify("foo*bar", &opts), "foostarbar");
    }

    #[test]
    fn truncation() {
        let opts = Options {
            truncate: Some(9),
            ..Default::default()
        };
        assert_eq!(slugify("Foo bar baz", &opts), "foo-bar");
    }

    #[test]
    fn truncation_clean_boundary() {
        let opts = Options {
            truncate: Some(7),
            ..Default::default()
        };
        assert_eq!(slugify("Foo bar baz", &opts), "foo-bar");
    }

    #[test]
    fn truncation_hard_cut_without_separator() {
        let opts = Options {
            truncate: Some(3),
            ..Default::default()
        };
        assert_eq!(slugify("foobar", &opts), "foo");
    }

    #[test]
    fn uric_chars_survive() {
        let opts = Options {
            uric: Some(true),
            ..Default::default()
        };
        assert_eq!(slugify("foo/bar", &opts), "foo/bar");
    }

    #[test]
    fn mark_chars_survive() {
        let opts = Options {
            mark: Some(true),
            ..Default::default()
        };
        assert_eq!(slugify("foo.bar!", &opts), "foo.bar!");
    }

    #[test]
    fn lang_disabled_skips_symbol_words() {
        let opts = Options {
            lang: Some(LangOpt::Enabled(false)),
            ..Default::default()
        };
        assert_eq!(slugify("foo & bar", &opts), "foo-bar");
    }

    #[test]
    fn burmese_clusters() {
        assert_eq!(slug("\u{1010}\u{1000}\u{103A}"), "tet");
    }

    // output-shape properties

    #[test]
    fn output_alphabet_is_restricted() {
        for input in ["Hello, World!", "Ünloche & Säle", "foo — bar", "٣ ٤ ٥"] {
            let out = slug(input);
            assert!(
                out.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
                "unexpected char in {out:?}"
            );
        }
    }

    #[test]
    fn no_leading_trailing_or_double_separator() {
        for input in ["  !!Hello!!  ", "a   b", "--a--b--", "%%%"] {
            let out = slug(input);
            assert!(!out.starts_with('-') && !out.ends_with('-'), "{out:?}");
            assert!(!out.contains("--"), "{out:?}");
        }
    }

    #[test]
    fn idempotent() {
        let opts = Options::default();
        for input in ["Hello, World!", "Déjà Vu", "C & C", "100% Organic"] {
            let once = slugify(input, &opts);
            assert_eq!(slugify(&once, &opts), once);
        }
    }

    #[test]
    fn truncation_yields_prefix() {
        let full = slugify("one two three four", &Options::default());
        for n in 1..=full.chars().count() {
            let truncated = slugify(
                "one two three four",
                &Options {
                    truncate: Some(n),
                    ..Default::default()
                },
            );
            assert!(truncated.chars().count() <= n);
            assert!(full.starts_with(&truncated), "{truncated:?} vs {full:?}");
        }
    }
}
