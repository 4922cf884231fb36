use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use slug_engine::{slugify_with, CustomOpt, LangOpt, Options, TitleCaseOpt};

#[derive(Parser)]
#[command(name = "slugtool", about = "URL slug generation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Slugify a single input string
    Make {
        /// The text to slugify
        input: String,
        #[command(flatten)]
        opts: SlugArgs,
        /// Output as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Slugify a file of inputs (one per line) to JSONL
    Batch {
        /// Path to the input file, one title per line
        input_file: String,
        /// Path to the output JSONL file
        output_file: String,
        #[command(flatten)]
        opts: SlugArgs,
    },
}

#[derive(clap::Args)]
struct SlugArgs {
    /// Token separator (default "-")
    #[arg(long)]
    separator: Option<String>,
    /// Language code for overrides and symbol words (default "en")
    #[arg(long)]
    lang: Option<String>,
    /// Disable language handling entirely
    #[arg(long, conflicts_with = "lang")]
    no_lang: bool,
    /// Do not substitute symbol words
    #[arg(long)]
    no_symbols: bool,
    /// Keep the original casing
    #[arg(long)]
    maintain_case: bool,
    /// Title-case the result
    #[arg(long)]
    title_case: bool,
    /// Maximum slug length in codepoints (0 = unlimited)
    #[arg(long)]
    truncate: Option<usize>,
    /// Allow URI-reserved characters
    #[arg(long)]
    uric: bool,
    /// Allow URI-reserved characters except "/"
    #[arg(long)]
    uric_no_slash: bool,
    /// Allow mark punctuation (. ! ~ * ' parentheses)
    #[arg(long)]
    mark: bool,
    /// Custom replacement, PATTERN=REPLACEMENT (repeatable, applied in order)
    #[arg(long = "custom", value_name = "PATTERN=REPLACEMENT")]
    custom: Vec<String>,
    /// TOML options file; command-line flags override its values
    #[arg(long)]
    config: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid options file {path}: {message}")]
    Config { path: String, message: String },
    #[error("invalid --custom value {value:?}: expected PATTERN=REPLACEMENT")]
    Custom { value: String },
}

#[derive(Serialize)]
struct SlugRecord<'a> {
    input: &'a str,
    slug: String,
}

impl SlugArgs {
    /// Build `Options` from the config file (if any) with flags layered on
    /// top.
    fn to_options(&self) -> Result<Options, CliError> {
        let mut options = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| CliError::Read {
                    path: path.clone(),
                    source: e,
                })?;
                toml::from_str(&text).map_err(|e| CliError::Config {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
            None => Options::default(),
        };

        if let Some(separator) = &self.separator {
            options.separator = Some(separator.clone());
        }
        if self.no_lang {
            options.lang = Some(LangOpt::Enabled(false));
        } else if let Some(lang) = &self.lang {
            options.lang = Some(LangOpt::Code(lang.clone()));
        }
        if self.no_symbols {
            options.symbols = Some(false);
        }
        if self.maintain_case {
            options.maintain_case = Some(true);
        }
        if self.title_case {
            options.title_case = Some(TitleCaseOpt::Enabled(true));
        }
        if let Some(truncate) = self.truncate {
            options.truncate = Some(truncate);
        }
        if self.uric {
            options.uric = Some(true);
        }
        if self.uric_no_slash {
            options.uric_no_slash = Some(true);
        }
        if self.mark {
            options.mark = Some(true);
        }
        if !self.custom.is_empty() {
            let mut map = indexmap::IndexMap::new();
            for entry in &self.custom {
                let (pattern, replacement) =
                    entry.split_once('=').ok_or_else(|| CliError::Custom {
                        value: entry.clone(),
                    })?;
                map.insert(pattern.to_string(), replacement.to_string());
            }
            options.custom = Some(CustomOpt::Map(map));
        }

        Ok(options)
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Make { input, opts, json } => {
            let cfg = opts.to_options()?.resolve();
            let slug = slugify_with(&input, &cfg);
            if json {
                let record = SlugRecord {
                    input: &input,
                    slug,
                };
                println!(
                    "{}",
                    serde_json::to_string(&record).expect("record serializes")
                );
            } else {
                println!("{slug}");
            }
        }

        Command::Batch {
            input_file,
            output_file,
            opts,
        } => {
            let cfg = opts.to_options()?.resolve();
            let input = fs::File::open(&input_file).map_err(|e| CliError::Read {
                path: input_file.clone(),
                source: e,
            })?;
            let output = fs::File::create(&output_file).map_err(|e| CliError::Write {
                path: output_file.clone(),
                source: e,
            })?;
            let mut writer = BufWriter::new(output);
            for line in BufReader::new(input).lines() {
                let line = line.map_err(|e| CliError::Read {
                    path: input_file.clone(),
                    source: e,
                })?;
                let record = SlugRecord {
                    input: &line,
                    slug: slugify_with(&line, &cfg),
                };
                serde_json::to_writer(&mut writer, &record).map_err(|e| CliError::Write {
                    path: output_file.clone(),
                    source: e.into(),
                })?;
                writeln!(writer).map_err(|e| CliError::Write {
                    path: output_file.clone(),
                    source: e,
                })?;
            }
            writer.flush().map_err(|e| CliError::Write {
                path: output_file.clone(),
                source: e,
            })?;
        }
    }
    Ok(())
}

fn main() {
    #[cfg(feature = "trace")]
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn make_flags_map_to_options() {
        let cli = parse(&[
            "slugtool",
            "make",
            "Foo Bar",
            "--separator",
            "_",
            "--lang",
            "de",
            "--truncate",
            "20",
            "--maintain-case",
        ]);
        let Command::Make { opts, .. } = cli.command else {
            panic!("expected make");
        };
        let cfg = opts.to_options().unwrap().resolve();
        assert_eq!(cfg.separator, "_");
        assert_eq!(cfg.lang, slug_engine::Lang::Code("de".into()));
        assert_eq!(cfg.truncate, 20);
        assert!(cfg.maintain_case);
    }

    #[test]
    fn custom_pairs_parse_in_order() {
        let cli = parse(&[
            "slugtool",
            "make",
            "x",
            "--custom",
            "a=b",
            "--custom",
            "b=c",
        ]);
        let Command::Make { opts, .. } = cli.command else {
            panic!("expected make");
        };
        let cfg = opts.to_options().unwrap().resolve();
        assert_eq!(
            cfg.custom,
            vec![("a".into(), "b".into()), ("b".into(), "c".into())]
        );
    }

    #[test]
    fn malformed_custom_rejected() {
        let cli = parse(&["slugtool", "make", "x", "--custom", "nopair"]);
        let Command::Make { opts, .. } = cli.command else {
            panic!("expected make");
        };
        assert!(matches!(
            opts.to_options(),
            Err(CliError::Custom { .. })
        ));
    }

    #[test]
    fn no_lang_disables() {
        let cli = parse(&["slugtool", "make", "x", "--no-lang"]);
        let Command::Make { opts, .. } = cli.command else {
            panic!("expected make");
        };
        let cfg = opts.to_options().unwrap().resolve();
        assert_eq!(cfg.lang, slug_engine::Lang::Disabled);
    }
}
