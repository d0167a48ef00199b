//! normalize-ast: print a metadata-free JSON rendering of a script's syntax tree

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::warn;

use migrate_core::normalizer::{AstNormalizer, FieldPolicy, FieldRule};
use migrate_core::{parser, ScriptLanguage, SourceUnit};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LanguageArg {
    Javascript,
    Typescript,
    Tsx,
}

impl From<LanguageArg> for ScriptLanguage {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Javascript => ScriptLanguage::JavaScript,
            LanguageArg::Typescript => ScriptLanguage::TypeScript,
            LanguageArg::Tsx => ScriptLanguage::Tsx,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "normalize-ast",
    about = "Dump a normalized JSON syntax tree for a JavaScript/TypeScript file"
)]
#[command(version)]
struct Cli {
    /// Script to parse
    path: PathBuf,

    /// Grammar to use instead of detecting it from the extension
    #[arg(short, long, value_enum)]
    language: Option<LanguageArg>,

    /// Keep a field the default policy drops, as KIND:FIELD (KIND may be '*')
    #[arg(long = "keep-field", value_name = "KIND:FIELD")]
    keep_fields: Vec<FieldRule>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    // stdout carries the JSON document only
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("migrate_core=warn".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let unit = SourceUnit::read(&cli.path)?;
    let language = match cli.language {
        Some(language) => language.into(),
        None => unit.language().unwrap_or_else(|| {
            warn!(
                "Unrecognized extension on {}, parsing as {}",
                cli.path.display(),
                ScriptLanguage::Tsx
            );
            ScriptLanguage::Tsx
        }),
    };

    let tree = parser::parse_with(language, unit.path(), unit.text())?;

    let policy = cli
        .keep_fields
        .into_iter()
        .fold(FieldPolicy::default(), FieldPolicy::keep_rule);
    let normalizer = AstNormalizer::with_policy(policy);

    let json = if cli.compact {
        normalizer.to_compact_json_string(&tree)
    } else {
        normalizer.to_json_string(&tree)
    }
    .with_context(|| format!("Failed to normalize {}", cli.path.display()))?;

    println!("{}", json);
    Ok(())
}
