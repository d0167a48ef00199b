//! extract-components: split function declarations and function-valued
//! bindings out of scripts into one file each

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use migrate_core::config::DEFAULT_OUTPUT_DIR;
use migrate_core::utils::file_utils;
use migrate_core::{
    ArtifactSink, ComponentExtractor, DirectorySink, ExtractorConfig, MemorySink, SourceUnit,
};

#[derive(Parser)]
#[command(
    name = "extract-components",
    about = "Extract every function and function-valued binding into its own file"
)]
#[command(version)]
struct Cli {
    /// Source files or glob patterns (e.g. 'src/**/*.jsx')
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Directory artifacts are written into
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    out_dir: PathBuf,

    /// Extension for every artifact instead of the source file's own
    #[arg(long)]
    ext: Option<String>,

    /// List the artifacts that would be written without touching the disk
    #[arg(long)]
    dry_run: bool,

    /// Print one JSON report per source file (declarations, artifacts, writes)
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("migrate_core=info".parse()?)
                .add_directive("extract_components=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = ExtractorConfig::default().with_output_dir(&cli.out_dir);
    if let Some(ext) = &cli.ext {
        config = config.with_extension(ext.as_str());
    }
    let extractor = ComponentExtractor::new(config);

    let mut paths = Vec::new();
    for input in &cli.inputs {
        paths.extend(file_utils::expand_input(input)?);
    }

    let mut memory = MemorySink::new();
    let mut directory = DirectorySink::new();
    let sink: &mut dyn ArtifactSink = if cli.dry_run {
        &mut memory
    } else {
        &mut directory
    };

    let mut reports = Vec::with_capacity(paths.len());
    for path in &paths {
        let unit = SourceUnit::read(path)?;
        let report = extractor
            .run(&unit, sink)
            .with_context(|| format!("Failed to extract components from '{}'", path.display()))?;
        if !cli.dry_run && !cli.json {
            for written in &report.written {
                println!("{}", written.display());
            }
        }
        reports.push(report);
    }
    let total: usize = reports.iter().map(|report| report.artifacts.len()).sum();

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reports).context("Failed to serialize reports")?
        );
    } else if cli.dry_run {
        for (path, content) in memory.files() {
            println!("{}\t{} bytes", path.display(), content.len());
        }
    }

    info!(
        "✅ Extracted {} artifacts from {} source files",
        total,
        paths.len()
    );
    Ok(())
}
