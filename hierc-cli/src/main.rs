use std::fmt::{self, Write as _};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hierc_core::config::{DEFAULT_OUTPUT_EXTENSION, DEFAULT_SOURCE_EXTENSION};
use hierc_core::{ClassId, Hierarchy, HierarchyConfig};
use tracing::metadata::LevelFilter;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Assemble the class hierarchy below a source directory and report which
/// generated files need to be rewritten.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory walked for class-declaration files.
    #[arg(short, long, value_name = "DIR")]
    source: PathBuf,

    /// Directory mirroring the source tree with generated files.
    #[arg(short, long, value_name = "DIR")]
    dest: PathBuf,

    #[arg(long, help = "Treat every generated file as stale")]
    force: bool,

    #[arg(long, value_name = "EXT", default_value = DEFAULT_SOURCE_EXTENSION)]
    extension: String,

    #[arg(long, value_name = "EXT", default_value = DEFAULT_OUTPUT_EXTENSION)]
    output_extension: String,

    #[arg(
        long,
        value_name = "FORMAT",
        default_value = "ladder",
        help = "Output format: ladder, tree, stale"
    )]
    format: String,

    #[arg(short, long, help = "Log progress to stderr")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    execute(cli)
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let subscriber = tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        );
    tracing::subscriber::set_global_default(subscriber)
        .context("cannot set default tracing subscriber")
}

fn execute(cli: Cli) -> Result<()> {
    let config = HierarchyConfig {
        source_extension: cli.extension,
        output_extension: cli.output_extension,
        ..HierarchyConfig::default()
    };
    let mut hierarchy = Hierarchy::with_config(&cli.source, &cli.dest, config)?;
    hierarchy
        .build()
        .with_context(|| format!("failed to build hierarchy from {}", cli.source.display()))?;
    hierarchy.propagate_modified(cli.force)?;

    let report = match cli.format.as_str() {
        "ladder" => render_ladder(&hierarchy)?,
        "tree" => render_tree(&hierarchy)?,
        "stale" => render_stale(&hierarchy)?,
        other => return Err(anyhow::anyhow!("unsupported format: {other}")),
    };
    print!("{report}");
    Ok(())
}

fn is_modified(hierarchy: &Hierarchy, id: ClassId) -> bool {
    hierarchy.file_of(id).is_some_and(|file| file.modified())
}

fn marker(modified: bool) -> &'static str {
    if modified { " *" } else { "" }
}

fn render_ladder(hierarchy: &Hierarchy) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for id in hierarchy.ordered_classes() {
        writeln!(
            out,
            "{}{}",
            hierarchy.class(id).name(),
            marker(is_modified(hierarchy, id))
        )?;
    }
    Ok(out)
}

fn render_tree(hierarchy: &Hierarchy) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for &root in hierarchy.trees() {
        render_subtree(hierarchy, root, 0, &mut out)?;
    }
    Ok(out)
}

fn render_subtree(
    hierarchy: &Hierarchy,
    id: ClassId,
    depth: usize,
    out: &mut String,
) -> fmt::Result {
    let class = hierarchy.class(id);
    let final_tag = if class.is_final() { " (final)" } else { "" };
    writeln!(
        out,
        "{}{}{}{}",
        "  ".repeat(depth),
        class.name(),
        final_tag,
        marker(is_modified(hierarchy, id))
    )?;
    for &child in class.children() {
        render_subtree(hierarchy, child, depth + 1, out)?;
    }
    Ok(())
}

fn render_stale(hierarchy: &Hierarchy) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for file in hierarchy.registry().modified_files() {
        writeln!(
            out,
            "{}\t{}",
            file.source_class(),
            file.output_path(hierarchy.dest(), &hierarchy.config().output_extension)
                .display()
        )?;
    }
    Ok(out)
}
