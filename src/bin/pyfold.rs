//! pyfold CLI - structural outlines for Python files
//!
//! Scans a file with the token-stream scanner and prints either the
//! outline (classes, methods, functions with their line ranges) or the
//! fold ranges an editor would collapse.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use pyfold::outline::ModuleIndex;
use pyfold::{build_module_index, fold_ranges, outline_file, render_outline, EngineOptions};

/// Structural outlines for Python files, reconstructed from tokens alone.
#[derive(Parser, Debug)]
#[command(name = "pyfold")]
#[command(version = pyfold::VERSION)]
#[command(about = "Python outline scanning for editor folding")]
#[command(after_help = "EXAMPLES:
  # Show the outline of a module
  pyfold outline app.py

  # Outline as JSON, resolving superclasses against sibling modules
  pyfold outline app.py --format json --modules src/

  # Fold ranges for an editor integration
  pyfold folds app.py --format json
")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the structural outline of a file
    Outline(ScanArgs),

    /// Print the fold ranges of a file
    Folds(ScanArgs),
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Python file to scan
    file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Directory of sibling modules to pre-scan for superclass resolution
    #[arg(long, value_name = "DIR")]
    modules: Option<PathBuf>,

    /// Tab stop width used when measuring indentation
    #[arg(long, default_value_t = 8, value_name = "COLUMNS")]
    tab_size: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Text,
    Json,
}

fn scan(args: &ScanArgs) -> Result<pyfold::ModuleOutline> {
    let options = EngineOptions {
        tab_size: args.tab_size,
        ..EngineOptions::default()
    };
    let index = match &args.modules {
        Some(dir) => build_module_index(dir, &options),
        None => ModuleIndex::new(),
    };
    outline_file(&args.file, &index, &options)
        .with_context(|| format!("failed to scan {}", args.file.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Outline(args) => {
            let result = scan(args)?;
            match args.format {
                OutputFormat::Text => print!("{}", render_outline(&result.outline)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            }
        }
        Command::Folds(args) => {
            let result = scan(args)?;
            let folds = fold_ranges(&result.outline, result.line_count);
            match args.format {
                OutputFormat::Text => {
                    for fold in &folds {
                        println!("{} {}", fold.start, fold.end);
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&folds)?),
            }
        }
    }
    Ok(())
}
