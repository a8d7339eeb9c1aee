//! `cdiff` - compare two code listings side by side in the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use codediff::highlight::{Highlighter, IrHighlighter};
use codediff::{CodeText, DiffOptions, RenderOptions, compare, normalize, render};
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cdiff",
    version = codediff::VERSION,
    about = "Side-by-side diffs of compiler output",
    long_about = "Compares two code listings (assembly, LLVM IR, typed IR) and \
                  displays an aligned, highlighted, side-by-side diff"
)]
struct Cli {
    /// Old listing
    old: PathBuf,

    /// New listing
    new: PathBuf,

    /// Target width in columns (defaults to the terminal width, or 80
    /// when stdout is not a terminal)
    #[arg(short, long)]
    width: Option<usize>,

    /// Number of spaces tabs expand to
    #[arg(long)]
    tab_width: Option<usize>,

    /// Show 1-based line numbers on both sides (also enabled by the
    /// CODEDIFF_LINE_NUMBERS environment variable)
    #[arg(short = 'n', long)]
    line_numbers: bool,

    /// Similarity tolerance for merging removals and additions into
    /// changed rows, in [0, 1]
    #[arg(short, long, default_value_t = 0.7)]
    tolerance: f64,

    /// Keep the raw alignment, without merging similar lines
    #[arg(long)]
    no_optimize: bool,

    /// Only rewrite unstable identifiers for this symbol name
    #[arg(long, value_name = "SYMBOL")]
    name: Option<String>,

    /// Compare the listings exactly as written, keeping unstable
    /// generated identifiers
    #[arg(long)]
    no_normalize: bool,

    /// Disable syntax highlighting and colored output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose tracing output on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    if cli.no_color {
        colored::control::set_override(false);
    }

    let left = acquire(&cli.old, &cli)?;
    let right = acquire(&cli.new, &cli)?;

    let diff_options = DiffOptions {
        tolerance: cli.tolerance,
        optimize: !cli.no_optimize,
    };
    let diff = compare(left, right, &diff_options)?;

    let render_options =
        RenderOptions::resolve(cli.width, cli.tab_width, cli.line_numbers.then_some(true))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render::side_by_side_diff(&mut out, &diff, &render_options)?;
    out.flush()?;

    Ok(())
}

/// Reads one listing, normalizes its unstable identifiers, and attaches
/// highlighting when color is enabled.
fn acquire(path: &Path, cli: &Cli) -> Result<CodeText> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read listing: {}", path.display()))?;

    let plain = if cli.no_normalize {
        raw
    } else if let Some(name) = &cli.name {
        normalize::strip_unstable_suffix_for(&raw, name)?
    } else {
        normalize::strip_unstable_suffix(&raw)
    };

    if cli.no_color {
        return Ok(CodeText::new(&plain));
    }

    let highlighted = IrHighlighter.highlight(&plain);
    CodeText::with_highlighting(&plain, &highlighted)
}
