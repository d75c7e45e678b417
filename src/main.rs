// src/main.rs
//
// kfont-html — convert HTML with <kFont> tags to styled text and dump it
//
// Output: the text (debug-quoted) on the first line, then one line per span:
//   <start>..<end> <kind> <covered text>
//
// CLI flags:
//   --lines          : read input as a line stream; every line ends with a break
//   --click OFFSET   : activate clickable spans at OFFSET (repeatable)
// Logging goes to stderr, filtered by RUST_LOG (default: warn).

use clap::{ArgAction, Parser};
use kfont_html::{format, load, ClickListener};
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Treat input as lines, ending each with a line break
    #[arg(long, action = ArgAction::SetTrue)]
    lines: bool,

    /// Activate clickable spans at this byte offset
    #[arg(long = "click", value_name = "OFFSET")]
    clicks: Vec<usize>,

    /// Input file (default: stdin)
    input: Option<PathBuf>,
}

fn run(cli: &Cli) -> kfont_html::Result<()> {
    let listener = ClickListener::new(|flag| println!("click: {flag}"));

    let text = match (&cli.input, cli.lines) {
        (Some(path), true) => load(BufReader::new(File::open(path)?), Some(listener))?,
        (None, true) => load(io::stdin().lock(), Some(listener))?,
        (Some(path), false) => format(&fs::read_to_string(path)?, Some(listener))?,
        (None, false) => {
            let mut src = String::new();
            io::stdin().read_to_string(&mut src)?;
            format(&src, Some(listener))?
        }
    };

    print!("{text}");
    for &offset in &cli.clicks {
        if text.click(offset) == 0 {
            tracing::info!(offset, "nothing clickable");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
