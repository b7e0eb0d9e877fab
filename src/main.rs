use clap::Parser;
use std::path::PathBuf;
use std::process;

use apideref::config::{load_options, save_options, DerefOptions, OPTIONS_FILENAME};
use apideref::document::{find_pointers, load_json, load_table};
use apideref::report::{format_report_as_json, format_report_as_text};
use apideref::resolution::Dereferencer;
use apideref::types::PointerTable;
use tracing_subscriber::EnvFilter;

/// Exit code used when circular references were left in the document.
const EXIT_CIRCULAR: i32 = 2;

/// Replace $ref pointers in a parsed API document with their resolved values.
#[derive(Parser)]
#[command(
    name = "apideref",
    about = "Replace $ref pointers in a parsed API document with their resolved values"
)]
struct Cli {
    /// JSON document to dereference
    document: PathBuf,
    /// Pointer table: JSON object mapping pointer strings to resolved values
    #[arg(short, long)]
    table: Option<PathBuf>,
    /// Options file (JSON with `resolve$Refs` / `dereference$Refs`)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Do not replace pointers, print the document unchanged
    #[arg(long)]
    no_dereference: bool,
    /// Do not consult the pointer table, print the document unchanged
    #[arg(long)]
    no_resolve: bool,
    /// Pretty-print the output document
    #[arg(short, long)]
    pretty: bool,
    /// Print a summary to stderr
    #[arg(short, long)]
    report: bool,
    /// Save the effective options to the options file (--config, or
    /// apideref.json in the current directory)
    #[arg(long)]
    write_config: bool,
    /// Summary format (text or json)
    #[arg(short, long, default_value = "text")]
    format: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> apideref::errors::Result<i32> {
    let mut options = match &cli.config {
        Some(path) => load_options(path)?,
        None => DerefOptions::default(),
    };
    if cli.no_dereference {
        options.dereference_refs = false;
    }
    if cli.no_resolve {
        options.resolve_refs = false;
    }
    if cli.write_config {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(OPTIONS_FILENAME));
        save_options(&path, &options)?;
    }

    let document = load_json(&cli.document)?;
    let table = match &cli.table {
        Some(path) => load_table(path)?,
        None => PointerTable::new(),
    };

    let stats = Dereferencer::new(&table, &options).dereference_report(&document)?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    println!("{}", output);

    if cli.report {
        let remaining = find_pointers(&document)?;
        let summary = if cli.format == "json" {
            format_report_as_json(&stats, &remaining)
        } else {
            format_report_as_text(&stats, &remaining)
        };
        eprintln!("{}", summary);
    }

    match stats.into_result() {
        Ok(_) => Ok(0),
        Err(e) if e.is_circular() => {
            eprintln!("Warning: {}", e);
            Ok(EXIT_CIRCULAR)
        }
        Err(e) => Err(e),
    }
}
