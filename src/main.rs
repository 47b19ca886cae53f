use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use sqlflow::ir::GraphOptions;
use sqlflow::layout::GridLayout;
use sqlflow::pipeline::{ProcessError, render_json};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sqlflow", version, about = "Turn SQL DDL into a schema diagram graph (JSON)")]
struct Cli {
    /// Input SQL script
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Tables per row in the initial grid
    #[arg(long, default_value_t = 3)]
    columns: usize,

    /// Grid cell size in pixels
    #[arg(long, default_value_t = 350.0)]
    cell_size: f64,

    /// Pretty-print the JSON document
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Process(#[from] ProcessError),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let input = fs::read_to_string(&cli.input).map_err(|source| CliError::Read {
        path: cli.input.clone(),
        source,
    })?;

    let options = GraphOptions {
        grid: GridLayout {
            columns: cli.columns,
            cell_width: cli.cell_size,
            cell_height: cli.cell_size,
        },
        ..GraphOptions::default()
    };
    let json = render_json(&input, &options, cli.pretty)?;

    match cli.output {
        Some(path) => fs::write(&path, &json).map_err(|source| CliError::Write { path, source })?,
        None => println!("{}", json),
    }

    Ok(())
}
