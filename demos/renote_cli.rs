//! Renote a BMS chart from the command line.
//!
//! ```sh
//! cargo run --example renote_cli -- song.bms overrides.json -o song_renoted.bms
//! ```
//!
//! The request file is the JSON form of `RenoteRequest`, such as
//! `{ "newNotes": { "1:480": { "K1": { "value": "BB" } } } }`.

use std::path::PathBuf;

use bms_renote::renote::prelude::*;
use clap::Parser;

/// Configuration parameters
#[derive(Parser, Debug)]
#[command(name = "renote_cli")]
#[command(about = "Moves notes of a BMS chart into playable channels", long_about = None)]
struct Config {
    /// Chart file path
    #[arg(value_name = "FILE")]
    chart_path: PathBuf,

    /// Request file path (JSON)
    #[arg(value_name = "REQUEST")]
    request_path: PathBuf,

    /// Output file path, defaults to standard output
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

fn main() -> Result<(), String> {
    let config = Config::parse();

    let source = std::fs::read(&config.chart_path)
        .map_err(|e| format!("Failed to read {}: {e}", config.chart_path.display()))?;
    let request_text = std::fs::read_to_string(&config.request_path)
        .map_err(|e| format!("Failed to read {}: {e}", config.request_path.display()))?;
    let request = RenoteRequest::from_json(&request_text).map_err(|e| e.to_string())?;

    let RenoteOutput { bytes, warnings } = renote(&source, &request);

    #[cfg(feature = "diagnostics")]
    emit_renote_warnings(
        &config.chart_path.to_string_lossy(),
        &source,
        &warnings,
    );
    #[cfg(not(feature = "diagnostics"))]
    for warning in &warnings {
        eprintln!("{warning}");
    }

    match config.output {
        Some(path) => std::fs::write(&path, bytes)
            .map_err(|e| format!("Failed to write {}: {e}", path.display())),
        None => {
            use std::io::Write;
            std::io::stdout()
                .write_all(&bytes)
                .map_err(|e| format!("Failed to write output: {e}"))
        }
    }
}
