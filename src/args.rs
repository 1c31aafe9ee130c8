use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tennis_results::RunMode;

#[derive(Parser, Debug)]
#[command(name = "tennis-results")]
#[command(about = "Fetches tennis result pages and snapshots their embedded data")]
#[command(version)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Result page URL to fetch (repeatable; replaces the configured sources)
    #[arg(short, long = "source")]
    pub sources: Vec<String>,

    /// Output state file (default: data/results.json)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Run mode
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Fetch every source and store a debug summary
    Debug,
    /// Only update the timestamp
    Timestamp,
}

/// Convert from CLI argument mode to internal run mode
pub fn convert_mode(arg: ModeArg) -> RunMode {
    match arg {
        ModeArg::Debug => RunMode::Debug,
        ModeArg::Timestamp => RunMode::Timestamp,
    }
}
