use clap::Parser;
use std::error::Error;
use tennis_results::{RunMode, Snapshot};

mod args;
use args::{Args, convert_mode};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let mut snapshot = Snapshot::new();
    if let Some(path) = &args.config {
        snapshot = snapshot.with_config_file(path)?;
    }
    if !args.sources.is_empty() {
        snapshot = snapshot.with_sources(args.sources);
    }
    if let Some(out) = args.out {
        snapshot = snapshot.with_out_path(out);
    }
    if let Some(mode) = args.mode {
        snapshot = snapshot.with_mode(convert_mode(mode));
    }

    let mode = snapshot.config().mode;
    let out_path = snapshot.config().out_path.clone();
    let state = snapshot.run().await?;

    if let Some(records) = state.debug_records() {
        let failed = records.iter().filter(|r| r.is_failed()).count();
        ::log::info!("{} of {} source(s) failed", failed, records.len());
    }

    match mode {
        RunMode::Debug => println!("Wrote {}", out_path.display()),
        RunMode::Timestamp => println!(
            "Wrote {} lastUpdated={}",
            out_path.display(),
            state.last_updated().unwrap_or_default()
        ),
    }

    Ok(())
}
