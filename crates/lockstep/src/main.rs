use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use lockstep::RunOptions;

/// Run a DMG ROM headless for a number of frames.
#[derive(Parser)]
#[command(name = "lockstep", version)]
struct Args {
    /// Path to ROM file
    rom: PathBuf,

    /// Battery save file (read if present, written on exit)
    #[arg(long)]
    save: Option<PathBuf>,

    /// Number of frames to run
    #[arg(long, default_value_t = 60)]
    frames: u64,

    /// Write a per-instruction register trace to this file
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Stop tracing after this many instructions
    #[arg(long, requires = "trace")]
    trace_limit: Option<u64>,

    /// Print bytes sent over the serial port to stdout
    #[arg(long)]
    serial: bool,

    /// Write the final frame as a PGM image
    #[arg(long)]
    dump_frame: Option<PathBuf>,

    /// Start with zeroed work RAM instead of the noise pattern
    #[arg(long)]
    zero_ram: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    log::info!("Playing ROM path: '{}'", args.rom.display());
    let options = RunOptions {
        rom: args.rom,
        save: args.save,
        frames: args.frames,
        trace: args.trace,
        trace_limit: args.trace_limit,
        dump_frame: args.dump_frame,
        zero_ram: args.zero_ram,
    };
    let summary = lockstep::run(&options)?;

    log::info!(
        "\"{}\": {} frames, {} dots",
        summary.title,
        summary.frames,
        summary.dots
    );
    if args.serial {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&summary.serial)?;
        stdout.flush()?;
    }
    Ok(())
}
