use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lockstep_gb::{DebugSession, GameBoy, MachineConfig, RamInit, SCREEN_HEIGHT, SCREEN_WIDTH};
use typed_builder::TypedBuilder;

/// What one headless run should do.
#[derive(Debug, TypedBuilder)]
pub struct RunOptions {
    #[builder(setter(into))]
    pub rom: PathBuf,
    /// Battery save file, loaded if present and written back afterwards.
    #[builder(default, setter(strip_option, into))]
    pub save: Option<PathBuf>,
    #[builder(default = 60)]
    pub frames: u64,
    /// Per-instruction register trace output.
    #[builder(default, setter(strip_option, into))]
    pub trace: Option<PathBuf>,
    #[builder(default, setter(strip_option))]
    pub trace_limit: Option<u64>,
    /// Write the last frame as a binary PGM image.
    #[builder(default, setter(strip_option, into))]
    pub dump_frame: Option<PathBuf>,
    #[builder(default)]
    pub zero_ram: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub title: String,
    pub frames: u64,
    pub dots: u64,
    pub serial: Vec<u8>,
}

pub fn run(options: &RunOptions) -> Result<RunSummary> {
    let rom = fs::read(&options.rom)
        .with_context(|| format!("failed to read ROM {}", options.rom.display()))?;

    let ram_init = if options.zero_ram {
        RamInit::Zeroed
    } else {
        RamInit::default()
    };
    let mut gb = GameBoy::with_config(MachineConfig::builder().ram_init(ram_init).build());
    let header = gb
        .load_rom(&rom)
        .with_context(|| format!("failed to load cartridge {}", options.rom.display()))?;

    if let Some(path) = options.save.as_deref().filter(|path| path.exists()) {
        let data =
            fs::read(path).with_context(|| format!("failed to read save {}", path.display()))?;
        gb.load_save(&data);
        log::info!("loaded {} bytes of save data from {}", data.len(), path.display());
    }

    if let Some(path) = &options.trace {
        let file = File::create(path)
            .with_context(|| format!("failed to create trace file {}", path.display()))?;
        let session = DebugSession::builder()
            .trace(Box::new(BufWriter::new(file)) as Box<dyn Write>)
            .trace_limit(options.trace_limit)
            .build();
        gb.attach_debug_session(session);
    }

    let mut dots = 0u64;
    for _ in 0..options.frames {
        dots += gb.step_frame() as u64;
    }

    if let Some(session) = gb.detach_debug_session() {
        log::info!("traced {} of {} steps", session.lines(), session.steps());
    }

    if let Some(path) = &options.save {
        if let Some(data) = gb.save_data() {
            fs::write(path, &data)
                .with_context(|| format!("failed to write save {}", path.display()))?;
            log::info!("wrote {} bytes of save data to {}", data.len(), path.display());
        }
    }

    if let Some(path) = &options.dump_frame {
        write_pgm(path, gb.framebuffer())?;
    }

    Ok(RunSummary {
        title: header.title,
        frames: gb.frame_count(),
        dots,
        serial: gb.serial_output().to_vec(),
    })
}

/// Binary PGM with shade 0 as white and shade 3 as black.
pub fn encode_pgm(frame: &[u8]) -> Vec<u8> {
    let mut out = format!("P5\n{} {}\n3\n", SCREEN_WIDTH, SCREEN_HEIGHT).into_bytes();
    out.extend(frame.iter().map(|&shade| 3 - (shade & 0x03)));
    out
}

fn write_pgm(path: &Path, frame: &[u8]) -> Result<()> {
    fs::write(path, encode_pgm(frame))
        .with_context(|| format!("failed to write frame {}", path.display()))
}
