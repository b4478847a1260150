pub mod cpu;
pub mod interrupt;
pub mod machine;

pub use cpu::{Bus, Cpu, StepKind};
pub use interrupt::{Interrupt, InterruptFlags, InterruptSink};
pub use machine::{
    ApuRegisters, AudioUnit, BootState, Button, CartridgeError, CartridgeHeader, Controller,
    CycleObserver, DebugSession, GameBoy, MachineConfig, PpuMode, RamInit,
};

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;

/// Dots (T-cycles) per machine cycle.
pub const DOTS_PER_MCYCLE: u32 = 4;
/// Dots in one full DMG frame (154 lines of 456 dots).
pub const DOTS_PER_FRAME: u32 = 70_224;
