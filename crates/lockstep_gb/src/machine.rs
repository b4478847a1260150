mod apu;
mod bus;
mod cartridge;
mod config;
mod debug;
mod gameboy;
mod joypad;
mod ppu;
mod serial;
mod timer;

pub(crate) use bus::SystemBus;

pub use apu::{ApuRegisters, AudioUnit};
pub use cartridge::{CartridgeError, CartridgeHeader, Controller};
pub use config::{BootState, MachineConfig, RamInit};
pub use debug::DebugSession;
pub use gameboy::GameBoy;
pub use joypad::Button;
pub use ppu::Mode as PpuMode;

use crate::interrupt::InterruptSink;

/// A component that advances by elapsed dots after every CPU step.
///
/// The bus broadcasts each step to its observers in a fixed order (timer,
/// DMA, PPU, audio); interrupts raised on the way land in `irq` and are seen
/// at the next instruction boundary.
pub trait CycleObserver {
    fn tick(&mut self, cycles: u32, irq: &mut dyn InterruptSink);
}

#[cfg(test)]
mod tests;
