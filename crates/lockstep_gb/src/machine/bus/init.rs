use super::dma::Dma;
use super::{SystemBus, HRAM_SIZE, WRAM_SIZE};
use crate::interrupt::{InterruptFlags, InterruptRegisters};
use crate::machine::apu::ApuRegisters;
use crate::machine::cartridge::Cartridge;
use crate::machine::joypad::Joypad;
use crate::machine::ppu::Ppu;
use crate::machine::serial::Serial;
use crate::machine::timer::Timer;
use crate::machine::{BootState, MachineConfig};

impl SystemBus {
    /// Build a bus in the state selected by `config`.
    ///
    /// `PostBoot` reproduces the I/O values the DMG boot ROM leaves behind at
    /// $0100; `Cold` starts every peripheral from its power-on reset.
    pub(crate) fn new(config: &MachineConfig, cartridge: Option<Cartridge>) -> Self {
        let mut wram = Box::new([0u8; WRAM_SIZE]);
        let mut hram = [0u8; HRAM_SIZE];
        config.ram_init.fill(&mut [&mut wram[..], &mut hram[..]]);

        match config.boot_state {
            BootState::PostBoot => Self {
                cartridge,
                wram,
                hram,
                // The boot ROM leaves a VBlank request behind.
                interrupts: InterruptRegisters {
                    request: InterruptFlags::VBLANK,
                    enable: 0,
                },
                timer: Timer::post_boot(),
                ppu: Ppu::post_boot(),
                apu: Box::new(ApuRegisters::post_boot()),
                joypad: Joypad::default(),
                serial: Serial::post_boot(),
                dma: Dma::new(0xFF),
            },
            BootState::Cold => Self {
                cartridge,
                wram,
                hram,
                interrupts: InterruptRegisters::default(),
                timer: Timer::new(),
                ppu: Ppu::new(),
                apu: Box::new(ApuRegisters::default()),
                joypad: Joypad::default(),
                serial: Serial::default(),
                dma: Dma::new(0x00),
            },
        }
    }
}
