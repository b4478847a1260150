//! The system bus: address decoding, I/O dispatch and OAM DMA, plus the
//! per-step cycle broadcast to every peripheral hanging off it.

mod dma;
mod init;
mod mmio;

use self::dma::Dma;
use super::apu::AudioUnit;
use super::cartridge::Cartridge;
use super::joypad::Joypad;
use super::ppu::Ppu;
use super::serial::Serial;
use super::timer::Timer;
use super::CycleObserver;
use crate::cpu::Bus;
use crate::interrupt::InterruptRegisters;

const WRAM_SIZE: usize = 0x2000;
const HRAM_SIZE: usize = 0x7F;

pub(crate) struct SystemBus {
    cartridge: Option<Cartridge>,
    wram: Box<[u8; WRAM_SIZE]>,
    hram: [u8; HRAM_SIZE],
    pub(crate) interrupts: InterruptRegisters,
    pub(crate) timer: Timer,
    pub(crate) ppu: Ppu,
    apu: Box<dyn AudioUnit>,
    pub(crate) joypad: Joypad,
    pub(crate) serial: Serial,
    dma: Dma,
}

impl SystemBus {
    pub(crate) fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    pub(crate) fn cartridge_mut(&mut self) -> Option<&mut Cartridge> {
        self.cartridge.as_mut()
    }

    pub(crate) fn take_cartridge(&mut self) -> Option<Cartridge> {
        self.cartridge.take()
    }

    pub(crate) fn apu(&self) -> &dyn AudioUnit {
        self.apu.as_ref()
    }

    fn oam_accessible(&self) -> bool {
        !self.dma.blocks_oam() && self.ppu.oam_accessible()
    }

    /// Read as the CPU would see it, without side effects.
    pub(crate) fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => match &self.cartridge {
                Some(cartridge) => cartridge.read(addr),
                None => 0xFF,
            },
            0x8000..=0x9FFF => {
                if self.ppu.vram_accessible() {
                    self.ppu.read_vram(addr)
                } else {
                    0xFF
                }
            }
            0xC000..=0xFDFF => self.wram[(addr & 0x1FFF) as usize],
            0xFE00..=0xFE9F => {
                if self.oam_accessible() {
                    self.ppu.read_oam((addr - 0xFE00) as usize)
                } else {
                    0xFF
                }
            }
            0xFEA0..=0xFEFF => {
                log::trace!("read from unusable area {:04X}", addr);
                0xFF
            }
            0xFF00..=0xFF7F => self.read_io(addr),
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize],
            0xFFFF => self.interrupts.read_ie(),
        }
    }

    fn store(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => {
                if let Some(cartridge) = &mut self.cartridge {
                    cartridge.write(addr, value);
                }
            }
            0x8000..=0x9FFF => {
                if self.ppu.vram_accessible() {
                    self.ppu.write_vram(addr, value);
                }
            }
            0xC000..=0xFDFF => self.wram[(addr & 0x1FFF) as usize] = value,
            0xFE00..=0xFE9F => {
                if self.oam_accessible() {
                    self.ppu.write_oam((addr - 0xFE00) as usize, value);
                }
            }
            0xFEA0..=0xFEFF => {
                log::trace!("write {:02X} to unusable area {:04X} dropped", value, addr);
            }
            0xFF00..=0xFF7F => self.write_io(addr, value),
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize] = value,
            0xFFFF => self.interrupts.write_ie(value),
        }
    }

    /// Broadcast elapsed dots: timer, DMA, PPU, audio, then the cartridge
    /// clock.
    pub(crate) fn tick(&mut self, cycles: u32) {
        self.timer.tick(cycles, &mut self.interrupts);
        for _ in 0..self.timer.take_frame_sequencer_steps() {
            self.apu.step_frame_sequencer();
        }
        self.tick_dma(cycles);
        self.ppu.tick(cycles, &mut self.interrupts);
        self.apu.tick(cycles, &mut self.interrupts);
        if let Some(cartridge) = &mut self.cartridge {
            cartridge.tick(cycles);
        }
    }
}

impl Bus for SystemBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.peek(addr)
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.store(addr, value);
    }
}
