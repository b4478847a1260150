//! Cartridge image, bank controllers and battery-backed save data.

mod header;
mod mbc1;
mod mbc3;
mod mbc5;
mod rtc;
mod save;

pub use header::{CartridgeHeader, Controller};

use mbc1::Mbc1;
use mbc3::Mbc3;
use mbc5::Mbc5;
use rtc::Rtc;

const ROM_BANK_SIZE: usize = 0x4000;
const RAM_BANK_SIZE: usize = 0x2000;

#[derive(Debug, thiserror::Error)]
pub enum CartridgeError {
    #[error("ROM image is {len} bytes, too small to hold a cartridge header")]
    TooSmall { len: usize },
    #[error("unsupported cartridge type ${0:02X}")]
    UnsupportedController(u8),
}

/// Bank controller state. Each variant turns a CPU address into an offset
/// into ROM or RAM from its own registers alone.
#[derive(Clone, Debug)]
enum Mbc {
    RomOnly,
    Mbc1(Mbc1),
    Mbc3(Mbc3),
    Mbc5(Mbc5),
}

#[derive(Clone, Debug)]
pub(crate) struct Cartridge {
    header: CartridgeHeader,
    rom: Vec<u8>,
    ram: Vec<u8>,
    mbc: Mbc,
}

impl Cartridge {
    pub(crate) fn from_rom(rom: &[u8]) -> Result<Self, CartridgeError> {
        let header = CartridgeHeader::parse(rom)?;
        let mbc = match header.controller {
            Controller::RomOnly => Mbc::RomOnly,
            Controller::Mbc1 => Mbc::Mbc1(Mbc1::default()),
            Controller::Mbc3 => Mbc::Mbc3(Mbc3::new(header.has_rtc.then(Rtc::default))),
            Controller::Mbc5 => Mbc::Mbc5(Mbc5::default()),
        };
        log::info!(
            "cartridge \"{}\": {:?}, {} ROM banks, {} bytes RAM{}{}",
            header.title,
            header.controller,
            header.rom_bank_count,
            header.ram_size,
            if header.has_battery { ", battery" } else { "" },
            if header.has_rtc { ", RTC" } else { "" },
        );
        Ok(Self {
            ram: vec![0; header.ram_size],
            rom: rom.to_vec(),
            header,
            mbc,
        })
    }

    pub(crate) fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    fn rom_byte(&self, bank: usize, addr: u16) -> u8 {
        let offset = bank * ROM_BANK_SIZE + (addr as usize & (ROM_BANK_SIZE - 1));
        self.rom[offset % self.rom.len()]
    }

    fn ram_offset(&self, bank: usize, addr: u16) -> Option<usize> {
        if self.ram.is_empty() {
            return None;
        }
        let offset = bank * RAM_BANK_SIZE + (addr as usize & (RAM_BANK_SIZE - 1));
        Some(offset % self.ram.len())
    }

    /// Read from $0000-$7FFF or $A000-$BFFF.
    pub(crate) fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => {
                let bank = match &self.mbc {
                    Mbc::RomOnly => (addr as usize) / ROM_BANK_SIZE,
                    Mbc::Mbc1(m) => m.rom_bank(addr),
                    Mbc::Mbc3(m) => m.rom_bank(addr),
                    Mbc::Mbc5(m) => m.rom_bank(addr),
                };
                self.rom_byte(bank, addr)
            }
            0xA000..=0xBFFF => {
                let bank = match &self.mbc {
                    Mbc::RomOnly => Some(0),
                    Mbc::Mbc1(m) => m.ram_bank(),
                    Mbc::Mbc3(m) => {
                        if let Some(value) = m.read_rtc() {
                            return value;
                        }
                        m.ram_bank()
                    }
                    Mbc::Mbc5(m) => m.ram_bank(),
                };
                bank.and_then(|bank| self.ram_offset(bank, addr))
                    .map_or(0xFF, |offset| self.ram[offset])
            }
            _ => 0xFF,
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => match &mut self.mbc {
                Mbc::RomOnly => {}
                Mbc::Mbc1(m) => m.write_control(addr, value),
                Mbc::Mbc3(m) => m.write_control(addr, value),
                Mbc::Mbc5(m) => m.write_control(addr, value),
            },
            0xA000..=0xBFFF => {
                let bank = match &mut self.mbc {
                    Mbc::RomOnly => Some(0),
                    Mbc::Mbc1(m) => m.ram_bank(),
                    Mbc::Mbc3(m) => {
                        if m.write_rtc(value) {
                            return;
                        }
                        m.ram_bank()
                    }
                    Mbc::Mbc5(m) => m.ram_bank(),
                };
                if let Some(offset) = bank.and_then(|bank| self.ram_offset(bank, addr)) {
                    self.ram[offset] = value;
                }
            }
            _ => {}
        }
    }

    /// Advance the real-time clock, if any, by emulated dots.
    pub(crate) fn tick(&mut self, cycles: u32) {
        if let Some(rtc) = self.rtc_mut() {
            rtc.advance_cycles(cycles as u64);
        }
    }

    fn rtc(&self) -> Option<&Rtc> {
        match &self.mbc {
            Mbc::Mbc3(m) => m.rtc.as_ref(),
            _ => None,
        }
    }

    fn rtc_mut(&mut self) -> Option<&mut Rtc> {
        match &mut self.mbc {
            Mbc::Mbc3(m) => m.rtc.as_mut(),
            _ => None,
        }
    }

    /// Battery-backed RAM contents, if the cartridge keeps any.
    pub(crate) fn ram_dump(&self) -> Option<Vec<u8>> {
        (self.header.has_battery && !self.ram.is_empty()).then(|| self.ram.clone())
    }
}
