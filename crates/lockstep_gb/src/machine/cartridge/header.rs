use super::{CartridgeError, RAM_BANK_SIZE, ROM_BANK_SIZE};

/// Bank controller family named by header byte $0147.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Controller {
    RomOnly,
    Mbc1,
    Mbc3,
    Mbc5,
}

/// Fields decoded from the cartridge header at $0134-$014F.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartridgeHeader {
    pub title: String,
    pub cartridge_type: u8,
    pub controller: Controller,
    pub rom_bank_count: usize,
    pub ram_bank_count: usize,
    /// External RAM size in bytes; 2 KiB chips are not a whole bank.
    pub ram_size: usize,
    pub has_battery: bool,
    pub has_rtc: bool,
}

impl CartridgeHeader {
    pub fn parse(rom: &[u8]) -> Result<Self, CartridgeError> {
        if rom.len() < 0x150 {
            return Err(CartridgeError::TooSmall { len: rom.len() });
        }

        let cartridge_type = rom[0x147];
        let (controller, has_battery, has_rtc) = match cartridge_type {
            0x00 | 0x08 => (Controller::RomOnly, false, false),
            0x09 => (Controller::RomOnly, true, false),
            0x01 | 0x02 => (Controller::Mbc1, false, false),
            0x03 => (Controller::Mbc1, true, false),
            0x0F | 0x10 => (Controller::Mbc3, true, true),
            0x11 | 0x12 => (Controller::Mbc3, false, false),
            0x13 => (Controller::Mbc3, true, false),
            0x19 | 0x1A | 0x1C | 0x1D => (Controller::Mbc5, false, false),
            0x1B | 0x1E => (Controller::Mbc5, true, false),
            other => return Err(CartridgeError::UnsupportedController(other)),
        };

        let rom_bank_count = match rom[0x148] {
            code @ 0x00..=0x08 => 2usize << code,
            code => {
                let banks = rom.len().div_ceil(ROM_BANK_SIZE);
                log::warn!("unknown ROM size code ${code:02X}; using {banks} banks from image size");
                banks
            }
        };

        let ram_size = match rom[0x149] {
            0x00 => 0,
            0x01 => 0x800,
            0x02 => RAM_BANK_SIZE,
            0x03 => 4 * RAM_BANK_SIZE,
            0x04 => 16 * RAM_BANK_SIZE,
            0x05 => 8 * RAM_BANK_SIZE,
            code => {
                log::warn!("unknown RAM size code ${code:02X}; assuming no RAM");
                0
            }
        };

        Ok(Self {
            title: parse_title(&rom[0x134..0x144]),
            cartridge_type,
            controller,
            rom_bank_count,
            ram_bank_count: ram_size.div_ceil(RAM_BANK_SIZE),
            ram_size,
            has_battery,
            has_rtc,
        })
    }
}

fn parse_title(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| b != 0)
        .filter(|b| b.is_ascii_graphic() || **b == b' ')
        .map(|&b| b as char)
        .collect::<String>()
        .trim_end()
        .to_string()
}
