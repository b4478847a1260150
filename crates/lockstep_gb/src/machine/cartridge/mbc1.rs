/// MBC1 registers: a 5-bit ROM bank, a 2-bit secondary bank and the mode bit
/// deciding whether the secondary bank also applies to $0000-$3FFF and RAM.
#[derive(Clone, Debug)]
pub(super) struct Mbc1 {
    ram_enabled: bool,
    bank1: u8,
    bank2: u8,
    advanced_mode: bool,
}

impl Default for Mbc1 {
    fn default() -> Self {
        Self {
            ram_enabled: false,
            bank1: 1,
            bank2: 0,
            advanced_mode: false,
        }
    }
}

impl Mbc1 {
    pub(super) fn rom_bank(&self, addr: u16) -> usize {
        let high = (self.bank2 as usize) << 5;
        if addr < 0x4000 {
            if self.advanced_mode {
                high
            } else {
                0
            }
        } else {
            high | self.bank1 as usize
        }
    }

    pub(super) fn ram_bank(&self) -> Option<usize> {
        if !self.ram_enabled {
            return None;
        }
        Some(if self.advanced_mode {
            self.bank2 as usize
        } else {
            0
        })
    }

    pub(super) fn write_control(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                // A zero write selects bank 1; the check sees only 5 bits.
                self.bank1 = match value & 0x1F {
                    0 => 1,
                    bank => bank,
                };
            }
            0x4000..=0x5FFF => self.bank2 = value & 0x03,
            _ => self.advanced_mode = value & 0x01 != 0,
        }
    }
}
