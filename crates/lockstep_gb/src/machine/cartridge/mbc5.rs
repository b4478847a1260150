/// MBC5 registers: 9-bit ROM bank (bank 0 selectable) and 4-bit RAM bank.
#[derive(Clone, Debug)]
pub(super) struct Mbc5 {
    ram_enabled: bool,
    rom_bank: u16,
    ram_bank: u8,
}

impl Default for Mbc5 {
    fn default() -> Self {
        Self {
            ram_enabled: false,
            rom_bank: 1,
            ram_bank: 0,
        }
    }
}

impl Mbc5 {
    pub(super) fn rom_bank(&self, addr: u16) -> usize {
        if addr < 0x4000 {
            0
        } else {
            self.rom_bank as usize
        }
    }

    pub(super) fn ram_bank(&self) -> Option<usize> {
        self.ram_enabled.then_some(self.ram_bank as usize)
    }

    pub(super) fn write_control(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = value & 0x0F == 0x0A,
            0x2000..=0x2FFF => self.rom_bank = (self.rom_bank & 0x100) | value as u16,
            0x3000..=0x3FFF => {
                self.rom_bank = (self.rom_bank & 0x0FF) | (((value & 0x01) as u16) << 8)
            }
            0x4000..=0x5FFF => self.ram_bank = value & 0x0F,
            _ => {}
        }
    }
}
