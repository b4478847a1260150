use super::rtc::Rtc;

/// MBC3 registers. The $4000-$5FFF select maps either a RAM bank (0-3) or
/// one of the clock registers ($08-$0C) into $A000-$BFFF.
#[derive(Clone, Debug)]
pub(super) struct Mbc3 {
    ram_enabled: bool,
    rom_bank: u8,
    select: u8,
    /// The previous latch-register write was $00.
    latch_armed: bool,
    pub(super) rtc: Option<Rtc>,
}

impl Mbc3 {
    pub(super) fn new(rtc: Option<Rtc>) -> Self {
        Self {
            ram_enabled: false,
            rom_bank: 1,
            select: 0,
            latch_armed: false,
            rtc,
        }
    }

    pub(super) fn rom_bank(&self, addr: u16) -> usize {
        if addr < 0x4000 {
            0
        } else {
            self.rom_bank as usize
        }
    }

    pub(super) fn ram_bank(&self) -> Option<usize> {
        (self.ram_enabled && self.select <= 0x03).then_some(self.select as usize)
    }

    /// Clock register read, when one is mapped. Unmapped clock selects on a
    /// cart without a clock read $FF.
    pub(super) fn read_rtc(&self) -> Option<u8> {
        if !(0x08..=0x0C).contains(&self.select) {
            return None;
        }
        if !self.ram_enabled {
            return Some(0xFF);
        }
        Some(self.rtc.as_ref().map_or(0xFF, |rtc| rtc.read(self.select)))
    }

    /// Returns true when the write was consumed by the clock select.
    pub(super) fn write_rtc(&mut self, value: u8) -> bool {
        if !(0x08..=0x0C).contains(&self.select) {
            return false;
        }
        if self.ram_enabled {
            if let Some(rtc) = self.rtc.as_mut() {
                rtc.write(self.select, value);
            }
        }
        true
    }

    pub(super) fn write_control(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                self.rom_bank = match value & 0x7F {
                    0 => 1,
                    bank => bank,
                };
            }
            0x4000..=0x5FFF => self.select = value,
            _ => {
                if self.latch_armed && value == 0x01 {
                    if let Some(rtc) = self.rtc.as_mut() {
                        rtc.latch();
                    }
                }
                self.latch_armed = value == 0x00;
            }
        }
    }
}
