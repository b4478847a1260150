use super::Timer;

impl Timer {
    pub(crate) fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF04 => self.div(),
            0xFF05 => self.tima,
            0xFF06 => self.tma,
            0xFF07 => self.tac | 0xF8,
            _ => 0xFF,
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF04 => self.set_counter(0),
            0xFF05 => self.write_tima(value),
            0xFF06 => self.write_tma(value),
            0xFF07 => self.write_tac(value),
            _ => {}
        }
    }

    /// A write landing in the reload M-cycle wins over the reload.
    pub(super) fn write_tima(&mut self, value: u8) {
        self.reload_pending = false;
        self.tima = value;
    }

    /// The pending reload reads TMA when it happens, so a write here is
    /// picked up by it.
    pub(super) fn write_tma(&mut self, value: u8) {
        self.tma = value;
    }

    pub(super) fn write_tac(&mut self, value: u8) {
        self.tac = value & 0x07;
        self.detect_edge();
    }
}
