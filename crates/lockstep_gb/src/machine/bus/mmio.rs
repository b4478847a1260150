use super::SystemBus;

impl SystemBus {
    pub(super) fn read_io(&self, addr: u16) -> u8 {
        match addr {
            0xFF00 => self.joypad.read(),
            0xFF01..=0xFF02 => self.serial.read(addr),
            0xFF04..=0xFF07 => self.timer.read(addr),
            0xFF0F => self.interrupts.read_if(),
            0xFF10..=0xFF3F => self.apu.read(addr),
            0xFF46 => self.dma.register(),
            0xFF40..=0xFF45 | 0xFF47..=0xFF4B => self.ppu.read(addr),
            _ => {
                log::trace!("read from unmapped I/O {:04X}", addr);
                0xFF
            }
        }
    }

    pub(super) fn write_io(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF00 => self.joypad.write(value),
            0xFF01..=0xFF02 => self.serial.write(addr, value, &mut self.interrupts),
            0xFF04..=0xFF07 => self.timer.write(addr, value),
            0xFF0F => self.interrupts.write_if(value),
            0xFF10..=0xFF3F => self.apu.write(addr, value),
            0xFF46 => self.dma.start(value),
            0xFF40..=0xFF45 | 0xFF47..=0xFF4B => {
                self.ppu.write(addr, value, &mut self.interrupts)
            }
            _ => log::trace!("write {:02X} to unmapped I/O {:04X} dropped", value, addr),
        }
    }
}
