use super::{Lcdc, Mode, Ppu, StatSelect};
use crate::interrupt::InterruptSink;

impl Ppu {
    /// VRAM ($8000-$9FFF) is closed to the CPU while pixels are being fetched.
    pub(crate) fn vram_accessible(&self) -> bool {
        self.mode != Mode::Drawing
    }

    /// OAM ($FE00-$FE9F) is closed to the CPU during OAM scan and Draw.
    pub(crate) fn oam_accessible(&self) -> bool {
        matches!(self.mode, Mode::HBlank | Mode::VBlank)
    }

    #[inline]
    pub(crate) fn read_vram(&self, addr: u16) -> u8 {
        self.vram[(addr & 0x1FFF) as usize]
    }

    #[inline]
    pub(crate) fn write_vram(&mut self, addr: u16, value: u8) {
        self.vram[(addr & 0x1FFF) as usize] = value;
    }

    #[inline]
    pub(crate) fn read_oam(&self, index: usize) -> u8 {
        self.oam[index]
    }

    /// Raw OAM store, shared by the CPU path and OAM DMA.
    #[inline]
    pub(crate) fn write_oam(&mut self, index: usize, value: u8) {
        self.oam[index] = value;
    }

    pub(crate) fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF40 => self.lcdc.bits(),
            0xFF41 => {
                let coincidence = (self.ly == self.lyc) as u8;
                0x80 | self.stat_select.bits() | (coincidence << 2) | self.mode as u8
            }
            0xFF42 => self.scy,
            0xFF43 => self.scx,
            0xFF44 => self.ly,
            0xFF45 => self.lyc,
            0xFF47 => self.bgp,
            0xFF48 => self.obp0,
            0xFF49 => self.obp1,
            0xFF4A => self.wy,
            0xFF4B => self.wx,
            _ => 0xFF,
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8, irq: &mut dyn InterruptSink) {
        match addr {
            0xFF40 => self.write_lcdc(value, irq),
            0xFF41 => {
                self.stat_select = StatSelect::from_bits_truncate(value);
                self.update_stat_line(irq);
            }
            0xFF42 => self.scy = value,
            0xFF43 => self.scx = value,
            // LY is read-only.
            0xFF44 => {}
            0xFF45 => {
                self.lyc = value;
                self.update_stat_line(irq);
            }
            0xFF47 => self.bgp = value,
            0xFF48 => self.obp0 = value,
            0xFF49 => self.obp1 = value,
            0xFF4A => self.wy = value,
            0xFF4B => self.wx = value,
            _ => {}
        }
    }

    fn write_lcdc(&mut self, value: u8, irq: &mut dyn InterruptSink) {
        let was_on = self.lcd_on();
        self.lcdc = Lcdc::from_bits_retain(value);
        match (was_on, self.lcd_on()) {
            (true, false) => self.switch_off(),
            (false, true) => self.switch_on(irq),
            _ => {}
        }
    }
}
