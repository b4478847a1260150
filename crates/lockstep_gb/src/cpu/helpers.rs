use super::{Bus, Cpu};

impl Cpu {
    /// Read an 8-bit register or (HL) by its 3-bit operand index:
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
    #[inline]
    pub(super) fn read_reg8(&mut self, bus: &mut dyn Bus, index: u8) -> u8 {
        match index & 0x07 {
            0 => self.regs.b,
            1 => self.regs.c,
            2 => self.regs.d,
            3 => self.regs.e,
            4 => self.regs.h,
            5 => self.regs.l,
            6 => bus.read8(self.regs.hl()),
            _ => self.regs.a,
        }
    }

    #[inline]
    pub(super) fn write_reg8(&mut self, bus: &mut dyn Bus, index: u8, value: u8) {
        match index & 0x07 {
            0 => self.regs.b = value,
            1 => self.regs.c = value,
            2 => self.regs.d = value,
            3 => self.regs.e = value,
            4 => self.regs.h = value,
            5 => self.regs.l = value,
            6 => bus.write8(self.regs.hl(), value),
            _ => self.regs.a = value,
        }
    }

    #[inline]
    pub(super) fn fetch8(&mut self, bus: &mut dyn Bus) -> u8 {
        let value = bus.read8(self.regs.pc);
        if self.halt_bug {
            // The byte after HALT is read twice.
            self.halt_bug = false;
        } else {
            self.regs.pc = self.regs.pc.wrapping_add(1);
        }
        value
    }

    #[inline]
    pub(super) fn fetch16(&mut self, bus: &mut dyn Bus) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Push high byte then low byte; memory[SP] ends up holding the low byte.
    #[inline]
    pub(super) fn push_u16(&mut self, bus: &mut dyn Bus, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);
    }

    #[inline]
    pub(super) fn pop_u16(&mut self, bus: &mut dyn Bus) -> u16 {
        let lo = bus.read8(self.regs.sp);
        let hi = bus.read8(self.regs.sp.wrapping_add(1));
        self.regs.sp = self.regs.sp.wrapping_add(2);
        u16::from_le_bytes([lo, hi])
    }

    /// Condition field (bits 4-3) of JR/JP/CALL/RET cc: NZ, Z, NC, C.
    #[inline]
    pub(super) fn condition(&self, opcode: u8) -> bool {
        use super::Flag;
        match (opcode >> 3) & 0x03 {
            0 => !self.get_flag(Flag::Z),
            1 => self.get_flag(Flag::Z),
            2 => !self.get_flag(Flag::C),
            _ => self.get_flag(Flag::C),
        }
    }

    /// JR e8: the operand is always fetched; the displacement is relative to
    /// the address after it.
    pub(super) fn jump_relative(&mut self, bus: &mut dyn Bus, taken: bool) -> bool {
        let offset = self.fetch8(bus) as i8;
        if taken {
            self.regs.pc = self.regs.pc.wrapping_add(offset as i16 as u16);
        }
        taken
    }

    pub(super) fn jump_absolute(&mut self, bus: &mut dyn Bus, taken: bool) -> bool {
        let addr = self.fetch16(bus);
        if taken {
            self.regs.pc = addr;
        }
        taken
    }

    pub(super) fn call(&mut self, bus: &mut dyn Bus, taken: bool) -> bool {
        let addr = self.fetch16(bus);
        if taken {
            let ret = self.regs.pc;
            self.push_u16(bus, ret);
            self.regs.pc = addr;
        }
        taken
    }

    pub(super) fn ret(&mut self, bus: &mut dyn Bus, taken: bool) -> bool {
        if taken {
            self.regs.pc = self.pop_u16(bus);
        }
        taken
    }
}
