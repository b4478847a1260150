use crate::cpu::table::Outcome;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// LD r,r' and the (HL) forms, `$40-$7F` except HALT.
    pub(in crate::cpu) fn op_ld_r_r(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let value = self.read_reg8(bus, opcode & 0x07);
        self.write_reg8(bus, (opcode >> 3) & 0x07, value);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_ld_r_d8(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let value = self.fetch8(bus);
        self.write_reg8(bus, (opcode >> 3) & 0x07, value);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_ld_rr_d16(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let value = self.fetch16(bus);
        self.regs.set_rp(opcode >> 4, value);
        Outcome::Base
    }

    /// Address for `LD (rr),A` / `LD A,(rr)`: BC, DE, HL+, HL-.
    fn indirect_addr(&mut self, opcode: u8) -> u16 {
        match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            _ => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(in crate::cpu) fn op_ld_ind_a(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let addr = self.indirect_addr(opcode);
        bus.write8(addr, self.regs.a);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_ld_a_ind(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let addr = self.indirect_addr(opcode);
        self.regs.a = bus.read8(addr);
        Outcome::Base
    }

    /// LD (a16),SP.
    pub(in crate::cpu) fn op_ld_a16_sp(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        let addr = self.fetch16(bus);
        bus.write16(addr, self.regs.sp);
        Outcome::Base
    }

    /// LDH (a8),A ($E0) and LDH A,(a8) ($F0).
    pub(in crate::cpu) fn op_ldh_a8(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let addr = 0xFF00 | self.fetch8(bus) as u16;
        if opcode == 0xE0 {
            bus.write8(addr, self.regs.a);
        } else {
            self.regs.a = bus.read8(addr);
        }
        Outcome::Base
    }

    /// LD (C),A ($E2) and LD A,(C) ($F2).
    pub(in crate::cpu) fn op_ldh_c(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let addr = 0xFF00 | self.regs.c as u16;
        if opcode == 0xE2 {
            bus.write8(addr, self.regs.a);
        } else {
            self.regs.a = bus.read8(addr);
        }
        Outcome::Base
    }

    /// LD (a16),A ($EA) and LD A,(a16) ($FA).
    pub(in crate::cpu) fn op_ld_a16_a(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let addr = self.fetch16(bus);
        if opcode == 0xEA {
            bus.write8(addr, self.regs.a);
        } else {
            self.regs.a = bus.read8(addr);
        }
        Outcome::Base
    }

    pub(in crate::cpu) fn op_ld_hl_sp_r8(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        let offset = self.fetch8(bus);
        let value = self.alu_add16_signed(self.regs.sp, offset);
        self.regs.set_hl(value);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_ld_sp_hl(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        self.regs.sp = self.regs.hl();
        Outcome::Base
    }
}
