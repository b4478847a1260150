use crate::cpu::table::Outcome;
use crate::cpu::{Bus, Cpu, Flag};

impl Cpu {
    pub(in crate::cpu) fn op_alu_r(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let value = self.read_reg8(bus, opcode & 0x07);
        self.alu_op(opcode >> 3, value);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_alu_d8(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let value = self.fetch8(bus);
        self.alu_op(opcode >> 3, value);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_inc8(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let index = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, index);
        let result = self.alu_inc8(value);
        self.write_reg8(bus, index, result);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_dec8(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let index = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, index);
        let result = self.alu_dec8(value);
        self.write_reg8(bus, index, result);
        Outcome::Base
    }

    /// INC rr: no flags.
    pub(in crate::cpu) fn op_inc16(&mut self, _bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let index = opcode >> 4;
        let value = self.regs.rp(index).wrapping_add(1);
        self.regs.set_rp(index, value);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_dec16(&mut self, _bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let index = opcode >> 4;
        let value = self.regs.rp(index).wrapping_sub(1);
        self.regs.set_rp(index, value);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_add_hl_rr(&mut self, _bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let value = self.regs.rp(opcode >> 4);
        self.alu_add16_hl(value);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_add_sp_r8(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        let offset = self.fetch8(bus);
        self.regs.sp = self.alu_add16_signed(self.regs.sp, offset);
        Outcome::Base
    }

    /// RLCA/RRCA/RLA/RRA: like the CB forms on A but Z is always cleared.
    pub(in crate::cpu) fn op_rotate_a(&mut self, _bus: &mut dyn Bus, opcode: u8) -> Outcome {
        self.regs.a = self.alu_shift(opcode >> 3, self.regs.a);
        self.set_flag(Flag::Z, false);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_daa(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        self.alu_daa();
        Outcome::Base
    }

    pub(in crate::cpu) fn op_cpl(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        self.regs.a = !self.regs.a;
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, true);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_scf(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, true);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_ccf(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        let carry = self.get_flag(Flag::C);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, !carry);
        Outcome::Base
    }
}
