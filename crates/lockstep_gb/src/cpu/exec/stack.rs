use crate::cpu::table::Outcome;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// PUSH BC/DE/HL/AF.
    pub(in crate::cpu) fn op_push(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let value = self.regs.rp2((opcode >> 4) & 0x03);
        self.push_u16(bus, value);
        Outcome::Base
    }

    /// POP BC/DE/HL/AF. The low nibble of F reads back as zero.
    pub(in crate::cpu) fn op_pop(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let value = self.pop_u16(bus);
        self.regs.set_rp2((opcode >> 4) & 0x03, value);
        Outcome::Base
    }
}
