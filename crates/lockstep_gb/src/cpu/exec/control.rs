use crate::cpu::table::Outcome;
use crate::cpu::{Bus, Cpu, Ime};

#[inline]
fn taken(branched: bool) -> Outcome {
    if branched {
        Outcome::Taken
    } else {
        Outcome::Base
    }
}

impl Cpu {
    pub(in crate::cpu) fn op_jr(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        self.jump_relative(bus, true);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_jr_cc(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let cond = self.condition(opcode);
        taken(self.jump_relative(bus, cond))
    }

    pub(in crate::cpu) fn op_jp(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        self.jump_absolute(bus, true);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_jp_cc(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let cond = self.condition(opcode);
        taken(self.jump_absolute(bus, cond))
    }

    pub(in crate::cpu) fn op_jp_hl(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        self.regs.pc = self.regs.hl();
        Outcome::Base
    }

    pub(in crate::cpu) fn op_call(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        self.call(bus, true);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_call_cc(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let cond = self.condition(opcode);
        taken(self.call(bus, cond))
    }

    pub(in crate::cpu) fn op_ret(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        self.ret(bus, true);
        Outcome::Base
    }

    pub(in crate::cpu) fn op_ret_cc(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let cond = self.condition(opcode);
        taken(self.ret(bus, cond))
    }

    /// RETI enables interrupts immediately, without the EI delay.
    pub(in crate::cpu) fn op_reti(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        self.ret(bus, true);
        self.ime = Ime::Enabled;
        Outcome::Base
    }

    /// RST n: call to `opcode & $38`.
    pub(in crate::cpu) fn op_rst(&mut self, bus: &mut dyn Bus, opcode: u8) -> Outcome {
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = (opcode & 0x38) as u16;
        Outcome::Base
    }
}
