use crate::cpu::table::Outcome;
use crate::cpu::{Bus, Cpu, Ime};

impl Cpu {
    pub(in crate::cpu) fn op_nop(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        Outcome::Base
    }

    /// Unused opcodes behave as a one-cycle no-op.
    pub(in crate::cpu) fn op_invalid(&mut self, _bus: &mut dyn Bus, opcode: u8) -> Outcome {
        log::warn!(
            "invalid opcode {:02X} at {:04X}",
            opcode,
            self.regs.pc.wrapping_sub(1)
        );
        Outcome::Base
    }

    /// HALT. With IME off and an interrupt already pending the CPU does not
    /// halt; instead the next opcode fetch fails to advance PC.
    pub(in crate::cpu) fn op_halt(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        let ime_on = matches!(self.ime, Ime::Armed | Ime::Enabled);
        if !ime_on && self.pending_interrupts(bus) != 0 {
            self.halt_bug = true;
        } else {
            self.halted = true;
        }
        Outcome::Base
    }

    /// STOP consumes its padding byte and idles until a joypad line goes low.
    pub(in crate::cpu) fn op_stop(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        let _ = self.fetch8(bus);
        self.stopped = true;
        log::debug!("STOP at {:04X}", self.regs.pc.wrapping_sub(2));
        Outcome::Base
    }

    pub(in crate::cpu) fn op_di(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        self.ime = Ime::Disabled;
        Outcome::Base
    }

    pub(in crate::cpu) fn op_ei(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        if self.ime == Ime::Disabled {
            self.ime = Ime::Pending;
        }
        Outcome::Base
    }
}
