use super::table::{cycles_for, OPCODE_TABLE};
use super::{Bus, Cpu, StepKind};

const P1_ADDR: u16 = 0xFF00;

impl Cpu {
    /// Execute one instruction, one interrupt dispatch, or one idle M-cycle
    /// while halted or stopped. Returns the T-cycles consumed; the caller
    /// advances the rest of the machine by that amount afterwards.
    ///
    /// [`last_step`](Cpu::last_step) reports which of the three happened.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        self.step_dyn(bus)
    }

    fn step_dyn(&mut self, bus: &mut dyn Bus) -> u32 {
        if self.stopped {
            if bus.read8(P1_ADDR) & 0x0F == 0x0F {
                self.last_step = StepKind::Idle;
                return 4;
            }
            self.stopped = false;
        }

        if let Some(cycles) = self.handle_interrupts(bus) {
            self.last_step = StepKind::Interrupt;
            return cycles;
        }

        if self.halted {
            self.last_step = StepKind::Idle;
            return 4;
        }

        self.last_step = StepKind::Instruction;
        let opcode = self.fetch8(bus);
        let outcome = OPCODE_TABLE[opcode as usize](self, bus, opcode);
        self.advance_ime();
        cycles_for(opcode, outcome)
    }
}
