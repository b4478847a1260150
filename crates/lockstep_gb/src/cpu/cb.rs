use super::table::{Outcome, CB_TABLE};
use super::{Bus, Cpu, Flag};

impl Cpu {
    pub(super) fn op_prefix_cb(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Outcome {
        let cb = self.fetch8(bus);
        CB_TABLE[cb as usize](self, bus, cb);
        Outcome::Prefixed(cb)
    }

    /// RLC/RRC/RL/RR/SLA/SRA/SWAP/SRL r.
    pub(super) fn cb_shift(&mut self, bus: &mut dyn Bus, cb: u8) -> Outcome {
        let z = cb & 0x07;
        let value = self.read_reg8(bus, z);
        let result = self.alu_shift(cb >> 3, value);
        self.write_reg8(bus, z, result);
        Outcome::Base
    }

    /// BIT b,r: Z from the inverted bit, N=0, H=1, C preserved.
    pub(super) fn cb_bit(&mut self, bus: &mut dyn Bus, cb: u8) -> Outcome {
        let bit = (cb >> 3) & 0x07;
        let value = self.read_reg8(bus, cb & 0x07);
        self.set_flag(Flag::Z, value & (1 << bit) == 0);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, true);
        Outcome::Base
    }

    pub(super) fn cb_res(&mut self, bus: &mut dyn Bus, cb: u8) -> Outcome {
        let bit = (cb >> 3) & 0x07;
        let z = cb & 0x07;
        let value = self.read_reg8(bus, z) & !(1 << bit);
        self.write_reg8(bus, z, value);
        Outcome::Base
    }

    pub(super) fn cb_set(&mut self, bus: &mut dyn Bus, cb: u8) -> Outcome {
        let bit = (cb >> 3) & 0x07;
        let z = cb & 0x07;
        let value = self.read_reg8(bus, z) | (1 << bit);
        self.write_reg8(bus, z, value);
        Outcome::Base
    }
}
