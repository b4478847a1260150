use super::{Bus, Cpu, Ime, INTERRUPT_DISPATCH_CYCLES};
use crate::interrupt::Interrupt;

const IF_ADDR: u16 = 0xFF0F;
const IE_ADDR: u16 = 0xFFFF;

impl Cpu {
    /// IE & IF restricted to the five defined sources.
    #[inline]
    pub(super) fn pending_interrupts(&self, bus: &mut dyn Bus) -> u8 {
        bus.read8(IE_ADDR) & bus.read8(IF_ADDR) & 0x1F
    }

    /// Wake from HALT and, with IME set, enter the highest-priority handler.
    ///
    /// Returns the cycles spent on dispatch, or `None` when execution should
    /// continue normally.
    pub(super) fn handle_interrupts(&mut self, bus: &mut dyn Bus) -> Option<u32> {
        if self.pending_interrupts(bus) == 0 {
            return None;
        }

        // HALT ends on any pending interrupt, even with IME clear.
        self.halted = false;

        if self.ime != Ime::Enabled {
            return None;
        }

        self.ime = Ime::Disabled;
        let [lo, hi] = self.regs.pc.to_le_bytes();

        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi);

        // The high-byte push can land on IE; the source is chosen afterwards.
        let target = Interrupt::highest_priority(self.pending_interrupts(bus));

        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);

        match target {
            Some(interrupt) => {
                let flags = bus.read8(IF_ADDR);
                bus.write8(IF_ADDR, flags & !(1 << interrupt.bit()));
                self.regs.pc = interrupt.vector();
                log::trace!("dispatch {:?} from {:04X}", interrupt, u16::from_le_bytes([lo, hi]));
            }
            None => {
                log::debug!("interrupt cancelled by IE write during dispatch");
                self.regs.pc = 0x0000;
            }
        }

        Some(INTERRUPT_DISPATCH_CYCLES)
    }

    /// Move a delayed `EI` one instruction closer to taking effect.
    #[inline]
    pub(super) fn advance_ime(&mut self) {
        self.ime = match self.ime {
            Ime::Pending => Ime::Armed,
            Ime::Armed => Ime::Enabled,
            other => other,
        };
    }
}
