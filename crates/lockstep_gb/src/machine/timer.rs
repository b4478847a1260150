//! Divider and timer circuit.
//!
//! A 16-bit counter advances by 4 every M-cycle; DIV is its upper byte. TIMA
//! counts falling edges of `tap && enable`, where the tap bit is picked by
//! TAC. The same edge detector sees DIV and TAC writes, so those can bump
//! TIMA as on hardware.

use super::CycleObserver;
use crate::interrupt::{Interrupt, InterruptSink};

mod io;

/// Dot-counter value that makes DIV read $AB at $0100 after the boot ROM.
const POST_BOOT_COUNTER: u16 = 0xABCC;

/// DIV bit 4: falling edges clock the audio frame sequencer at 512 Hz.
const FRAME_SEQUENCER_BIT: u16 = 1 << 12;

#[derive(Clone, Debug, Default)]
pub(crate) struct Timer {
    counter: u16,
    tima: u8,
    tma: u8,
    tac: u8,
    /// Last sampled `tap && enable`.
    last_input: bool,
    /// TIMA overflowed during the previous M-cycle; reload and IRQ pending.
    reload_pending: bool,
    /// Dots received but not yet worth a whole M-cycle.
    remainder: u32,
    frame_sequencer_steps: u32,
}

impl Timer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn post_boot() -> Self {
        Self {
            counter: POST_BOOT_COUNTER,
            ..Self::default()
        }
    }

    #[inline]
    pub(crate) fn div(&self) -> u8 {
        (self.counter >> 8) as u8
    }

    #[inline]
    fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    /// Counter bit selected by TAC[1:0].
    #[inline]
    fn tap_mask(&self) -> u16 {
        match self.tac & 0x03 {
            0b00 => 1 << 9,
            0b01 => 1 << 3,
            0b10 => 1 << 5,
            _ => 1 << 7,
        }
    }

    #[inline]
    fn input(&self) -> bool {
        self.enabled() && self.counter & self.tap_mask() != 0
    }

    /// Sample the timer input and count a falling edge.
    fn detect_edge(&mut self) {
        let current = self.input();
        if self.last_input && !current {
            self.increment_tima();
        }
        self.last_input = current;
    }

    fn increment_tima(&mut self) {
        let (next, overflow) = self.tima.overflowing_add(1);
        // On overflow TIMA holds $00 for one M-cycle before the reload.
        self.tima = next;
        if overflow {
            self.reload_pending = true;
        }
    }

    /// Replace the counter, reporting any frame-sequencer edge it causes.
    fn set_counter(&mut self, value: u16) {
        let old = self.counter;
        self.counter = value;
        if old & FRAME_SEQUENCER_BIT != 0 && value & FRAME_SEQUENCER_BIT == 0 {
            self.frame_sequencer_steps += 1;
        }
        self.detect_edge();
    }

    fn tick_mcycle(&mut self, irq: &mut dyn InterruptSink) {
        if self.reload_pending {
            self.reload_pending = false;
            self.tima = self.tma;
            irq.request(Interrupt::Timer);
        }
        self.set_counter(self.counter.wrapping_add(4));
    }

    /// Frame-sequencer steps accumulated since the last call.
    pub(crate) fn take_frame_sequencer_steps(&mut self) -> u32 {
        std::mem::take(&mut self.frame_sequencer_steps)
    }
}

impl CycleObserver for Timer {
    fn tick(&mut self, cycles: u32, irq: &mut dyn InterruptSink) {
        self.remainder += cycles;
        while self.remainder >= 4 {
            self.remainder -= 4;
            self.tick_mcycle(irq);
        }
    }
}
