//! Audio collaborator interface and the register-level unit the machine
//! ships with. Sound generation is not modelled; the registers behave as
//! software observes them.

use super::CycleObserver;
use crate::interrupt::InterruptSink;

const NR52: u16 = 0xFF26;
const WAVE_RAM: std::ops::RangeInclusive<u16> = 0xFF30..=0xFF3F;

/// Bits that always read as 1 for $FF10-$FF2F.
#[rustfmt::skip]
const READ_MASKS: [u8; 0x20] = [
    0x80, 0x3F, 0x00, 0xFF, 0xBF, // NR10-NR14
    0xFF, 0x3F, 0x00, 0xFF, 0xBF, // unused, NR21-NR24
    0x7F, 0xFF, 0x9F, 0xFF, 0xBF, // NR30-NR34
    0xFF, 0xFF, 0x00, 0x00, 0xBF, // unused, NR41-NR44
    0x00, 0x00, 0x70,             // NR50, NR51, NR52
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

/// Anything that owns $FF10-$FF3F and listens to the frame sequencer.
pub trait AudioUnit: CycleObserver {
    fn read(&self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, value: u8);
    /// One 512 Hz frame-sequencer step, clocked by the divider.
    fn step_frame_sequencer(&mut self);
}

#[derive(Clone, Debug)]
pub struct ApuRegisters {
    regs: [u8; 0x20],
    wave: [u8; 0x10],
    powered: bool,
    /// Current frame-sequencer position, 0..=7.
    sequencer_step: u8,
    cycles: u64,
}

impl Default for ApuRegisters {
    fn default() -> Self {
        Self {
            regs: [0; 0x20],
            wave: [0; 0x10],
            powered: false,
            sequencer_step: 0,
            cycles: 0,
        }
    }
}

impl ApuRegisters {
    /// Register values left by the DMG boot ROM.
    pub fn post_boot() -> Self {
        let mut apu = Self {
            powered: true,
            ..Self::default()
        };
        for (addr, value) in [
            (0xFF10, 0x80),
            (0xFF11, 0xBF),
            (0xFF12, 0xF3),
            (0xFF14, 0xBF),
            (0xFF16, 0x3F),
            (0xFF19, 0xBF),
            (0xFF1A, 0x7F),
            (0xFF1B, 0xFF),
            (0xFF1C, 0x9F),
            (0xFF1E, 0xBF),
            (0xFF20, 0xFF),
            (0xFF23, 0xBF),
            (0xFF24, 0x77),
            (0xFF25, 0xF3),
        ] {
            apu.regs[(addr - 0xFF10) as usize] = value;
        }
        apu
    }

    pub fn sequencer_step(&self) -> u8 {
        self.sequencer_step
    }

    pub fn elapsed_cycles(&self) -> u64 {
        self.cycles
    }

    fn write_nr52(&mut self, value: u8) {
        let on = value & 0x80 != 0;
        if self.powered && !on {
            // Power-off clears every register except wave RAM.
            self.regs[..(NR52 - 0xFF10) as usize].fill(0);
        }
        if !self.powered && on {
            self.sequencer_step = 0;
        }
        self.powered = on;
    }
}

impl AudioUnit for ApuRegisters {
    fn read(&self, addr: u16) -> u8 {
        if WAVE_RAM.contains(&addr) {
            return self.wave[(addr - 0xFF30) as usize];
        }
        let index = match addr.checked_sub(0xFF10) {
            Some(index) if index < 0x20 => index as usize,
            _ => return 0xFF,
        };
        if addr == NR52 {
            // Channel status bits stay clear: no channel is ever running.
            return READ_MASKS[index] | if self.powered { 0x80 } else { 0 };
        }
        self.regs[index] | READ_MASKS[index]
    }

    fn write(&mut self, addr: u16, value: u8) {
        if WAVE_RAM.contains(&addr) {
            self.wave[(addr - 0xFF30) as usize] = value;
            return;
        }
        match addr {
            NR52 => self.write_nr52(value),
            0xFF10..=0xFF25 if self.powered => self.regs[(addr - 0xFF10) as usize] = value,
            _ => {}
        }
    }

    fn step_frame_sequencer(&mut self) {
        if self.powered {
            self.sequencer_step = (self.sequencer_step + 1) & 0x07;
        }
    }
}

impl CycleObserver for ApuRegisters {
    fn tick(&mut self, cycles: u32, _irq: &mut dyn InterruptSink) {
        self.cycles += cycles as u64;
    }
}
