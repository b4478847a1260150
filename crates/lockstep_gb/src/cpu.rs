mod alu;
mod bus;
mod cb;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;
mod step;
mod table;

pub use alu::{add16, add8, daa, sub8, AluResult};
pub use bus::Bus;
pub use regs::{Flag, Registers};

/// Cost of an interrupt entry in dots (5 M-cycles).
pub const INTERRUPT_DISPATCH_CYCLES: u32 = 20;

/// Interrupt master enable, including the delayed enable armed by `EI`.
///
/// `EI` moves `Disabled` to `Pending`; the end of the `EI` step moves it to
/// `Armed`, and the end of the following instruction to `Enabled`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Ime {
    #[default]
    Disabled,
    Pending,
    Armed,
    Enabled,
}

/// What the most recent [`Cpu::step`] spent its cycles on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StepKind {
    /// An opcode was fetched and executed.
    #[default]
    Instruction,
    /// The PC was pushed and a handler vector entered.
    Interrupt,
    /// One M-cycle passed in HALT or STOP.
    Idle,
}

/// Game Boy CPU core (LR35902).
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    pub(crate) ime: Ime,
    pub halted: bool,
    /// STOP low-power state, left when a joypad input line goes low.
    stopped: bool,
    /// Set by HALT with IME=0 and an interrupt already pending: the next
    /// opcode fetch does not advance PC.
    halt_bug: bool,
    last_step: StepKind,
}

impl Cpu {
    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        let bit = flag as u8;
        (self.regs.f & (1 << bit)) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let bit = flag as u8;
        if value {
            self.regs.f |= 1 << bit;
        } else {
            self.regs.f &= !(1 << bit);
        }
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.f = 0;
    }

    /// Whether interrupts are currently enabled (a pending `EI` does not count).
    #[inline]
    pub fn ime(&self) -> bool {
        self.ime == Ime::Enabled
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    #[inline]
    pub fn last_step(&self) -> StepKind {
        self.last_step
    }
}
