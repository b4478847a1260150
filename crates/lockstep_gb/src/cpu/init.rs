use super::{Cpu, Ime, Registers, StepKind};
use crate::machine::BootState;

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// CPU in the state the DMG boot ROM leaves behind at $0100.
    pub fn new() -> Self {
        Self::with_boot_state(BootState::PostBoot)
    }

    pub fn with_boot_state(boot: BootState) -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            ime: Ime::Disabled,
            halted: false,
            stopped: false,
            halt_bug: false,
            last_step: StepKind::Instruction,
        };
        cpu.reset(boot);
        cpu
    }

    pub fn reset(&mut self, boot: BootState) {
        self.regs = Registers::default();
        self.ime = Ime::Disabled;
        self.halted = false;
        self.stopped = false;
        self.halt_bug = false;
        self.last_step = StepKind::Instruction;
        if boot == BootState::PostBoot {
            self.apply_dmg_boot_state();
        }
    }

    fn apply_dmg_boot_state(&mut self) {
        self.regs.a = 0x01;
        self.regs.f = 0xB0; // Z, H, C set
        self.regs.b = 0x00;
        self.regs.c = 0x13;
        self.regs.d = 0x00;
        self.regs.e = 0xD8;
        self.regs.h = 0x01;
        self.regs.l = 0x4D;
        self.regs.sp = 0xFFFE;
        self.regs.pc = 0x0100;
    }
}
