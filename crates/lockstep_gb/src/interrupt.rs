//! Interrupt sources, the IF/IE register pair and the request capability
//! used by peripherals.

use bitflags::bitflags;

bitflags! {
    /// Bit layout shared by IF ($FF0F) and IE ($FFFF).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct InterruptFlags: u8 {
        const VBLANK = 0x01;
        const STAT = 0x02;
        const TIMER = 0x04;
        const SERIAL = 0x08;
        const JOYPAD = 0x10;
    }
}

/// The five maskable interrupt sources, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interrupt {
    VBlank = 0,
    LcdStat = 1,
    Timer = 2,
    Serial = 3,
    Joypad = 4,
}

impl Interrupt {
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    #[inline]
    pub fn bit(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn flag(self) -> InterruptFlags {
        InterruptFlags::from_bits_truncate(1 << self.bit())
    }

    /// Handler address: $40, $48, $50, $58, $60.
    #[inline]
    pub fn vector(self) -> u16 {
        0x0040 + (self.bit() as u16) * 8
    }

    /// Pick the highest-priority source in `pending` (lowest bit index).
    pub fn highest_priority(pending: u8) -> Option<Interrupt> {
        let pending = pending & 0x1F;
        if pending == 0 {
            return None;
        }
        Self::ALL
            .get(pending.trailing_zeros() as usize)
            .copied()
    }
}

/// Capability handed to peripherals so they can raise an interrupt without
/// owning the interrupt registers.
pub trait InterruptSink {
    fn request(&mut self, interrupt: Interrupt);
}

/// The IF/IE register pair as it lives on the bus.
#[derive(Clone, Copy, Debug, Default)]
pub struct InterruptRegisters {
    pub(crate) request: InterruptFlags,
    /// IE keeps all 8 bits; only the low five participate in dispatch.
    pub(crate) enable: u8,
}

impl InterruptRegisters {
    /// IF as observed by the CPU: upper three bits always read as 1.
    #[inline]
    pub fn read_if(&self) -> u8 {
        self.request.bits() | 0xE0
    }

    #[inline]
    pub fn write_if(&mut self, value: u8) {
        self.request = InterruptFlags::from_bits_truncate(value);
    }

    #[inline]
    pub fn read_ie(&self) -> u8 {
        self.enable
    }

    #[inline]
    pub fn write_ie(&mut self, value: u8) {
        self.enable = value;
    }
}

impl InterruptSink for InterruptRegisters {
    fn request(&mut self, interrupt: Interrupt) {
        self.request |= interrupt.flag();
    }
}

impl InterruptSink for InterruptFlags {
    fn request(&mut self, interrupt: Interrupt) {
        *self |= interrupt.flag();
    }
}
