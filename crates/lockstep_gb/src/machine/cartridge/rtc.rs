//! MBC3 real-time clock.

/// Emulated dots per second of wall time.
pub(super) const CYCLES_PER_SECOND: u64 = 4_194_304;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
const DAY_LIMIT: u64 = 0x200;

/// The five clock registers as a unit; the MBC exposes one copy live and
/// a second latched copy to the CPU.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct RtcRegisters {
    pub(super) seconds: u8,
    pub(super) minutes: u8,
    pub(super) hours: u8,
    /// Nine-bit day counter.
    pub(super) days: u16,
    pub(super) halted: bool,
    pub(super) day_carry: bool,
}

impl RtcRegisters {
    /// DH register: bit 0 day bit 8, bit 6 halt, bit 7 day carry.
    fn day_high(&self) -> u8 {
        ((self.days >> 8) as u8 & 0x01)
            | if self.halted { 0x40 } else { 0 }
            | if self.day_carry { 0x80 } else { 0 }
    }

    fn read(&self, reg: u8) -> u8 {
        match reg {
            0x08 => self.seconds,
            0x09 => self.minutes,
            0x0A => self.hours,
            0x0B => self.days as u8,
            0x0C => self.day_high(),
            _ => 0xFF,
        }
    }

    pub(super) fn to_words(self) -> [u32; 5] {
        [
            self.seconds as u32,
            self.minutes as u32,
            self.hours as u32,
            (self.days & 0xFF) as u32,
            self.day_high() as u32,
        ]
    }

    pub(super) fn from_words(words: [u32; 5]) -> Self {
        let dh = words[4] as u8;
        Self {
            seconds: words[0] as u8 & 0x3F,
            minutes: words[1] as u8 & 0x3F,
            hours: words[2] as u8 & 0x1F,
            days: (words[3] as u16 & 0xFF) | (((dh & 0x01) as u16) << 8),
            halted: dh & 0x40 != 0,
            day_carry: dh & 0x80 != 0,
        }
    }

    fn in_range(&self) -> bool {
        self.seconds < 60 && self.minutes < 60 && self.hours < 24
    }

    /// One second, including the wrap-without-carry that out-of-range
    /// values written by software go through.
    fn tick_second(&mut self) {
        if self.seconds != 59 {
            self.seconds = (self.seconds + 1) & 0x3F;
            return;
        }
        self.seconds = 0;
        if self.minutes != 59 {
            self.minutes = (self.minutes + 1) & 0x3F;
            return;
        }
        self.minutes = 0;
        if self.hours != 23 {
            self.hours = (self.hours + 1) & 0x1F;
            return;
        }
        self.hours = 0;
        if self.days as u64 == DAY_LIMIT - 1 {
            self.days = 0;
            self.day_carry = true;
        } else {
            self.days += 1;
        }
    }

    pub(super) fn advance(&mut self, mut seconds: u64) {
        while seconds > 0 && !self.in_range() {
            self.tick_second();
            seconds -= 1;
        }
        if seconds == 0 {
            return;
        }

        let total = self.days as u64 * SECONDS_PER_DAY
            + self.hours as u64 * 3600
            + self.minutes as u64 * 60
            + self.seconds as u64
            + seconds;
        let days = total / SECONDS_PER_DAY;
        let rest = total % SECONDS_PER_DAY;
        self.hours = (rest / 3600) as u8;
        self.minutes = (rest / 60 % 60) as u8;
        self.seconds = (rest % 60) as u8;
        if days >= DAY_LIMIT {
            self.day_carry = true;
        }
        self.days = (days % DAY_LIMIT) as u16;
    }
}

#[derive(Clone, Debug, Default)]
pub(super) struct Rtc {
    pub(super) live: RtcRegisters,
    pub(super) latched: RtcRegisters,
    /// Dots accumulated towards the next second.
    subsecond: u64,
}

impl Rtc {
    /// CPU reads see the latched copy.
    pub(super) fn read(&self, reg: u8) -> u8 {
        self.latched.read(reg)
    }

    pub(super) fn write(&mut self, reg: u8, value: u8) {
        let live = &mut self.live;
        match reg {
            0x08 => {
                live.seconds = value & 0x3F;
                self.subsecond = 0;
            }
            0x09 => live.minutes = value & 0x3F,
            0x0A => live.hours = value & 0x1F,
            0x0B => live.days = (live.days & 0x100) | value as u16,
            0x0C => {
                live.days = (live.days & 0xFF) | (((value & 0x01) as u16) << 8);
                live.halted = value & 0x40 != 0;
                live.day_carry = value & 0x80 != 0;
            }
            _ => {}
        }
    }

    pub(super) fn latch(&mut self) {
        self.latched = self.live;
    }

    pub(super) fn advance_cycles(&mut self, cycles: u64) {
        if self.live.halted {
            return;
        }
        self.subsecond += cycles;
        let seconds = self.subsecond / CYCLES_PER_SECOND;
        self.subsecond %= CYCLES_PER_SECOND;
        if seconds > 0 {
            self.live.advance(seconds);
        }
    }

    /// Catch up on wall time that passed while the machine was not running.
    pub(super) fn advance_seconds(&mut self, seconds: u64) {
        if !self.live.halted {
            self.live.advance(seconds);
        }
    }

    pub(super) fn restore(&mut self, live: RtcRegisters, latched: RtcRegisters) {
        self.live = live;
        self.latched = latched;
        self.subsecond = 0;
    }
}
