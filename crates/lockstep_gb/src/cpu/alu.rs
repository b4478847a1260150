use super::{Cpu, Flag};

const Z: u8 = 1 << Flag::Z as u8;
const N: u8 = 1 << Flag::N as u8;
const H: u8 = 1 << Flag::H as u8;
const C: u8 = 1 << Flag::C as u8;

/// Value produced by an ALU primitive together with the resulting F bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AluResult<T> {
    pub value: T,
    pub flags: u8,
}

impl<T> AluResult<T> {
    #[inline]
    pub fn zero(&self) -> bool {
        self.flags & Z != 0
    }

    #[inline]
    pub fn subtract(&self) -> bool {
        self.flags & N != 0
    }

    #[inline]
    pub fn half_carry(&self) -> bool {
        self.flags & H != 0
    }

    #[inline]
    pub fn carry(&self) -> bool {
        self.flags & C != 0
    }
}

#[inline]
fn pack(z: bool, n: bool, h: bool, c: bool) -> u8 {
    (if z { Z } else { 0 }) | (if n { N } else { 0 }) | (if h { H } else { 0 }) | (if c { C } else { 0 })
}

/// 8-bit ADD/ADC. Carries are taken from bit 3 and bit 7 of the operands.
pub fn add8(a: u8, b: u8, carry_in: bool) -> AluResult<u8> {
    let cin = carry_in as u8;
    let half = (a & 0x0F) + (b & 0x0F) + cin;
    let full = a as u16 + b as u16 + cin as u16;
    let value = full as u8;
    AluResult {
        value,
        flags: pack(value == 0, false, half > 0x0F, full > 0xFF),
    }
}

/// 8-bit SUB/SBC/CP. Borrows are taken from bit 4 and bit 8.
pub fn sub8(a: u8, b: u8, carry_in: bool) -> AluResult<u8> {
    let cin = carry_in as i16;
    let half = (a & 0x0F) as i16 - (b & 0x0F) as i16 - cin;
    let full = a as i16 - b as i16 - cin;
    let value = full as u8;
    AluResult {
        value,
        flags: pack(value == 0, true, half < 0, full < 0),
    }
}

/// 16-bit add used by `ADD HL,rr`: half-carry from bit 11, carry from bit 15.
///
/// The Z bit of the returned flags is always clear; `ADD HL,rr` leaves the
/// caller's Z untouched.
pub fn add16(a: u16, b: u16) -> AluResult<u16> {
    let half = (a & 0x0FFF) + (b & 0x0FFF) > 0x0FFF;
    let full = a as u32 + b as u32;
    AluResult {
        value: full as u16,
        flags: pack(false, false, half, full > 0xFFFF),
    }
}

/// Decimal adjust after a BCD addition or subtraction.
///
/// `flags` is F as left by the preceding operation. N is preserved, H is
/// always cleared, C is set when the high nibble needed correction.
pub fn daa(a: u8, flags: u8) -> AluResult<u8> {
    let subtract = flags & N != 0;
    let mut adjust = if flags & C != 0 { 0x60 } else { 0x00 };
    if flags & H != 0 {
        adjust |= 0x06;
    }

    let value = if subtract {
        a.wrapping_sub(adjust)
    } else {
        if (a & 0x0F) > 0x09 {
            adjust |= 0x06;
        }
        if a > 0x99 {
            adjust |= 0x60;
        }
        a.wrapping_add(adjust)
    };

    AluResult {
        value,
        flags: pack(value == 0, subtract, false, adjust >= 0x60),
    }
}

impl Cpu {
    #[inline]
    fn apply(&mut self, result: AluResult<u8>) {
        self.regs.a = result.value;
        self.regs.f = result.flags;
    }

    /// Core 8-bit ADD/ADC operation on A.
    pub(super) fn alu_add(&mut self, value: u8, use_carry: bool) {
        let carry = use_carry && self.get_flag(Flag::C);
        self.apply(add8(self.regs.a, value, carry));
    }

    /// Core 8-bit SUB/SBC operation on A.
    pub(super) fn alu_sub(&mut self, value: u8, use_carry: bool) {
        let carry = use_carry && self.get_flag(Flag::C);
        self.apply(sub8(self.regs.a, value, carry));
    }

    #[inline]
    pub(super) fn alu_and(&mut self, value: u8) {
        let result = self.regs.a & value;
        self.regs.a = result;
        self.regs.f = pack(result == 0, false, true, false);
    }

    #[inline]
    pub(super) fn alu_or(&mut self, value: u8) {
        let result = self.regs.a | value;
        self.regs.a = result;
        self.regs.f = pack(result == 0, false, false, false);
    }

    #[inline]
    pub(super) fn alu_xor(&mut self, value: u8) {
        let result = self.regs.a ^ value;
        self.regs.a = result;
        self.regs.f = pack(result == 0, false, false, false);
    }

    /// Compare A with `value`: flags as for `A - value`, A unchanged.
    #[inline]
    pub(super) fn alu_cp(&mut self, value: u8) {
        self.regs.f = sub8(self.regs.a, value, false).flags;
    }

    /// Dispatch on the 3-bit ALU operation field shared by $80-$BF and the
    /// immediate forms.
    pub(super) fn alu_op(&mut self, operation: u8, value: u8) {
        match operation & 0x07 {
            0 => self.alu_add(value, false),
            1 => self.alu_add(value, true),
            2 => self.alu_sub(value, false),
            3 => self.alu_sub(value, true),
            4 => self.alu_and(value),
            5 => self.alu_xor(value),
            6 => self.alu_or(value),
            _ => self.alu_cp(value),
        }
    }

    pub(super) fn alu_daa(&mut self) {
        self.apply(daa(self.regs.a, self.regs.f));
    }

    /// INC r / INC (HL): Z N H updated, C preserved.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (value & 0x0F) == 0x0F);
        result
    }

    /// DEC r / DEC (HL): Z N H updated, C preserved.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, (value & 0x0F) == 0);
        result
    }

    #[inline]
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let result = add16(self.regs.hl(), value);
        let z = self.regs.f & Z;
        self.regs.f = z | result.flags;
        self.regs.set_hl(result.value);
    }

    /// `ADD SP,e8` / `LD HL,SP+e8`: Z and N cleared, H and C from the low byte.
    #[inline]
    pub(super) fn alu_add16_signed(&mut self, base: u16, imm8: u8) -> u16 {
        let low = add8(base as u8, imm8, false);
        self.regs.f = pack(false, false, low.half_carry(), low.carry());
        base.wrapping_add(imm8 as i8 as i16 as u16)
    }

    /// Rotate/shift group shared by the CB table and the A-only forms.
    ///
    /// `op` is the `y` field of a CB opcode in the range 0..=7 (RLC, RRC, RL,
    /// RR, SLA, SRA, SWAP, SRL).
    pub(super) fn alu_shift(&mut self, op: u8, value: u8) -> u8 {
        let carry_in = self.get_flag(Flag::C);
        let (result, carry) = match op & 0x07 {
            0 => (value.rotate_left(1), value & 0x80 != 0),
            1 => (value.rotate_right(1), value & 0x01 != 0),
            2 => ((value << 1) | carry_in as u8, value & 0x80 != 0),
            3 => ((value >> 1) | ((carry_in as u8) << 7), value & 0x01 != 0),
            4 => (value << 1, value & 0x80 != 0),
            5 => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            6 => (value.rotate_left(4), false),
            _ => (value >> 1, value & 0x01 != 0),
        };
        self.regs.f = pack(result == 0, false, false, carry);
        result
    }
}
