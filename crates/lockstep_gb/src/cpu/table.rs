//! Opcode dispatch and cycle tables.
//!
//! Each of the 256 base opcodes and 256 CB-prefixed opcodes maps to a handler
//! with the same signature. Handlers report whether a conditional branch was
//! taken; the cycle cost is looked up here rather than computed inline.

use super::{Bus, Cpu};

/// What a handler did, as far as timing is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Outcome {
    /// Unconditional instruction or a condition that was not met.
    Base,
    /// Conditional control transfer whose condition held.
    Taken,
    /// `$CB` prefix; carries the second opcode byte.
    Prefixed(u8),
}

pub(super) type Handler = fn(&mut Cpu, &mut dyn Bus, u8) -> Outcome;

pub(super) static OPCODE_TABLE: [Handler; 256] = build_base_table();
pub(super) static CB_TABLE: [Handler; 256] = build_cb_table();

/// T-cycles for each base opcode when no branch is taken. `$CB` lists only
/// the prefix fetch; the full cost of a prefixed instruction is in
/// `CB_CYCLES`.
#[rustfmt::skip]
pub(super) const BASE_CYCLES: [u8; 256] = [
//  x0  x1  x2  x3  x4  x5  x6  x7  x8  x9  xA  xB  xC  xD  xE  xF
     4, 12,  8,  8,  4,  4,  8,  4, 20,  8,  8,  8,  4,  4,  8,  4, // 0x
     4, 12,  8,  8,  4,  4,  8,  4, 12,  8,  8,  8,  4,  4,  8,  4, // 1x
     8, 12,  8,  8,  4,  4,  8,  4,  8,  8,  8,  8,  4,  4,  8,  4, // 2x
     8, 12,  8,  8, 12, 12, 12,  4,  8,  8,  8,  8,  4,  4,  8,  4, // 3x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 4x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 5x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 6x
     8,  8,  8,  8,  8,  8,  4,  8,  4,  4,  4,  4,  4,  4,  8,  4, // 7x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 8x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 9x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // Ax
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // Bx
     8, 12, 12, 16, 12, 16,  8, 16,  8, 16, 12,  4, 12, 24,  8, 16, // Cx
     8, 12, 12,  4, 12, 16,  8, 16,  8, 16, 12,  4, 12,  4,  8, 16, // Dx
    12, 12,  8,  4,  4, 16,  8, 16, 16,  4, 16,  4,  4,  4,  8, 16, // Ex
    12, 12,  8,  4,  4, 16,  8, 16, 12,  8, 16,  4,  4,  4,  8, 16, // Fx
];

/// T-cycles for conditional opcodes when the condition holds. Zero for
/// opcodes that never branch conditionally.
pub(super) const TAKEN_CYCLES: [u8; 256] = build_taken_cycles();

/// T-cycles for CB-prefixed opcodes, prefix fetch included.
pub(super) const CB_CYCLES: [u8; 256] = build_cb_cycles();

/// Total cost of an executed instruction.
#[inline]
pub(super) fn cycles_for(opcode: u8, outcome: Outcome) -> u32 {
    let cycles = match outcome {
        Outcome::Base => BASE_CYCLES[opcode as usize],
        Outcome::Taken => TAKEN_CYCLES[opcode as usize],
        Outcome::Prefixed(cb) => CB_CYCLES[cb as usize],
    };
    cycles as u32
}

const fn build_taken_cycles() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut cc = 0;
    while cc < 4 {
        let y = (cc as usize) << 3;
        table[0x20 | y] = 12; // JR cc
        table[0xC0 | y] = 20; // RET cc
        table[0xC2 | y] = 16; // JP cc
        table[0xC4 | y] = 24; // CALL cc
        cc += 1;
    }
    table
}

const fn build_cb_cycles() -> [u8; 256] {
    let mut table = [8u8; 256];
    let mut op = 0;
    while op < 256 {
        if op & 0x07 == 6 {
            // BIT n,(HL) only reads.
            table[op] = if op >> 6 == 1 { 12 } else { 16 };
        }
        op += 1;
    }
    table
}

const fn build_base_table() -> [Handler; 256] {
    let mut table = [Cpu::op_invalid as Handler; 256];
    let mut op = 0;
    while op < 256 {
        table[op] = decode(op as u8);
        op += 1;
    }
    table
}

const fn build_cb_table() -> [Handler; 256] {
    let mut table = [Cpu::cb_shift as Handler; 256];
    let mut op = 0;
    while op < 256 {
        table[op] = match op >> 6 {
            0 => Cpu::cb_shift,
            1 => Cpu::cb_bit,
            2 => Cpu::cb_res,
            _ => Cpu::cb_set,
        };
        op += 1;
    }
    table
}

/// Map an opcode to its handler using the x/y/z/p/q field decomposition.
const fn decode(op: u8) -> Handler {
    let x = op >> 6;
    let y = (op >> 3) & 0x07;
    let z = op & 0x07;
    let p = y >> 1;
    let q = y & 0x01;

    match x {
        0 => match z {
            0 => match y {
                0 => Cpu::op_nop,
                1 => Cpu::op_ld_a16_sp,
                2 => Cpu::op_stop,
                3 => Cpu::op_jr,
                _ => Cpu::op_jr_cc,
            },
            1 if q == 0 => Cpu::op_ld_rr_d16,
            1 => Cpu::op_add_hl_rr,
            2 if q == 0 => Cpu::op_ld_ind_a,
            2 => Cpu::op_ld_a_ind,
            3 if q == 0 => Cpu::op_inc16,
            3 => Cpu::op_dec16,
            4 => Cpu::op_inc8,
            5 => Cpu::op_dec8,
            6 => Cpu::op_ld_r_d8,
            _ => match y {
                0..=3 => Cpu::op_rotate_a,
                4 => Cpu::op_daa,
                5 => Cpu::op_cpl,
                6 => Cpu::op_scf,
                _ => Cpu::op_ccf,
            },
        },
        1 if op == 0x76 => Cpu::op_halt,
        1 => Cpu::op_ld_r_r,
        2 => Cpu::op_alu_r,
        _ => match z {
            0 => match y {
                0..=3 => Cpu::op_ret_cc,
                4 | 6 => Cpu::op_ldh_a8,
                5 => Cpu::op_add_sp_r8,
                _ => Cpu::op_ld_hl_sp_r8,
            },
            1 if q == 0 => Cpu::op_pop,
            1 => match p {
                0 => Cpu::op_ret,
                1 => Cpu::op_reti,
                2 => Cpu::op_jp_hl,
                _ => Cpu::op_ld_sp_hl,
            },
            2 => match y {
                0..=3 => Cpu::op_jp_cc,
                4 | 6 => Cpu::op_ldh_c,
                _ => Cpu::op_ld_a16_a,
            },
            3 => match y {
                0 => Cpu::op_jp,
                1 => Cpu::op_prefix_cb,
                6 => Cpu::op_di,
                7 => Cpu::op_ei,
                _ => Cpu::op_invalid,
            },
            4 if y < 4 => Cpu::op_call_cc,
            4 => Cpu::op_invalid,
            5 if q == 0 => Cpu::op_push,
            5 if p == 0 => Cpu::op_call,
            5 => Cpu::op_invalid,
            6 => Cpu::op_alu_d8,
            _ => Cpu::op_rst,
        },
    }
}
