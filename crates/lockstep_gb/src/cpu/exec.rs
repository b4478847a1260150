//! Base-opcode handlers, grouped by instruction family.
//!
//! Every handler has the `Handler` signature from `table.rs` and receives the
//! opcode byte so one function can serve a whole row or column.

mod arith;
mod control;
mod load;
mod stack;
mod system;
