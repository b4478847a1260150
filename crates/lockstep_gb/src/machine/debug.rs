use std::fmt;
use std::io::Write;

use typed_builder::TypedBuilder;

use super::SystemBus;
use crate::cpu::{Cpu, Registers, StepKind};

/// Debug hooks attached to a running [`GameBoy`](super::GameBoy).
///
/// With a trace writer set, one line is emitted per executed instruction in
/// the format used by the Game Boy Doctor log comparison tool. Idle HALT/STOP
/// cycles and interrupt dispatch are counted as steps but not traced. The
/// machine runs the same with or without a session.
#[derive(TypedBuilder)]
pub struct DebugSession {
    #[builder(default, setter(strip_option))]
    trace: Option<Box<dyn Write>>,
    /// Stop tracing after this many lines.
    #[builder(default, setter(into))]
    trace_limit: Option<u64>,
    #[builder(default, setter(skip))]
    steps: u64,
    #[builder(default, setter(skip))]
    lines: u64,
    /// State captured before the step in flight.
    #[builder(default, setter(skip))]
    pending: Option<TraceState>,
}

/// Registers and the four bytes at PC, as seen before a step.
#[derive(Clone, Copy, Debug)]
struct TraceState {
    regs: Registers,
    pcmem: [u8; 4],
}

impl fmt::Display for TraceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.regs;
        let [m0, m1, m2, m3] = self.pcmem;
        write!(
            f,
            "A:{:02X} F:{:02X} B:{:02X} C:{:02X} D:{:02X} E:{:02X} H:{:02X} L:{:02X} \
             SP:{:04X} PC:{:04X} PCMEM:{m0:02X},{m1:02X},{m2:02X},{m3:02X}",
            r.a,
            r.f,
            r.b,
            r.c,
            r.d,
            r.e,
            r.h,
            r.l,
            r.sp,
            r.pc,
        )
    }
}

impl fmt::Debug for DebugSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugSession")
            .field("tracing", &self.trace.is_some())
            .field("trace_limit", &self.trace_limit)
            .field("steps", &self.steps)
            .field("lines", &self.lines)
            .finish()
    }
}

impl DebugSession {
    /// Steps observed so far, traced or not.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Trace lines written so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn is_tracing(&self) -> bool {
        self.trace.is_some()
    }

    /// Called before each CPU step with the state it is about to run from.
    pub(crate) fn before_step(&mut self, cpu: &Cpu, bus: &SystemBus) {
        self.steps += 1;
        if self.trace.is_none() {
            return;
        }
        let pc = cpu.regs.pc;
        self.pending = Some(TraceState {
            regs: cpu.regs,
            pcmem: [0, 1, 2, 3].map(|i| bus.peek(pc.wrapping_add(i))),
        });
    }

    /// Called after the CPU step; writes the captured line if the step
    /// executed an instruction.
    pub(crate) fn after_step(&mut self, cpu: &Cpu) {
        let Some(state) = self.pending.take() else {
            return;
        };
        if cpu.last_step() != StepKind::Instruction {
            return;
        }
        if self.trace_limit.is_some_and(|limit| self.lines >= limit) {
            self.flush();
            self.trace = None;
            log::debug!("trace limit reached after {} lines", self.lines);
            return;
        }
        let Some(out) = self.trace.as_mut() else {
            return;
        };

        if let Err(err) = writeln!(out, "{state}") {
            log::warn!("trace output failed, tracing disabled: {err}");
            self.trace = None;
            return;
        }
        self.lines += 1;
    }

    /// Flush the trace writer, if any.
    pub fn flush(&mut self) {
        if let Some(out) = self.trace.as_mut() {
            if let Err(err) = out.flush() {
                log::warn!("trace flush failed: {err}");
            }
        }
    }
}
