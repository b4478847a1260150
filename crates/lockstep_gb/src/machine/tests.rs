use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use super::cartridge::tests::banked_rom;
use super::*;
use crate::cpu::{Bus, StepKind, INTERRUPT_DISPATCH_CYCLES};
use crate::DOTS_PER_FRAME;

/// 32 KiB ROM-only image with `program` at $0100 and `patches` applied.
fn rom_with(program: &[u8], patches: &[(usize, &[u8])]) -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    rom[0x134..0x13C].copy_from_slice(b"LOCKSTEP");
    rom[0x147] = 0x00;
    rom[0x100..0x100 + program.len()].copy_from_slice(program);
    for (at, bytes) in patches {
        rom[*at..*at + bytes.len()].copy_from_slice(bytes);
    }
    rom
}

fn machine_with(program: &[u8], patches: &[(usize, &[u8])]) -> GameBoy {
    let config = MachineConfig::builder().ram_init(RamInit::Zeroed).build();
    let mut gb = GameBoy::with_config(config);
    gb.load_rom(&rom_with(program, patches)).unwrap();
    gb
}

const SPIN: &[u8] = &[0x18, 0xFE]; // JR -2

#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn load_rom_reports_header_and_starts_post_boot() {
    let mut gb = GameBoy::new();
    let header = gb.load_rom(&rom_with(SPIN, &[])).unwrap();
    assert_eq!(header.title, "LOCKSTEP");
    assert_eq!(header.controller, Controller::RomOnly);
    assert_eq!(gb.cpu.regs.pc, 0x0100);
    assert_eq!(gb.peek(0x0100), 0x18);
    assert_eq!(gb.cartridge_header(), Some(&header));
}

#[test]
fn load_rom_rejects_bad_images() {
    let mut gb = GameBoy::new();
    assert!(matches!(
        gb.load_rom(&[0u8; 0x100]),
        Err(CartridgeError::TooSmall { len: 0x100 })
    ));
    let mut rom = rom_with(SPIN, &[]);
    rom[0x147] = 0xFC;
    assert!(matches!(
        gb.load_rom(&rom),
        Err(CartridgeError::UnsupportedController(0xFC))
    ));
    assert!(gb.cartridge_header().is_none());
}

#[test]
fn step_frame_stops_at_vblank_entry() {
    let mut gb = machine_with(SPIN, &[]);
    // Post-boot the PPU sits at the top of line 0; VBlank starts 144 lines in.
    assert_eq!(gb.step_frame(), 144 * 456);
    assert_eq!(gb.frame_count(), 1);
    assert_eq!(gb.ppu_mode(), PpuMode::VBlank);
    assert_eq!(gb.step_frame(), DOTS_PER_FRAME);
    assert_eq!(gb.frame_count(), 2);
}

#[test]
fn display_off_freezes_ly_and_blanks_frame() {
    // LD A,$00 ; LDH ($40),A ; JR -2
    let mut gb = machine_with(&[0x3E, 0x00, 0xE0, 0x40, 0x18, 0xFE], &[]);
    let elapsed = gb.step_frame();
    assert!(elapsed >= DOTS_PER_FRAME);
    assert_eq!(gb.frame_count(), 0);
    assert_eq!(gb.peek(0xFF44), 0);
    assert_eq!(gb.peek(0xFF41) & 0x03, 0);
    assert!(gb.framebuffer().iter().all(|&shade| shade == 0));
}

#[test]
fn all_sources_pending_are_serviced_in_priority_order() {
    let program = [
        0x3E, 0x1F, // LD A,$1F
        0xE0, 0xFF, // LDH ($FF),A
        0xE0, 0x0F, // LDH ($0F),A
        0xFB, // EI
        0x00, // NOP
        0x00, // NOP
    ];
    let reti: &[u8] = &[0xD9];
    let mut gb = machine_with(&program, &[(0x40, reti), (0x48, reti)]);

    for _ in 0..4 {
        gb.step();
    }
    // EI's delay covers the following NOP.
    assert_eq!(gb.step(), 4);
    assert_eq!(gb.cpu.regs.pc, 0x0108);

    assert_eq!(gb.step(), INTERRUPT_DISPATCH_CYCLES);
    assert_eq!(gb.cpu.regs.pc, 0x0040);
    assert_eq!(gb.peek(0xFF0F) & 0x1F, 0x1E);

    gb.step(); // RETI
    assert_eq!(gb.cpu.regs.pc, 0x0108);
    assert_eq!(gb.step(), INTERRUPT_DISPATCH_CYCLES);
    assert_eq!(gb.cpu.regs.pc, 0x0048);
    assert_eq!(gb.peek(0xFF0F) & 0x1F, 0x1C);
}

#[test]
fn timer_interrupt_wakes_halt() {
    let program = [
        0x3E, 0x04, // LD A,$04
        0xE0, 0xFF, // LDH ($FF),A   IE = timer
        0xAF, // XOR A
        0xE0, 0x0F, // LDH ($0F),A   IF = 0
        0x3E, 0xFE, // LD A,$FE
        0xE0, 0x05, // LDH ($05),A   TIMA
        0x3E, 0x05, // LD A,$05
        0xE0, 0x07, // LDH ($07),A   TAC = enabled, 16 dots
        0xFB, // EI
        0x76, // HALT
        0x18, 0xFE,
    ];
    let mut gb = machine_with(&program, &[(0x50, SPIN)]);

    let mut reached = false;
    for _ in 0..200 {
        gb.step();
        if gb.cpu.regs.pc == 0x0050 {
            reached = true;
            break;
        }
    }
    assert!(reached, "timer handler never entered");
    assert!(!gb.cpu.halted);
    assert_eq!(gb.peek(0xFF0F) & 0x04, 0);
    // Return address is the instruction after HALT.
    let sp = gb.cpu.regs.sp;
    assert_eq!(gb.bus.read16(sp), 0x0111);
}

#[test]
fn serial_bytes_are_captured() {
    let program = [
        0x3E, b'O', 0xE0, 0x01, 0x3E, 0x81, 0xE0, 0x02, // send 'O'
        0x3E, b'K', 0xE0, 0x01, 0x3E, 0x81, 0xE0, 0x02, // send 'K'
        0x18, 0xFE,
    ];
    let mut gb = machine_with(&program, &[]);
    for _ in 0..10 {
        gb.step();
    }
    assert_eq!(gb.serial_output(), b"OK");
    assert_eq!(gb.peek(0xFF01), 0xFF);
}

#[test]
fn joypad_press_requests_interrupt_and_reads_low() {
    let mut gb = machine_with(SPIN, &[]);
    gb.bus.write8(0xFF0F, 0x00);
    gb.bus.write8(0xFF00, 0x10); // select buttons
    gb.press(Button::Start);
    assert_eq!(gb.peek(0xFF0F) & 0x10, 0x10);
    assert_eq!(gb.peek(0xFF00) & 0x0F, 0x07);
    gb.release(Button::Start);
    assert_eq!(gb.peek(0xFF00) & 0x0F, 0x0F);
}

#[test]
fn stop_resumes_on_button_press() {
    // STOP ; (padding) ; INC A ; JR -2
    let mut gb = machine_with(&[0x10, 0x00, 0x3C, 0x18, 0xFE], &[]);
    gb.bus.write8(0xFF00, 0x10);
    gb.step();
    assert_eq!(gb.cpu.regs.pc, 0x0102);
    for _ in 0..10 {
        assert_eq!(gb.step(), 4);
    }
    assert_eq!(gb.cpu.regs.pc, 0x0102);

    gb.press(Button::A);
    gb.step();
    assert_eq!(gb.cpu.regs.pc, 0x0103);
}

#[test]
fn reset_keeps_cartridge_bank_state() {
    let mut gb = GameBoy::new();
    gb.load_rom(&banked_rom(0x01, 8, 0x00)).unwrap();
    gb.bus.write8(0x2000, 0x05);
    assert_eq!(gb.peek(0x4000), 5);
    gb.bus.write8(0xC000, 0x77);

    for _ in 0..10 {
        gb.step();
    }
    gb.reset();
    assert_eq!(gb.peek(0x4000), 5);
    assert_eq!(gb.cpu.regs.pc, 0x0100);
    assert_eq!(gb.frame_count(), 0);
    assert!(gb.cartridge_header().is_some());
}

#[test]
fn battery_cart_round_trips_save_data() {
    // MBC3 + RAM + battery + RTC, 8 KiB RAM.
    let mut gb = GameBoy::new();
    gb.load_rom(&banked_rom(0x10, 4, 0x02)).unwrap();
    gb.bus.write8(0x0000, 0x0A);
    gb.bus.write8(0x4000, 0x00);
    gb.bus.write8(0xA123, 0x42);

    let save = gb.save_data().unwrap();
    assert_eq!(save.len(), 0x2000 + 48);
    assert_eq!(save[0x123], 0x42);

    let mut other = GameBoy::new();
    other.load_rom(&banked_rom(0x10, 4, 0x02)).unwrap();
    other.load_save(&save);
    other.bus.write8(0x0000, 0x0A);
    assert_eq!(other.peek(0xA123), 0x42);
}

#[test]
fn cartridge_without_battery_has_no_save() {
    let gb = machine_with(SPIN, &[]);
    assert!(gb.save_data().is_none());
}

#[test]
fn cold_boot_starts_at_zero_with_display_off() {
    let config = MachineConfig::builder()
        .ram_init(RamInit::Zeroed)
        .boot_state(BootState::Cold)
        .build();
    let mut gb = GameBoy::with_config(config);
    gb.load_rom(&rom_with(&[], &[(0x0000, SPIN)])).unwrap();
    assert_eq!(gb.cpu.regs.pc, 0x0000);
    assert_eq!(gb.peek(0xFF40), 0x00);
    assert_eq!(gb.peek(0xFF04), 0x00);
    assert!(gb.step_frame() >= DOTS_PER_FRAME);
    assert_eq!(gb.frame_count(), 0);
    assert_eq!(gb.cpu.regs.pc, 0x0000);
}

#[test]
fn div_advances_with_elapsed_cycles() {
    let mut gb = machine_with(SPIN, &[]);
    gb.bus.write8(0xFF04, 0x00);
    // 256 dots per DIV increment; 12 dots per JR.
    for _ in 0..64 {
        gb.step();
    }
    assert_eq!(gb.peek(0xFF04), 3);
}

#[test]
fn debug_session_traces_each_step() {
    let buffer = SharedBuffer::default();
    let mut gb = machine_with(&[0x00, 0x00, 0x18, 0xFE], &[]);
    gb.attach_debug_session(
        DebugSession::builder()
            .trace(Box::new(buffer.clone()) as Box<dyn Write>)
            .build(),
    );
    for _ in 0..3 {
        gb.step();
    }
    let session = gb.detach_debug_session().unwrap();
    assert_eq!(session.steps(), 3);

    let text = String::from_utf8(buffer.0.borrow().clone()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("PC:0100 PCMEM:00,00,18,FE"));
    assert!(lines[2].contains("PC:0102"));

    // Detached: stepping no longer traces.
    gb.step();
    assert_eq!(buffer.0.borrow().iter().filter(|&&b| b == b'\n').count(), 3);
}

fn traced_lines(buffer: &SharedBuffer) -> Vec<String> {
    String::from_utf8(buffer.0.borrow().clone())
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn halted_cycles_are_not_traced() {
    let buffer = SharedBuffer::default();
    // XOR A; LDH ($FF),A; HALT; NOP
    let mut gb = machine_with(&[0xAF, 0xE0, 0xFF, 0x76, 0x00], &[]);
    gb.attach_debug_session(
        DebugSession::builder()
            .trace(Box::new(buffer.clone()) as Box<dyn Write>)
            .build(),
    );
    for _ in 0..6 {
        gb.step();
    }
    assert!(gb.cpu.halted);
    assert_eq!(gb.cpu.last_step(), StepKind::Idle);

    let session = gb.detach_debug_session().unwrap();
    assert_eq!(session.steps(), 6);
    assert_eq!(session.lines(), 3);
    let lines = traced_lines(&buffer);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("PC:0100"));
    assert!(lines[1].contains("PC:0101"));
    assert!(lines[2].contains("PC:0103 PCMEM:76,00"));
}

#[test]
fn interrupt_dispatch_is_not_traced() {
    let buffer = SharedBuffer::default();
    // LD A,$04; LDH ($FF),A; LDH ($0F),A; EI; NOP
    let program = [0x3E, 0x04, 0xE0, 0xFF, 0xE0, 0x0F, 0xFB, 0x00];
    let mut gb = machine_with(&program, &[(0x0050, SPIN)]);
    gb.attach_debug_session(
        DebugSession::builder()
            .trace(Box::new(buffer.clone()) as Box<dyn Write>)
            .build(),
    );
    for _ in 0..5 {
        gb.step();
    }
    assert_eq!(gb.step(), INTERRUPT_DISPATCH_CYCLES);
    assert_eq!(gb.cpu.last_step(), StepKind::Interrupt);
    gb.step();

    let session = gb.detach_debug_session().unwrap();
    assert_eq!(session.steps(), 7);
    let pcs: Vec<&str> = traced_lines(&buffer)
        .iter()
        .map(|line| if line.contains("PC:0050") { "0050" } else { "main" })
        .collect();
    assert_eq!(pcs, ["main", "main", "main", "main", "main", "0050"]);
}

#[test]
fn audio_unit_sees_register_writes() {
    let mut gb = machine_with(SPIN, &[]);
    gb.bus.write8(0xFF24, 0x35);
    assert_eq!(gb.audio().read(0xFF24), 0x35);
    gb.bus.write8(0xFF26, 0x00);
    assert_eq!(gb.audio().read(0xFF24), 0x00);
    assert_eq!(gb.peek(0xFF26), 0x70);
}
