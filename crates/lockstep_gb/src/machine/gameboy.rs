use std::time::{SystemTime, UNIX_EPOCH};

use super::apu::AudioUnit;
use super::cartridge::{Cartridge, CartridgeError, CartridgeHeader};
use super::joypad::Button;
use super::ppu::Mode;
use super::{DebugSession, MachineConfig, SystemBus};
use crate::cpu::Cpu;
use crate::DOTS_PER_FRAME;

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// High-level DMG machine: the CPU, the bus and everything behind it.
///
/// Each [`step`](Self::step) runs one CPU step and then broadcasts its cycle
/// cost to the peripherals, so every component observes the same elapsed
/// time.
pub struct GameBoy {
    pub cpu: Cpu,
    pub(crate) bus: SystemBus,
    config: MachineConfig,
    debug: Option<DebugSession>,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoy {
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    pub fn with_config(config: MachineConfig) -> Self {
        Self {
            cpu: Cpu::with_boot_state(config.boot_state),
            bus: SystemBus::new(&config, None),
            config,
            debug: None,
        }
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Insert a cartridge and restart the machine around it.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<CartridgeHeader, CartridgeError> {
        let cartridge = Cartridge::from_rom(rom)?;
        let header = cartridge.header().clone();
        self.bus = SystemBus::new(&self.config, Some(cartridge));
        self.cpu.reset(self.config.boot_state);
        Ok(header)
    }

    pub fn cartridge_header(&self) -> Option<&CartridgeHeader> {
        self.bus.cartridge().map(Cartridge::header)
    }

    /// Restore battery RAM (and clock) from a save file's bytes.
    pub fn load_save(&mut self, data: &[u8]) {
        match self.bus.cartridge_mut() {
            Some(cartridge) => cartridge.load_save(data, unix_now()),
            None => log::warn!("no cartridge inserted, save data ignored"),
        }
    }

    /// Bytes to persist for a battery-backed cartridge.
    pub fn save_data(&self) -> Option<Vec<u8>> {
        self.bus.cartridge()?.save_data(unix_now())
    }

    /// Raw battery-backed RAM, without the clock block.
    pub fn battery_ram(&self) -> Option<Vec<u8>> {
        self.bus.cartridge()?.ram_dump()
    }

    /// Rebuild every cartridge-independent component. The cartridge and its
    /// bank state survive.
    pub fn reset(&mut self) {
        let cartridge = self.bus.take_cartridge();
        self.bus = SystemBus::new(&self.config, cartridge);
        self.cpu.reset(self.config.boot_state);
    }

    /// Run one CPU step and advance the rest of the machine by its cost.
    /// Returns the dots elapsed.
    pub fn step(&mut self) -> u32 {
        if let Some(session) = self.debug.as_mut() {
            session.before_step(&self.cpu, &self.bus);
        }
        let cycles = self.cpu.step(&mut self.bus);
        if let Some(session) = self.debug.as_mut() {
            session.after_step(&self.cpu);
        }
        self.bus.tick(cycles);
        cycles
    }

    /// Step until the PPU enters VBlank, or for one frame's worth of dots
    /// while the display is off. Returns the dots elapsed.
    pub fn step_frame(&mut self) -> u32 {
        self.bus.ppu.take_frame_ready();
        let mut elapsed = 0;
        while elapsed < DOTS_PER_FRAME {
            elapsed += self.step();
            if self.bus.ppu.take_frame_ready() {
                break;
            }
        }
        elapsed
    }

    /// Last completed frame, one shade (0-3) per pixel, row-major 160x144.
    pub fn framebuffer(&self) -> &[u8] {
        self.bus.ppu.frame()
    }

    pub fn frame_count(&self) -> u64 {
        self.bus.ppu.frame_count()
    }

    pub fn ppu_mode(&self) -> Mode {
        self.bus.ppu.mode()
    }

    pub fn press(&mut self, button: Button) {
        self.bus.joypad.press(button, &mut self.bus.interrupts);
    }

    pub fn release(&mut self, button: Button) {
        self.bus.joypad.release(button);
    }

    /// Every byte sent out of the serial port so far.
    pub fn serial_output(&self) -> &[u8] {
        &self.bus.serial.output
    }

    pub fn audio(&self) -> &dyn AudioUnit {
        self.bus.apu()
    }

    /// Read memory as the CPU would see it right now, without side effects.
    pub fn peek(&self, addr: u16) -> u8 {
        self.bus.peek(addr)
    }

    pub fn attach_debug_session(&mut self, session: DebugSession) {
        self.debug = Some(session);
    }

    pub fn detach_debug_session(&mut self) -> Option<DebugSession> {
        let mut session = self.debug.take()?;
        session.flush();
        Some(session)
    }
}
