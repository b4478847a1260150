//! Pixel processing unit: the four-mode scanline machine, the LY/LYC/STAT
//! interrupt line and per-line compositing into a double-buffered frame.

mod framebuffer;
mod registers;
mod render;

use bitflags::bitflags;

use framebuffer::FrameBuffer;

use super::CycleObserver;
use crate::interrupt::{Interrupt, InterruptSink};

pub(crate) const DOTS_PER_LINE: u32 = 456;
const OAM_SCAN_DOTS: u32 = 80;
const DRAW_BASE_DOTS: u32 = 172;
const VBLANK_START_LINE: u8 = 144;
const LINES_PER_FRAME: u8 = 154;
/// First line after the display is switched on: HBlank stands in for OAM
/// scan and the line is eight dots short.
const STARTUP_HBLANK_DOTS: u32 = 72;
const STARTUP_LINE_DOTS: u32 = 448;

bitflags! {
    /// LCDC ($FF40).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Lcdc: u8 {
        const BG_WINDOW_ENABLE = 0x01;
        const OBJ_ENABLE = 0x02;
        const OBJ_TALL = 0x04;
        const BG_MAP_HIGH = 0x08;
        const TILE_DATA_8000 = 0x10;
        const WINDOW_ENABLE = 0x20;
        const WINDOW_MAP_HIGH = 0x40;
        const LCD_ENABLE = 0x80;
    }
}

bitflags! {
    /// Writable interrupt-select bits of STAT ($FF41).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct StatSelect: u8 {
        const HBLANK = 0x08;
        const VBLANK = 0x10;
        const OAM_SCAN = 0x20;
        const LYC = 0x40;
    }
}

/// PPU mode as reported in STAT bits 1-0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Drawing = 3,
}

#[derive(Clone, Debug)]
pub(crate) struct Ppu {
    vram: Box<[u8; 0x2000]>,
    oam: [u8; 0xA0],

    lcdc: Lcdc,
    stat_select: StatSelect,
    scy: u8,
    scx: u8,
    ly: u8,
    lyc: u8,
    bgp: u8,
    obp0: u8,
    obp1: u8,
    wy: u8,
    wx: u8,

    mode: Mode,
    /// Dot within the current line.
    dot: u32,
    /// Dot at which the current Draw ends (172 + penalty after it began).
    draw_end: u32,
    /// Current line is the shortened first line after LCD enable.
    startup_line: bool,
    /// OR of all enabled STAT sources, for rising-edge detection.
    stat_line: bool,
    /// Window row counter; advances only on lines the window was drawn.
    window_line: u8,

    framebuffer: FrameBuffer,
    frame_ready: bool,
    frame_count: u64,
}

impl Ppu {
    pub(crate) fn new() -> Self {
        Self {
            vram: Box::new([0; 0x2000]),
            oam: [0; 0xA0],
            lcdc: Lcdc::empty(),
            stat_select: StatSelect::empty(),
            scy: 0,
            scx: 0,
            ly: 0,
            lyc: 0,
            bgp: 0,
            obp0: 0,
            obp1: 0,
            wy: 0,
            wx: 0,
            mode: Mode::HBlank,
            dot: 0,
            draw_end: 0,
            startup_line: false,
            stat_line: false,
            window_line: 0,
            framebuffer: FrameBuffer::new(),
            frame_ready: false,
            frame_count: 0,
        }
    }

    /// State at $0100 after the boot ROM: display on, first visible line of
    /// a fresh frame, BGP=$FC.
    pub(crate) fn post_boot() -> Self {
        let mut ppu = Self::new();
        ppu.lcdc = Lcdc::from_bits_retain(0x91);
        ppu.bgp = 0xFC;
        ppu.mode = Mode::OamScan;
        ppu
    }

    #[inline]
    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    fn lcd_on(&self) -> bool {
        self.lcdc.contains(Lcdc::LCD_ENABLE)
    }

    pub(crate) fn frame(&self) -> &[u8] {
        self.framebuffer.front()
    }

    pub(crate) fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Whether a frame completed since the last call.
    pub(crate) fn take_frame_ready(&mut self) -> bool {
        std::mem::take(&mut self.frame_ready)
    }

    /// Recompute the STAT interrupt line; a rising edge requests LCD STAT.
    pub(crate) fn update_stat_line(&mut self, irq: &mut dyn InterruptSink) {
        let select = self.stat_select;
        let line = self.lcd_on()
            && ((self.ly == self.lyc && select.contains(StatSelect::LYC))
                || match self.mode {
                    Mode::HBlank => {
                        select.contains(StatSelect::HBLANK) && !self.in_startup_hblank()
                    }
                    Mode::VBlank => select.contains(StatSelect::VBLANK),
                    Mode::OamScan => select.contains(StatSelect::OAM_SCAN),
                    Mode::Drawing => false,
                });
        if line && !self.stat_line {
            irq.request(Interrupt::LcdStat);
        }
        self.stat_line = line;
    }

    /// The HBlank that opens the first line after the LCD is enabled reads as
    /// mode 0 but does not drive the STAT line.
    fn in_startup_hblank(&self) -> bool {
        self.startup_line && self.mode == Mode::HBlank && self.dot < STARTUP_HBLANK_DOTS
    }

    fn set_mode(&mut self, mode: Mode, irq: &mut dyn InterruptSink) {
        self.mode = mode;
        self.update_stat_line(irq);
    }

    fn enter_draw(&mut self, irq: &mut dyn InterruptSink) {
        let penalty = self.render_line();
        self.draw_end = self.dot + DRAW_BASE_DOTS + penalty;
        self.set_mode(Mode::Drawing, irq);
    }

    fn line_length(&self) -> u32 {
        if self.startup_line {
            STARTUP_LINE_DOTS
        } else {
            DOTS_PER_LINE
        }
    }

    fn next_line(&mut self, irq: &mut dyn InterruptSink) {
        self.dot = 0;
        self.startup_line = false;
        self.ly += 1;

        if self.ly == LINES_PER_FRAME {
            self.ly = 0;
            self.window_line = 0;
        }

        if self.ly == VBLANK_START_LINE {
            self.framebuffer.swap();
            self.frame_ready = true;
            self.frame_count += 1;
            irq.request(Interrupt::VBlank);
            self.set_mode(Mode::VBlank, irq);
        } else if self.ly < VBLANK_START_LINE {
            self.set_mode(Mode::OamScan, irq);
        } else {
            self.update_stat_line(irq);
        }
    }

    fn tick_dot(&mut self, irq: &mut dyn InterruptSink) {
        self.dot += 1;
        match self.mode {
            Mode::OamScan if self.dot == OAM_SCAN_DOTS => self.enter_draw(irq),
            Mode::Drawing if self.dot == self.draw_end => self.set_mode(Mode::HBlank, irq),
            Mode::HBlank if self.startup_line && self.dot == STARTUP_HBLANK_DOTS => {
                self.enter_draw(irq)
            }
            _ => {}
        }
        if self.dot == self.line_length() {
            self.next_line(irq);
        }
    }

    fn switch_off(&mut self) {
        self.ly = 0;
        self.dot = 0;
        self.mode = Mode::HBlank;
        self.stat_line = false;
        self.startup_line = false;
        self.window_line = 0;
        self.framebuffer.clear();
        log::debug!("LCD off");
    }

    fn switch_on(&mut self, irq: &mut dyn InterruptSink) {
        self.ly = 0;
        self.dot = 0;
        self.startup_line = true;
        self.window_line = 0;
        self.framebuffer.swap();
        self.set_mode(Mode::HBlank, irq);
        log::debug!("LCD on");
    }
}

impl CycleObserver for Ppu {
    fn tick(&mut self, cycles: u32, irq: &mut dyn InterruptSink) {
        if !self.lcd_on() {
            return;
        }
        for _ in 0..cycles {
            self.tick_dot(irq);
        }
    }
}

#[cfg(test)]
mod tests;
