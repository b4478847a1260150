use super::*;
use crate::interrupt::Interrupt;
use crate::machine::CycleObserver;
use crate::SCREEN_WIDTH;

#[derive(Default)]
struct Recorder(Vec<Interrupt>);

impl InterruptSink for Recorder {
    fn request(&mut self, interrupt: Interrupt) {
        self.0.push(interrupt);
    }
}

impl Recorder {
    fn count(&self, interrupt: Interrupt) -> usize {
        self.0.iter().filter(|&&i| i == interrupt).count()
    }
}

fn place_object(ppu: &mut Ppu, slot: usize, y: u8, x: u8, tile: u8, attrs: u8) {
    for (offset, value) in [y, x, tile, attrs].into_iter().enumerate() {
        ppu.write_oam(slot * 4 + offset, value);
    }
}

/// Dots spent in Draw on the current (fresh) line.
fn draw_length(ppu: &mut Ppu) -> u32 {
    let mut irq = Recorder::default();
    ppu.tick(OAM_SCAN_DOTS, &mut irq);
    assert_eq!(ppu.mode(), Mode::Drawing);
    let mut dots = 0;
    while ppu.mode() == Mode::Drawing {
        ppu.tick(1, &mut irq);
        dots += 1;
    }
    dots
}

#[test]
fn visible_line_runs_oam_scan_draw_hblank() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    assert_eq!(ppu.mode(), Mode::OamScan);

    ppu.tick(79, &mut irq);
    assert_eq!(ppu.mode(), Mode::OamScan);
    ppu.tick(1, &mut irq);
    assert_eq!(ppu.mode(), Mode::Drawing);
    ppu.tick(172, &mut irq);
    assert_eq!(ppu.mode(), Mode::HBlank);
    ppu.tick(203, &mut irq);
    assert_eq!(ppu.ly, 0);
    ppu.tick(1, &mut irq);
    assert_eq!(ppu.ly, 1);
    assert_eq!(ppu.mode(), Mode::OamScan);
}

#[test]
fn vblank_entry_requests_interrupt_and_publishes_frame() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();

    ppu.tick(144 * DOTS_PER_LINE, &mut irq);
    assert_eq!(ppu.ly, 144);
    assert_eq!(ppu.mode(), Mode::VBlank);
    assert_eq!(irq.count(Interrupt::VBlank), 1);
    assert_eq!(ppu.frame_count(), 1);
    assert!(ppu.take_frame_ready());
    assert!(!ppu.take_frame_ready());

    ppu.tick(10 * DOTS_PER_LINE, &mut irq);
    assert_eq!(ppu.ly, 0);
    assert_eq!(ppu.mode(), Mode::OamScan);
    assert_eq!(irq.count(Interrupt::VBlank), 1);
}

#[test]
fn full_frame_is_70224_dots() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.tick(crate::DOTS_PER_FRAME - 1, &mut irq);
    assert_eq!(ppu.ly, 153);
    ppu.tick(1, &mut irq);
    assert_eq!(ppu.ly, 0);
    assert_eq!(ppu.mode(), Mode::OamScan);
}

#[test]
fn hblank_select_fires_on_each_rising_edge() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF41, StatSelect::HBLANK.bits(), &mut irq);
    assert!(irq.0.is_empty());

    ppu.tick(2 * DOTS_PER_LINE, &mut irq);
    assert_eq!(irq.count(Interrupt::LcdStat), 2);
}

#[test]
fn stat_write_while_condition_holds_raises_edge() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.tick(300, &mut irq);
    assert_eq!(ppu.mode(), Mode::HBlank);

    ppu.write(0xFF41, StatSelect::HBLANK.bits(), &mut irq);
    assert_eq!(irq.count(Interrupt::LcdStat), 1);
    // Line already high: adding another source is not a new edge.
    ppu.write(0xFF41, (StatSelect::HBLANK | StatSelect::LYC).bits(), &mut irq);
    assert_eq!(irq.count(Interrupt::LcdStat), 1);
}

#[test]
fn lyc_match_sets_coincidence_and_interrupt() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF45, 2, &mut irq);
    ppu.write(0xFF41, StatSelect::LYC.bits(), &mut irq);
    assert_eq!(ppu.read(0xFF41) & 0x04, 0);

    ppu.tick(2 * DOTS_PER_LINE, &mut irq);
    assert_eq!(ppu.ly, 2);
    assert_eq!(ppu.read(0xFF41) & 0x04, 0x04);
    assert_eq!(irq.count(Interrupt::LcdStat), 1);
}

#[test]
fn stat_reads_fixed_bit_and_ignores_low_bit_writes() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF45, 0x80, &mut irq);
    ppu.write(0xFF41, 0xFF, &mut irq);
    // Bit 7 fixed high, select bits stored, mode 2, no coincidence.
    assert_eq!(ppu.read(0xFF41), 0x80 | 0x78 | 0x02);
}

#[test]
fn ly_is_read_only() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.tick(3 * DOTS_PER_LINE, &mut irq);
    ppu.write(0xFF44, 0x00, &mut irq);
    assert_eq!(ppu.read(0xFF44), 3);
}

#[test]
fn display_off_resets_line_state_and_clears_frame() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write_vram(0x8000, 0xFF);
    ppu.write(0xFF47, 0xE4, &mut irq);
    ppu.tick(crate::DOTS_PER_FRAME, &mut irq);
    assert!(ppu.frame().iter().any(|&p| p != 0));

    ppu.tick(1000, &mut irq);
    ppu.write(0xFF40, 0x11, &mut irq);
    assert_eq!(ppu.ly, 0);
    assert_eq!(ppu.read(0xFF41) & 0x03, 0);
    assert!(ppu.frame().iter().all(|&p| p == 0));

    // Frozen while off.
    ppu.tick(5000, &mut irq);
    assert_eq!(ppu.ly, 0);
    assert_eq!(ppu.mode(), Mode::HBlank);
}

#[test]
fn first_line_after_enable_is_short() {
    let mut ppu = Ppu::new();
    let mut irq = Recorder::default();
    ppu.write(0xFF40, 0x91, &mut irq);
    assert_eq!(ppu.mode(), Mode::HBlank);

    ppu.tick(71, &mut irq);
    assert_eq!(ppu.mode(), Mode::HBlank);
    ppu.tick(1, &mut irq);
    assert_eq!(ppu.mode(), Mode::Drawing);
    ppu.tick(172, &mut irq);
    assert_eq!(ppu.mode(), Mode::HBlank);
    ppu.tick(448 - 72 - 172 - 1, &mut irq);
    assert_eq!(ppu.ly, 0);
    ppu.tick(1, &mut irq);
    assert_eq!(ppu.ly, 1);
    assert_eq!(ppu.mode(), Mode::OamScan);
}

#[test]
fn enabling_lcd_does_not_raise_hblank_stat() {
    let mut ppu = Ppu::new();
    let mut irq = Recorder::default();
    ppu.write(0xFF45, 0x50, &mut irq);
    ppu.write(0xFF41, StatSelect::HBLANK.bits(), &mut irq);
    ppu.write(0xFF40, 0x91, &mut irq);
    assert_eq!(ppu.mode(), Mode::HBlank);
    assert_eq!(ppu.read(0xFF41) & 0x03, 0);
    assert!(irq.0.is_empty());

    ppu.tick(71, &mut irq);
    assert!(irq.0.is_empty());
    // The HBlank after the first Draw is a real edge.
    ppu.tick(1 + 172, &mut irq);
    assert_eq!(ppu.mode(), Mode::HBlank);
    assert_eq!(irq.count(Interrupt::LcdStat), 1);
}

#[test]
fn fine_scroll_lengthens_draw() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF43, 0x0B, &mut irq);
    assert_eq!(draw_length(&mut ppu), 172 + 3);
}

#[test]
fn object_at_x_zero_costs_eleven_dots() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF40, 0x93, &mut irq);
    place_object(&mut ppu, 0, 16, 0, 0, 0);
    assert_eq!(draw_length(&mut ppu), 172 + 11);
}

#[test]
fn second_object_on_same_tile_costs_flat_penalty_only() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF40, 0x93, &mut irq);
    place_object(&mut ppu, 0, 16, 0, 0, 0);
    place_object(&mut ppu, 1, 16, 0, 0, 0);
    assert_eq!(draw_length(&mut ppu), 172 + 11 + 6);
}

#[test]
fn object_late_in_tile_costs_no_fetch_penalty() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF40, 0x93, &mut irq);
    // Leftmost pixel at column 6 of its tile: 7 - 6 - 2 < 0.
    place_object(&mut ppu, 0, 16, 14, 0, 0);
    assert_eq!(draw_length(&mut ppu), 172 + 6);
}

#[test]
fn offscreen_and_disabled_objects_cost_nothing() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF40, 0x93, &mut irq);
    place_object(&mut ppu, 0, 16, 168, 0, 0);
    assert_eq!(draw_length(&mut ppu), 172);

    let mut ppu = Ppu::post_boot();
    place_object(&mut ppu, 0, 16, 0, 0, 0);
    assert_eq!(draw_length(&mut ppu), 172);
}

#[test]
fn window_counter_advances_only_when_drawn() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF40, 0xB1, &mut irq);
    ppu.write(0xFF4A, 0, &mut irq);
    ppu.write(0xFF4B, 7, &mut irq);
    assert_eq!(draw_length(&mut ppu), 172 + 6);
    assert_eq!(ppu.window_line, 1);

    ppu.write(0xFF4B, 167, &mut irq);
    ppu.tick(DOTS_PER_LINE - ppu.dot, &mut irq);
    assert_eq!(draw_length(&mut ppu), 172);
    assert_eq!(ppu.window_line, 1);
}

#[test]
fn window_counter_restarts_each_frame() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF40, 0xB1, &mut irq);
    ppu.write(0xFF4A, 100, &mut irq);
    ppu.write(0xFF4B, 7, &mut irq);
    ppu.tick(144 * DOTS_PER_LINE, &mut irq);
    assert_eq!(ppu.window_line, 44);
    ppu.tick(10 * DOTS_PER_LINE, &mut irq);
    assert_eq!(ppu.window_line, 0);
}

#[test]
fn background_maps_through_bgp() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF47, 0xE4, &mut irq);
    // Tile 0, row 0: colour index 1 everywhere.
    ppu.write_vram(0x8000, 0xFF);
    ppu.write_vram(0x8001, 0x00);

    ppu.render_line();
    ppu.framebuffer.swap();
    assert!(ppu.frame()[..SCREEN_WIDTH].iter().all(|&p| p == 1));
}

#[test]
fn signed_tile_addressing_uses_9000_base() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF40, 0x81, &mut irq);
    ppu.write(0xFF47, 0xE4, &mut irq);
    ppu.write_vram(0x9800, 0xFF);
    // Tile -1 lives at $8FF0; colour index 2.
    ppu.write_vram(0x8FF0, 0x00);
    ppu.write_vram(0x8FF1, 0xFF);

    ppu.render_line();
    ppu.framebuffer.swap();
    assert!(ppu.frame()[..8].iter().all(|&p| p == 2));
    assert_eq!(ppu.frame()[8], 0);
}

#[test]
fn background_disabled_renders_index_zero() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF40, 0x90, &mut irq);
    ppu.write(0xFF47, 0xE7, &mut irq);
    ppu.write_vram(0x8000, 0xFF);

    ppu.render_line();
    ppu.framebuffer.swap();
    assert!(ppu.frame()[..SCREEN_WIDTH].iter().all(|&p| p == 3));
}

#[test]
fn objects_composite_with_palette_flip_and_priority() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF40, 0x93, &mut irq);
    ppu.write(0xFF47, 0xE4, &mut irq);
    ppu.write(0xFF48, 0xE4, &mut irq);
    ppu.write(0xFF49, 0x1B, &mut irq);
    ppu.write_vram(0x8000, 0xFF);
    // Tile 1, row 0: only the leftmost pixel, colour index 3.
    ppu.write_vram(0x8010, 0x80);
    ppu.write_vram(0x8011, 0x80);

    place_object(&mut ppu, 0, 16, 8, 1, 0x00);
    place_object(&mut ppu, 1, 16, 24, 1, 0x20);
    place_object(&mut ppu, 2, 16, 40, 1, 0x10);
    place_object(&mut ppu, 3, 16, 56, 1, 0x80);

    ppu.render_line();
    ppu.framebuffer.swap();
    let line = &ppu.frame()[..SCREEN_WIDTH];
    assert_eq!(line[0], 3);
    assert_eq!(line[1], 1);
    // X flip moves the pixel to the right edge.
    assert_eq!(line[16], 1);
    assert_eq!(line[23], 3);
    // OBP1 = %00011011 maps index 3 to shade 0.
    assert_eq!(line[32], 0);
    // Behind a non-zero background pixel.
    assert_eq!(line[48], 1);
}

#[test]
fn lower_x_object_wins_overlap() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF40, 0x93, &mut irq);
    ppu.write(0xFF48, 0xE4, &mut irq);
    // Tile 1 row 0 fully index 1, tile 2 row 0 fully index 2.
    ppu.write_vram(0x8010, 0xFF);
    ppu.write_vram(0x8021, 0xFF);

    place_object(&mut ppu, 0, 16, 12, 2, 0);
    place_object(&mut ppu, 1, 16, 10, 1, 0);

    ppu.render_line();
    ppu.framebuffer.swap();
    let line = ppu.frame();
    assert_eq!(line[2], 1);
    assert_eq!(line[3], 1);
    // Past the lower-X object, the other one shows.
    assert_eq!(line[10], 2);
}

#[test]
fn at_most_ten_objects_per_line() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF40, 0x93, &mut irq);
    ppu.write(0xFF48, 0xE4, &mut irq);
    ppu.write_vram(0x8010, 0xFF);
    for slot in 0..11 {
        place_object(&mut ppu, slot, 16, 8 + slot as u8 * 8, 1, 0);
    }

    ppu.render_line();
    ppu.framebuffer.swap();
    let line = ppu.frame();
    assert_eq!(line[9 * 8], 1);
    assert_eq!(line[10 * 8], 0);
}

#[test]
fn window_replaces_background_from_wx_minus_seven() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    // LCD, window map $9C00, window, $8000 data, BG.
    ppu.write(0xFF40, 0xF1, &mut irq);
    ppu.write(0xFF47, 0xE4, &mut irq);
    ppu.write(0xFF4A, 0, &mut irq);
    ppu.write(0xFF4B, 87, &mut irq);
    // Tile 0 row 0: index 1. Tile 2 row 0: index 2.
    ppu.write_vram(0x8000, 0xFF);
    ppu.write_vram(0x8021, 0xFF);
    ppu.write_vram(0x9C00, 2);

    ppu.render_line();
    ppu.framebuffer.swap();
    let line = &ppu.frame()[..SCREEN_WIDTH];
    assert!(line[..80].iter().all(|&p| p == 1));
    assert!(line[80..88].iter().all(|&p| p == 2));
    assert!(line[88..].iter().all(|&p| p == 1));
    assert_eq!(ppu.window_line, 1);
}

#[test]
fn window_with_low_map_reads_9800() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF40, 0xB1, &mut irq);
    ppu.write(0xFF47, 0xE4, &mut irq);
    ppu.write(0xFF4A, 0, &mut irq);
    ppu.write(0xFF4B, 7, &mut irq);
    ppu.write_vram(0x8021, 0xFF);
    ppu.write_vram(0x9800, 2);
    ppu.write_vram(0x9C00, 0);

    ppu.render_line();
    ppu.framebuffer.swap();
    assert!(ppu.frame()[..8].iter().all(|&p| p == 2));
    assert_eq!(ppu.frame()[8], 0);
}

#[test]
fn window_row_follows_its_own_line_counter() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF40, 0xB1, &mut irq);
    ppu.write(0xFF47, 0xE4, &mut irq);
    ppu.write(0xFF42, 5, &mut irq);
    ppu.write(0xFF4A, 0, &mut irq);
    ppu.write(0xFF4B, 7, &mut irq);
    ppu.write_vram(0x9800, 2);
    // Tile 2: row 3 is index 3, row 5 (LY + SCY) stays blank.
    ppu.write_vram(0x8026, 0xFF);
    ppu.write_vram(0x8027, 0xFF);
    ppu.window_line = 3;

    ppu.render_line();
    ppu.framebuffer.swap();
    assert!(ppu.frame()[..8].iter().all(|&p| p == 3));
    assert_eq!(ppu.window_line, 4);
}

#[test]
fn tall_objects_span_two_tiles_and_flip_vertically() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF40, 0x97, &mut irq);
    ppu.write(0xFF48, 0xE4, &mut irq);
    // Tile 2 row 0: index 1. Tile 3 row 0: index 2. Tile 3 row 7: index 3.
    ppu.write_vram(0x8020, 0xFF);
    ppu.write_vram(0x8031, 0xFF);
    ppu.write_vram(0x803E, 0xFF);
    ppu.write_vram(0x803F, 0xFF);

    // Odd tile numbers are masked to the even top half.
    place_object(&mut ppu, 0, 16, 8, 3, 0x00);
    place_object(&mut ppu, 1, 16, 24, 3, 0x40);

    ppu.render_line();
    ppu.ly = 8;
    ppu.render_line();
    ppu.framebuffer.swap();

    let frame = ppu.frame();
    let top = &frame[..SCREEN_WIDTH];
    assert!(top[..8].iter().all(|&p| p == 1));
    assert!(top[16..24].iter().all(|&p| p == 3));

    let row8 = &frame[8 * SCREEN_WIDTH..9 * SCREEN_WIDTH];
    assert!(row8[..8].iter().all(|&p| p == 2));
    // Flipped: row 8 reads tile 2 row 7, which is transparent.
    assert!(row8[16..24].iter().all(|&p| p == 0));
}

#[test]
fn object_fetch_penalty_aligns_to_window_tiles() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    ppu.write(0xFF40, 0xB3, &mut irq);
    ppu.write(0xFF43, 2, &mut irq);
    ppu.write(0xFF4A, 0, &mut irq);
    ppu.write(0xFF4B, 23, &mut irq);
    // Before the window: BG tile offset (0 + 2) % 8 = 2, costs 6 + 3.
    place_object(&mut ppu, 0, 16, 8, 0, 0);
    // Window starts at column 16: offset 0 in window tile 0, costs 6 + 5.
    place_object(&mut ppu, 1, 16, 24, 0, 0);
    // Same window tile: flat cost only.
    place_object(&mut ppu, 2, 16, 28, 0, 0);

    assert_eq!(draw_length(&mut ppu), 172 + 2 + 6 + 9 + 11 + 6);
}

#[test]
fn vram_and_oam_gating_follow_mode() {
    let mut ppu = Ppu::post_boot();
    let mut irq = Recorder::default();
    assert!(ppu.vram_accessible());
    assert!(!ppu.oam_accessible());
    ppu.tick(80, &mut irq);
    assert!(!ppu.vram_accessible());
    assert!(!ppu.oam_accessible());
    ppu.tick(172, &mut irq);
    assert!(ppu.vram_accessible());
    assert!(ppu.oam_accessible());
}
