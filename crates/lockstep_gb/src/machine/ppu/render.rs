use super::{Lcdc, Ppu};
use crate::SCREEN_WIDTH;

const MAX_OBJECTS_PER_LINE: usize = 10;
const WINDOW_PENALTY: u32 = 6;
const OBJECT_PENALTY: u32 = 6;
/// Objects at OAM X >= 168 are fully off-screen and cost nothing.
const OBJECT_X_LIMIT: u8 = 168;

#[derive(Clone, Copy, Debug)]
struct LineObject {
    index: u8,
    y: u8,
    x: u8,
    tile: u8,
    attrs: u8,
}

impl LineObject {
    fn bg_priority(&self) -> bool {
        self.attrs & 0x80 != 0
    }

    fn y_flip(&self) -> bool {
        self.attrs & 0x40 != 0
    }

    fn x_flip(&self) -> bool {
        self.attrs & 0x20 != 0
    }

    fn uses_obp1(&self) -> bool {
        self.attrs & 0x10 != 0
    }

    /// Screen column of the leftmost pixel.
    fn left(&self) -> i16 {
        self.x as i16 - 8
    }
}

#[inline]
fn shade(palette: u8, index: u8) -> u8 {
    (palette >> (index * 2)) & 0x03
}

impl Ppu {
    fn tile_row(&self, tile_addr: u16, row: u8) -> (u8, u8) {
        let addr = tile_addr + row as u16 * 2;
        (self.read_vram(addr), self.read_vram(addr + 1))
    }

    /// Address of a BG/window tile, honouring LCDC.4 addressing mode.
    fn bg_tile_addr(&self, tile: u8) -> u16 {
        if self.lcdc.contains(Lcdc::TILE_DATA_8000) {
            0x8000 + tile as u16 * 16
        } else {
            (0x9000i32 + (tile as i8 as i32) * 16) as u16
        }
    }

    fn map_index(&self, high_map: bool, column: u8, row: u8) -> u8 {
        let base: u16 = if high_map { 0x9C00 } else { 0x9800 };
        let offset = (row as u16 / 8) * 32 + column as u16 / 8;
        self.read_vram(base + offset)
    }

    fn bg_color_index(&self, high_map: bool, column: u8, row: u8) -> u8 {
        let tile = self.map_index(high_map, column, row);
        let (lo, hi) = self.tile_row(self.bg_tile_addr(tile), row % 8);
        let bit = 7 - (column % 8);
        (((hi >> bit) & 1) << 1) | ((lo >> bit) & 1)
    }

    /// Up to ten objects whose rows cover `ly`, in OAM order.
    fn select_objects(&self) -> Vec<LineObject> {
        let height: i16 = if self.lcdc.contains(Lcdc::OBJ_TALL) { 16 } else { 8 };
        let ly = self.ly as i16;
        let mut objects = Vec::with_capacity(MAX_OBJECTS_PER_LINE);
        for (index, entry) in self.oam.chunks_exact(4).enumerate() {
            let top = entry[0] as i16 - 16;
            if ly < top || ly >= top + height {
                continue;
            }
            objects.push(LineObject {
                index: index as u8,
                y: entry[0],
                x: entry[1],
                tile: entry[2],
                attrs: entry[3],
            });
            if objects.len() == MAX_OBJECTS_PER_LINE {
                break;
            }
        }
        objects
    }

    fn object_color_index(&self, object: &LineObject, column: i16) -> u8 {
        let tall = self.lcdc.contains(Lcdc::OBJ_TALL);
        let height: u8 = if tall { 16 } else { 8 };
        let mut row = self.ly.wrapping_sub(object.y.wrapping_sub(16));
        if object.y_flip() {
            row = height - 1 - row;
        }
        let tile = if tall { object.tile & 0xFE } else { object.tile };
        let (lo, hi) = self.tile_row(0x8000 + tile as u16 * 16, row);
        let mut bit = (column - object.left()) as u8;
        if !object.x_flip() {
            bit = 7 - bit;
        }
        (((hi >> bit) & 1) << 1) | ((lo >> bit) & 1)
    }

    /// First screen column covered by the window on this line, if any.
    fn window_start(&self) -> Option<usize> {
        if !self.lcdc.contains(Lcdc::WINDOW_ENABLE) || self.ly < self.wy {
            return None;
        }
        let start = (self.wx as usize).saturating_sub(7);
        (start < SCREEN_WIDTH).then_some(start)
    }

    /// Composite the current line into the back buffer and return the extra
    /// Draw dots it costs.
    pub(super) fn render_line(&mut self) -> u32 {
        let bg_enabled = self.lcdc.contains(Lcdc::BG_WINDOW_ENABLE);
        let objects_enabled = self.lcdc.contains(Lcdc::OBJ_ENABLE);
        let window_start = self.window_start();

        let mut bg_indices = [0u8; SCREEN_WIDTH];
        for (x, slot) in bg_indices.iter_mut().enumerate() {
            *slot = match window_start {
                Some(start) if x >= start => {
                    let column = (x + 7 - self.wx as usize) as u8;
                    let high = self.lcdc.contains(Lcdc::WINDOW_MAP_HIGH);
                    if bg_enabled {
                        self.bg_color_index(high, column, self.window_line)
                    } else {
                        0
                    }
                }
                _ if bg_enabled => {
                    let column = (x as u8).wrapping_add(self.scx);
                    let row = self.ly.wrapping_add(self.scy);
                    self.bg_color_index(self.lcdc.contains(Lcdc::BG_MAP_HIGH), column, row)
                }
                _ => 0,
            };
        }

        let mut objects = if objects_enabled {
            self.select_objects()
        } else {
            Vec::new()
        };
        objects.sort_by_key(|object| (object.x, object.index));

        let mut line = [0u8; SCREEN_WIDTH];
        for (x, pixel) in line.iter_mut().enumerate() {
            let bg_index = bg_indices[x];
            let column = x as i16;
            let winner = objects
                .iter()
                .filter(|object| (object.left()..object.left() + 8).contains(&column))
                .find_map(|object| {
                    let index = self.object_color_index(object, column);
                    (index != 0).then_some((object, index))
                });
            *pixel = match winner {
                Some((object, _)) if object.bg_priority() && bg_index != 0 => {
                    shade(self.bgp, bg_index)
                }
                Some((object, index)) => {
                    let palette = if object.uses_obp1() { self.obp1 } else { self.obp0 };
                    shade(palette, index)
                }
                None => shade(self.bgp, bg_index),
            };
        }

        let ly = self.ly;
        self.framebuffer.back_line(ly).copy_from_slice(&line);

        let penalty = self.line_penalty(window_start, &objects);
        if window_start.is_some() {
            self.window_line = self.window_line.wrapping_add(1);
        }
        penalty
    }

    /// Extra Draw dots: fine scroll, window start and object fetches.
    ///
    /// `objects` must already be sorted by X.
    fn line_penalty(&self, window_start: Option<usize>, objects: &[LineObject]) -> u32 {
        let mut penalty = (self.scx % 8) as u32;
        if window_start.is_some() {
            penalty += WINDOW_PENALTY;
        }

        let mut fetched_tiles: Vec<(bool, i16)> = Vec::new();
        for object in objects.iter().filter(|object| object.x < OBJECT_X_LIMIT) {
            penalty += OBJECT_PENALTY;

            let left = object.left();
            let in_window = window_start.is_some_and(|start| left >= start as i16);
            let (tile, offset) = if in_window {
                let relative = left - (self.wx as i16 - 7);
                (relative.div_euclid(8), relative.rem_euclid(8))
            } else {
                let relative = left + self.scx as i16;
                (relative.div_euclid(8), relative.rem_euclid(8))
            };
            let key = (in_window, tile);
            if !fetched_tiles.contains(&key) {
                fetched_tiles.push(key);
                penalty += (5 - offset).max(0) as u32;
            }
        }
        penalty
    }
}
