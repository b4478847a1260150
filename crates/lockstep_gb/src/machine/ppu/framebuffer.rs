use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

const PIXELS: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// Front/back pair of shade buffers (one byte per pixel, values 0-3).
///
/// Lines are written into the back buffer; the front buffer always holds the
/// last completed frame.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    front: Box<[u8]>,
    back: Box<[u8]>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            front: vec![0; PIXELS].into_boxed_slice(),
            back: vec![0; PIXELS].into_boxed_slice(),
        }
    }

    pub fn front(&self) -> &[u8] {
        &self.front
    }

    /// Mutable view of one line of the back buffer.
    pub fn back_line(&mut self, ly: u8) -> &mut [u8] {
        let start = ly as usize * SCREEN_WIDTH;
        &mut self.back[start..start + SCREEN_WIDTH]
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }

    pub fn clear(&mut self) {
        self.front.fill(0);
        self.back.fill(0);
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_publishes_back_buffer() {
        let mut fb = FrameBuffer::new();
        fb.back_line(3)[7] = 2;
        assert_eq!(fb.front()[3 * SCREEN_WIDTH + 7], 0);
        fb.swap();
        assert_eq!(fb.front()[3 * SCREEN_WIDTH + 7], 2);
        fb.clear();
        assert!(fb.front().iter().all(|&p| p == 0));
    }
}
