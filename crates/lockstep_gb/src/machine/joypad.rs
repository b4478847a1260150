use crate::interrupt::{Interrupt, InterruptSink};

/// The eight DMG buttons, split into the two P1 select groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Button {
    /// (group is buttons rather than d-pad, bit within the low nibble)
    fn line(self) -> (bool, u8) {
        match self {
            Button::Right => (false, 0),
            Button::Left => (false, 1),
            Button::Up => (false, 2),
            Button::Down => (false, 3),
            Button::A => (true, 0),
            Button::B => (true, 1),
            Button::Select => (true, 2),
            Button::Start => (true, 3),
        }
    }
}

/// P1/JOYP ($FF00) key matrix.
#[derive(Clone, Debug)]
pub(crate) struct Joypad {
    /// P1 bits 5-4 as last written; 0 selects a group.
    select: u8,
    /// Pressed masks, bit set = held.
    buttons: u8,
    dpad: u8,
}

impl Default for Joypad {
    fn default() -> Self {
        Self {
            select: 0x30,
            buttons: 0,
            dpad: 0,
        }
    }
}

impl Joypad {
    pub(crate) fn read(&self) -> u8 {
        let mut low = 0x0F;
        if self.select & 0x10 == 0 {
            low &= !self.dpad;
        }
        if self.select & 0x20 == 0 {
            low &= !self.buttons;
        }
        0xC0 | self.select | (low & 0x0F)
    }

    pub(crate) fn write(&mut self, value: u8) {
        self.select = value & 0x30;
    }

    /// Press a button. A newly pressed key requests the joypad interrupt.
    pub(crate) fn press(&mut self, button: Button, irq: &mut dyn InterruptSink) {
        let (is_button, bit) = button.line();
        let mask = 1 << bit;
        let group = if is_button {
            &mut self.buttons
        } else {
            &mut self.dpad
        };
        if *group & mask == 0 {
            *group |= mask;
            irq.request(Interrupt::Joypad);
        }
    }

    pub(crate) fn release(&mut self, button: Button) {
        let (is_button, bit) = button.line();
        let group = if is_button {
            &mut self.buttons
        } else {
            &mut self.dpad
        };
        *group &= !(1 << bit);
    }
}
