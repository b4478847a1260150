use crate::interrupt::{Interrupt, InterruptSink};

/// SB/SC pair with an instantly completing internal-clock transfer.
///
/// No link partner exists, so every transferred byte is captured in
/// `output` and SB reads back $FF, as it would with nothing connected.
#[derive(Clone, Debug, Default)]
pub(crate) struct Serial {
    sb: u8,
    sc: u8,
    pub(crate) output: Vec<u8>,
}

impl Serial {
    pub(crate) fn post_boot() -> Self {
        Self {
            sc: 0x7E,
            ..Self::default()
        }
    }

    pub(crate) fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF01 => self.sb,
            _ => self.sc | 0x7E,
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8, irq: &mut dyn InterruptSink) {
        if addr == 0xFF01 {
            self.sb = value;
            return;
        }
        self.sc = value;
        // Start bit with internal clock.
        if value & 0x81 == 0x81 {
            self.output.push(self.sb);
            self.sb = 0xFF;
            self.sc &= !0x80;
            irq.request(Interrupt::Serial);
        }
    }
}
