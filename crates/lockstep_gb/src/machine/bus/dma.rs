use super::SystemBus;

const OAM_LEN: u16 = 0xA0;
const START_DELAY_MCYCLES: u8 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum DmaState {
    #[default]
    Idle,
    /// Waiting out the start latency. `blocking` is set when this start
    /// interrupted a running transfer, which keeps OAM locked meanwhile.
    Starting { remaining: u8, source: u16, blocking: bool },
    Active { source: u16, index: u16 },
}

/// OAM DMA engine driven by the bus in whole M-cycles.
#[derive(Clone, Debug)]
pub(super) struct Dma {
    state: DmaState,
    /// Last value written to $FF46.
    register: u8,
    remainder: u32,
}

impl Dma {
    pub(super) fn new(register: u8) -> Self {
        Self {
            state: DmaState::Idle,
            register,
            remainder: 0,
        }
    }

    pub(super) fn register(&self) -> u8 {
        self.register
    }

    pub(super) fn start(&mut self, value: u8) {
        let blocking = matches!(
            self.state,
            DmaState::Active { .. } | DmaState::Starting { blocking: true, .. }
        );
        self.register = value;
        self.state = DmaState::Starting {
            remaining: START_DELAY_MCYCLES,
            source: (value as u16) << 8,
            blocking,
        };
    }

    pub(super) fn blocks_oam(&self) -> bool {
        matches!(
            self.state,
            DmaState::Active { .. } | DmaState::Starting { blocking: true, .. }
        )
    }

    /// Advance one M-cycle; returns the (source, OAM index) pair to copy, if
    /// any.
    fn step(&mut self) -> Option<(u16, usize)> {
        match self.state {
            DmaState::Idle => None,
            DmaState::Starting {
                remaining,
                source,
                blocking,
            } => {
                self.state = if remaining > 1 {
                    DmaState::Starting {
                        remaining: remaining - 1,
                        source,
                        blocking,
                    }
                } else {
                    DmaState::Active { source, index: 0 }
                };
                None
            }
            DmaState::Active { source, index } => {
                self.state = if index + 1 == OAM_LEN {
                    DmaState::Idle
                } else {
                    DmaState::Active {
                        source,
                        index: index + 1,
                    }
                };
                Some((source.wrapping_add(index), index as usize))
            }
        }
    }
}

impl SystemBus {
    pub(super) fn tick_dma(&mut self, cycles: u32) {
        self.dma.remainder += cycles;
        while self.dma.remainder >= 4 {
            self.dma.remainder -= 4;
            if let Some((source, index)) = self.dma.step() {
                let value = self.dma_source_read(source);
                self.ppu.write_oam(index, value);
            }
        }
    }

    /// DMA reads bypass the CPU-side VRAM/OAM gating. Sources at $E000 and
    /// above land in the work RAM mirror.
    fn dma_source_read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => self
                .cartridge
                .as_ref()
                .map_or(0xFF, |cartridge| cartridge.read(addr)),
            0x8000..=0x9FFF => self.ppu.read_vram(addr),
            _ => self.wram[(addr & 0x1FFF) as usize],
        }
    }
}
