use typed_builder::TypedBuilder;

/// Power-on contents of work RAM and high RAM.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RamInit {
    /// Deterministic xorshift32 fill from the given seed. Real hardware comes
    /// up with noise; a fixed seed keeps runs reproducible.
    Pattern(u32),
    Zeroed,
}

impl Default for RamInit {
    fn default() -> Self {
        RamInit::Pattern(0xC0DE_1234)
    }
}

/// Register state the machine starts from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BootState {
    /// Values the DMG boot ROM leaves behind when it jumps to $0100.
    #[default]
    PostBoot,
    /// All registers zero, PC at $0000, display off.
    Cold,
}

/// Construction-time options for [`GameBoy`](super::GameBoy).
#[derive(Clone, Debug, Default, TypedBuilder)]
pub struct MachineConfig {
    #[builder(default)]
    pub ram_init: RamInit,
    #[builder(default)]
    pub boot_state: BootState,
}

impl RamInit {
    /// Fill `bytes` according to this policy.
    pub(crate) fn fill(self, regions: &mut [&mut [u8]]) {
        match self {
            RamInit::Zeroed => {
                for region in regions.iter_mut() {
                    region.fill(0);
                }
            }
            RamInit::Pattern(seed) => {
                // xorshift32 never leaves zero, so avoid seeding with it.
                let mut x = if seed == 0 { 0xC0DE_1234 } else { seed };
                let mut next_byte = || {
                    x ^= x << 13;
                    x ^= x >> 17;
                    x ^= x << 5;
                    x as u8
                };
                for region in regions.iter_mut() {
                    for byte in region.iter_mut() {
                        *byte = next_byte();
                    }
                }
            }
        }
    }
}
