/// Memory view the CPU executes against.
///
/// Only byte accesses are required; the 16-bit helpers are expressed in terms
/// of them so that any side effects of individual accesses are preserved.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Little-endian 16-bit read: low byte at `addr`, high byte at `addr + 1`.
    fn read16(&mut self, addr: u16) -> u16 {
        let lo = self.read8(addr);
        let hi = self.read8(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Little-endian 16-bit write. The high byte is stored first, matching the
    /// order `LD (a16),SP` drives the bus.
    fn write16(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write8(addr.wrapping_add(1), hi);
        self.write8(addr, lo);
    }
}
