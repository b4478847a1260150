//! Battery save layout: raw cartridge RAM, then for clock carts a 48-byte
//! block of five live and five latched registers (LE u32 each: S, M, H, DL,
//! DH) and the LE u64 UNIX time the save was written.

use super::rtc::RtcRegisters;
use super::Cartridge;

pub(crate) const RTC_BLOCK_LEN: usize = 48;

impl Cartridge {
    pub(crate) fn save_data(&self, now_unix: u64) -> Option<Vec<u8>> {
        if !self.header.has_battery {
            return None;
        }
        let mut data = self.ram.clone();
        if let Some(rtc) = self.rtc() {
            for word in rtc.live.to_words().iter().chain(rtc.latched.to_words().iter()) {
                data.extend_from_slice(&word.to_le_bytes());
            }
            data.extend_from_slice(&now_unix.to_le_bytes());
        }
        (!data.is_empty()).then_some(data)
    }

    /// Restore RAM (and clock) from a save. Data of the wrong size is
    /// rejected and leaves RAM zeroed.
    pub(crate) fn load_save(&mut self, data: &[u8], now_unix: u64) {
        let ram_len = self.ram.len();
        let has_rtc = self.rtc().is_some();

        let rtc_block = match data.len() {
            len if len == ram_len => None,
            len if has_rtc && len == ram_len + RTC_BLOCK_LEN => Some(&data[ram_len..]),
            len => {
                log::warn!(
                    "discarding save data: {len} bytes, expected {ram_len}{}",
                    if has_rtc { " (+48 clock bytes)" } else { "" }
                );
                self.ram.fill(0);
                return;
            }
        };

        self.ram.copy_from_slice(&data[..ram_len]);

        if let (Some(block), Some(rtc)) = (rtc_block, self.rtc_mut()) {
            let word = |i: usize| {
                let at = i * 4;
                u32::from_le_bytes([block[at], block[at + 1], block[at + 2], block[at + 3]])
            };
            let live = RtcRegisters::from_words([word(0), word(1), word(2), word(3), word(4)]);
            let latched = RtcRegisters::from_words([word(5), word(6), word(7), word(8), word(9)]);
            let mut stamp = [0u8; 8];
            stamp.copy_from_slice(&block[40..48]);
            let saved_at = u64::from_le_bytes(stamp);

            rtc.restore(live, latched);
            let elapsed = now_unix.saturating_sub(saved_at);
            rtc.advance_seconds(elapsed);
            log::debug!("restored clock, fast-forwarded {elapsed}s");
        }
    }
}
