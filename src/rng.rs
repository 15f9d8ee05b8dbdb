//! RANROT pseudorandom generator.
//!
//! A tiny two-word rotate-and-add generator. It is not statistically strong,
//! but it is fully deterministic across platforms and cheap to clone, which is
//! all jiggle needs: two galaxies seeded alike and jiggled alike end up in the
//! same place.

use rand::{Error, RngCore};

/// Seed used when a description does not carry one.
pub const DEFAULT_SEED: u64 = 0x5A4A_0A5D_0A4F_51A7;

/// RANROT generator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RanRot {
    high: u32,
    low: u32,
}

impl RanRot {
    /// Create a generator from a 64-bit seed (high word, low word).
    ///
    /// An all-zero state never leaves zero, so a zero seed is replaced by
    /// [`DEFAULT_SEED`].
    pub fn new(seed: u64) -> Self {
        let seed = if seed == 0 { DEFAULT_SEED } else { seed };
        Self {
            high: (seed >> 32) as u32,
            low: seed as u32,
        }
    }

    #[inline]
    fn advance(&mut self) -> u32 {
        self.high = self.high.rotate_left(16).wrapping_add(self.low);
        self.low = self.low.wrapping_add(self.high);
        self.high
    }
}

impl RngCore for RanRot {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.advance()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.advance() as u64;
        let lo = self.advance() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.advance().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
