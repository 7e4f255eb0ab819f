//! Generation III linear congruential generator.
//!
//! The game advances a single 32-bit register once per frame:
//! next = (0x41C64E6D * prev + 0x6073) mod 2^32
//! and hands out the upper 16 bits as the random value.
//!
//! Frame `n` is the state reached after `n` advances from seed 0. There is no
//! jump-ahead: reaching a frame always costs `n` sequential steps.

/// Multiplier (a)
pub const MULTIPLIER: u32 = 0x41C6_4E6D;
/// Increment (c)
pub const INCREMENT: u32 = 0x6073;
/// Seed the game starts from on a fresh boot.
pub const BOOT_SEED: u32 = 0;

/// Compute the next state and the 16-bit value the game reads from it.
#[inline]
pub fn advance(state: u32) -> (u32, u16) {
    let next = state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
    (next, (next >> 16) as u16)
}

/// State after `frame` sequential advances from the boot seed.
pub fn state_at_frame(frame: u32) -> u32 {
    let mut state = BOOT_SEED;
    for _ in 0..frame {
        state = advance(state).0;
    }
    state
}

/// Owned generator register.
///
/// Every search worker carries its own copy; nothing about the generator is
/// shared between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Generator positioned at `frame`, walked there from the boot seed.
    pub fn at_frame(frame: u32) -> Self {
        Self::new(state_at_frame(frame))
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance once and return the upper 16 bits of the new state.
    #[inline]
    pub fn next_u16(&mut self) -> u16 {
        let (state, output) = advance(self.state);
        self.state = state;
        output
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new(BOOT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_sequence() {
        // First three states from seed 0
        let (s1, o1) = advance(0);
        assert_eq!(s1, 0x0000_6073);
        assert_eq!(o1, 0x0000);

        let (s2, o2) = advance(s1);
        assert_eq!(s2, 0xE97E_7B6A);
        assert_eq!(o2, 0xE97E);

        let (s3, o3) = advance(s2);
        assert_eq!(s3, 0x5271_3895);
        assert_eq!(o3, 0x5271);
    }

    #[test]
    fn test_output_is_upper_half() {
        for state in [0u32, 1, 0xFFFF_FFFF, 0x1234_5678] {
            let (next, out) = advance(state);
            assert_eq!(out as u32, next >> 16);
        }
    }

    #[test]
    fn test_wraparound() {
        let (next, _) = advance(u32::MAX);
        assert_eq!(next, u32::MAX.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT));
    }

    #[test]
    fn test_state_at_frame_matches_stepping() {
        let mut lcg = Lcg::default();
        for frame in 0..500 {
            assert_eq!(lcg.state(), state_at_frame(frame));
            lcg.next_u16();
        }
    }

    #[test]
    fn test_independent_sequences_identical() {
        let mut a = Lcg::default();
        let mut b = Lcg::default();
        for _ in 0..10_000 {
            assert_eq!(a.next_u16(), b.next_u16());
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_at_frame() {
        assert_eq!(Lcg::at_frame(0).state(), BOOT_SEED);
        assert_eq!(Lcg::at_frame(2).state(), 0xE97E_7B6A);
    }
}
