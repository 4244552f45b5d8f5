//! Deterministic chance oracle.
//!
//! Chance-based effects (the occasional growl) roll through a seeded oracle
//! rather than an ambient RNG so that replays of the same session produce
//! the same sounds.

/// Oracle for deterministic random rolls. Implementations must produce the
/// same value for the same seed.
pub trait RollOracle {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// True roughly once per `n` calls (always true for `n <= 1`).
    fn one_in(&self, seed: u64, n: u32) -> bool {
        if n <= 1 {
            return true;
        }
        self.next_u32(seed) % n == 0
    }

    /// Uniform pick in `0..len`; returns 0 for empty ranges.
    fn pick(&self, seed: u64, len: u32) -> u32 {
        if len == 0 {
            return 0;
        }
        self.next_u32(seed) % len
    }
}

/// PCG-XSH-RR random roll oracle: single multiply + xorshift + rotate,
/// 64-bit state, good statistical quality for gameplay rolls.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRoll;

impl PcgRoll {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RollOracle for PcgRoll {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Mixes an actor id and a per-actor nonce into a roll seed so that each
/// chance event in a session draws an independent value.
pub fn mix_seed(actor: u32, nonce: u64) -> u64 {
    let mut hash = nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
