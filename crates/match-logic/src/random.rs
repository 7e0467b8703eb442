//! Seeded pseudo-random number generator
//!
//! Deterministic PRNG for reproducible matches. Every match gets its own
//! generator and every seat its own forked stream, so randomized strategies
//! never share (or perturb) a global sequence.

/// Seeded random number generator
///
/// Deterministic: same seed + index = same sequence
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new RNG from a 32-byte seed and match index
    pub fn new(seed: &[u8; 32], match_index: u32) -> Self {
        let mut state = 0u64;
        for (i, chunk) in seed.chunks(8).enumerate() {
            let mut bytes = [0u8; 8];
            bytes[..chunk.len()].copy_from_slice(chunk);
            state ^= u64::from_le_bytes(bytes).wrapping_add(i as u64);
        }

        state ^= (match_index as u64).wrapping_mul(0x517cc1b727220a95);
        Self::warmed(state)
    }

    /// Create an RNG from a plain integer seed
    pub fn from_u64(seed: u64) -> Self {
        Self::new(&expand_seed(seed), 0)
    }

    /// Derive an independent stream (e.g. one per seat in a match)
    pub fn fork(&self, stream: u32) -> Self {
        let state = self.state ^ (stream as u64 + 1).wrapping_mul(0x9e3779b97f4a7c15);
        Self::warmed(state)
    }

    fn warmed(state: u64) -> Self {
        // xorshift has a fixed point at zero
        let state = if state == 0 { 0x2545f4914f6cdd1d } else { state };
        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }
        rng
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Generate next u32
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform float in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        // 53 high bits -> exact double in [0, 1)
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// `true` with probability `p` (values outside [0, 1] saturate)
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Spread a 64-bit seed over the 32-byte seed format.
pub fn expand_seed(seed: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut word = seed;
    for chunk in out.chunks_mut(8) {
        chunk.copy_from_slice(&word.to_le_bytes());
        word = word.rotate_left(17) ^ 0x6a09e667f3bcc908;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let seed = [42u8; 32];
        let mut r1 = SeededRng::new(&seed, 0);
        let mut r2 = SeededRng::new(&seed, 0);

        for _ in 0..100 {
            assert_eq!(r1.next_u64(), r2.next_u64());
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = SeededRng::new(&[1u8; 32], 0);
        let mut rng2 = SeededRng::new(&[2u8; 32], 0);

        let vals1: Vec<_> = (0..10).map(|_| rng1.next_u64()).collect();
        let vals2: Vec<_> = (0..10).map(|_| rng2.next_u64()).collect();

        assert_ne!(vals1, vals2);
    }

    #[test]
    fn test_different_match_index() {
        let seed = [42u8; 32];

        let mut rng1 = SeededRng::new(&seed, 0);
        let mut rng2 = SeededRng::new(&seed, 1);

        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_forks_are_independent() {
        let base = SeededRng::from_u64(7);
        let mut a = base.fork(0);
        let mut b = base.fork(1);

        let va: Vec<_> = (0..10).map(|_| a.next_u64()).collect();
        let vb: Vec<_> = (0..10).map(|_| b.next_u64()).collect();
        assert_ne!(va, vb);

        // forking does not advance the parent
        let mut again = base.fork(0);
        assert_eq!(again.next_u64(), va[0]);
    }

    #[test]
    fn test_zero_seed_still_random() {
        let mut rng = SeededRng::new(&[0u8; 32], 0);
        let vals: Vec<_> = (0..4).map(|_| rng.next_u64()).collect();
        assert!(vals.iter().any(|v| *v != 0));
    }

    #[test]
    fn test_next_f64_range() {
        let mut rng = SeededRng::from_u64(42);
        for _ in 0..1000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x), "next_f64 returned {}", x);
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = SeededRng::from_u64(42);
        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn test_chance_is_roughly_fair() {
        let mut rng = SeededRng::from_u64(3);
        let hits = (0..10_000).filter(|_| rng.chance(0.5)).count();
        assert!(hits > 4_500 && hits < 5_500, "fair coin gave {} heads", hits);
    }

    #[test]
    fn test_expand_seed_distinct() {
        assert_ne!(expand_seed(1), expand_seed(2));
        assert_eq!(expand_seed(9), expand_seed(9));
    }
}
