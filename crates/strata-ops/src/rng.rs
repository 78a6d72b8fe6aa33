//! Deterministic 48-bit linear congruential generator.
//!
//! Used by the mosaic filter to pick seed coordinates. The generator is the
//! classic `seed * 0x5DEECE66D + 0xB mod 2^48` recurrence with a scrambled
//! initial seed, so a given seed yields the same stream on every platform.

const MULTIPLIER: u64 = 0x5_DEEC_E66D;
const ADDEND: u64 = 0xB;
const MASK: u64 = (1 << 48) - 1;

/// Seeded pseudo-random source.
#[derive(Debug, Clone)]
pub struct Lcg48 {
    state: u64,
}

impl Lcg48 {
    /// Creates a generator from a seed.
    pub fn new(seed: i64) -> Self {
        Self {
            state: (seed as u64 ^ MULTIPLIER) & MASK,
        }
    }

    /// Advances the state and returns its top `bits` bits (`1..=32`).
    #[inline]
    fn next_bits(&mut self, bits: u32) -> i32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(ADDEND) & MASK;
        (self.state >> (48 - bits)) as u32 as i32
    }

    /// Uniformly distributed value over the full `i32` range.
    pub fn next_i32(&mut self) -> i32 {
        self.next_bits(32)
    }

    /// Uniformly distributed value in `[0, bound)`.
    ///
    /// Powers of two take the high bits directly; other bounds reject the
    /// values that would skew the distribution.
    ///
    /// # Panics
    ///
    /// Panics if `bound <= 0`.
    pub fn next_int(&mut self, bound: i32) -> i32 {
        assert!(bound > 0, "bound must be positive");
        let r = self.next_bits(31);
        let m = bound - 1;
        if bound & m == 0 {
            return ((i64::from(bound) * i64::from(r)) >> 31) as i32;
        }
        let mut u = r;
        loop {
            let r = u % bound;
            if u.wrapping_sub(r).wrapping_add(m) >= 0 {
                return r;
            }
            u = self.next_bits(31);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_stream() {
        let mut rng = Lcg48::new(42);
        let draws: Vec<i32> = (0..6).map(|_| rng.next_int(10)).collect();
        assert_eq!(draws, vec![0, 3, 8, 4, 0, 5]);
        assert_eq!(Lcg48::new(42).next_i32(), -1_170_105_035);
    }

    #[test]
    fn test_power_of_two_bound() {
        assert_eq!(Lcg48::new(42).next_int(16), 11);
        assert_eq!(Lcg48::new(3250).next_int(16), 13);
    }

    #[test]
    fn test_negative_seed() {
        let mut rng = Lcg48::new(-7);
        let draws: Vec<i32> = (0..4).map(|_| rng.next_int(10)).collect();
        assert_eq!(draws, vec![2, 7, 0, 7]);
    }

    #[test]
    fn test_shrinking_bounds() {
        let mut rng = Lcg48::new(3250);
        let draws: Vec<i32> = [9, 8, 7, 6, 5].iter().map(|&b| rng.next_int(b)).collect();
        assert_eq!(draws, vec![1, 5, 2, 0, 4]);
    }

    #[test]
    fn test_bound_one() {
        let mut rng = Lcg48::new(0);
        assert!((0..100).all(|_| rng.next_int(1) == 0));
    }
}
