//! Hash primitives for MinHash signatures and LSH bands.
//!
//! Two universal hash families are fixed at index construction: the row
//! family over [`P1`] feeds the signature minima, the band family over
//! [`P2`] reduces each group of `R` signature rows to one band value.
//! Families are stored as coefficient vectors so they can be persisted
//! alongside the signatures they generated.

use std::hash::Hasher;

use fnv::FnvHasher;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The smallest prime larger than 2^32, used to hash shingle codes.
pub const P1: u64 = 4_294_967_311;

/// A much larger prime used to hash signature rows into bands.
pub const P2: u64 = 7_562_380_294_967_317;

/// Hash a shingle to its 32-bit seed value.
///
/// FNV-1a over the shingle bytes, truncated to 32 bits. Stable across
/// invocations so identical shingles in different documents feed the
/// row hashers the same input.
pub fn shingle_code(shingle: &str) -> u32 {
    let mut hasher = FnvHasher::default();
    hasher.write(shingle.as_bytes());
    hasher.finish() as u32
}

/// A family of linear hash functions `h_i(x) = ((a_i * x + b_i) mod prime) mod 2^32`.
///
/// Coefficients are drawn once from the index PRNG and never mutated;
/// multi-argument inputs are folded to a single operand before the
/// linear step (see [`fold`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashFamily {
    prime: u64,
    coefficients: Vec<(u32, u32)>,
}

impl HashFamily {
    /// Generate `count` hash functions over `prime`, drawing two random
    /// 32-bit coefficients per function from `rng`.
    pub fn generate(count: usize, prime: u64, rng: &mut impl Rng) -> Self {
        let coefficients = (0..count)
            .map(|_| (rng.random::<u32>(), rng.random::<u32>()))
            .collect();

        Self {
            prime,
            coefficients,
        }
    }

    /// Number of hash functions in the family.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Whether the family is empty.
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// The prime this family reduces over.
    pub fn prime(&self) -> u64 {
        self.prime
    }

    /// Apply the `index`-th function to a single 32-bit input.
    pub fn hash_one(&self, index: usize, value: u32) -> u32 {
        self.apply(index, u64::from(value))
    }

    /// Apply the `index`-th function to a multi-argument input.
    ///
    /// Two slices produce the same value essentially iff they are
    /// elementwise equal; this is what makes a band collision a faithful
    /// signal that all `R` rows in the band agree.
    pub fn hash_slice(&self, index: usize, values: &[u32]) -> u32 {
        self.apply(index, fold(values, self.prime))
    }

    fn apply(&self, index: usize, folded: u64) -> u32 {
        let (a, b) = self.coefficients[index];
        let value =
            (u128::from(a) * u128::from(folded) + u128::from(b)) % u128::from(self.prime);
        // mod 2^32
        value as u32
    }
}

/// Left-fold a sequence of 32-bit values into one 64-bit operand.
///
/// `acc = acc * prime + x` in wrapping arithmetic; the prime is odd, so
/// each step is invertible mod 2^64 and distinct row sequences collide
/// only with negligible probability. A single value folds to itself.
fn fold(values: &[u32], prime: u64) -> u64 {
    let mut iter = values.iter();
    let mut acc = u64::from(iter.next().copied().unwrap_or(0));
    for &value in iter {
        acc = acc.wrapping_mul(prime).wrapping_add(u64::from(value));
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_shingle_code_is_stable() {
        assert_eq!(shingle_code("he"), shingle_code("he"));
        assert_ne!(shingle_code("he"), shingle_code("eh"));
    }

    #[test]
    fn test_generate_is_deterministic_per_seed() {
        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);

        let family_a = HashFamily::generate(16, P1, &mut rng_a);
        let family_b = HashFamily::generate(16, P1, &mut rng_b);
        assert_eq!(family_a, family_b);

        let mut rng_c = StdRng::seed_from_u64(8);
        let family_c = HashFamily::generate(16, P1, &mut rng_c);
        assert_ne!(family_a, family_c);
    }

    #[test]
    fn test_functions_differ_within_family() {
        let mut rng = StdRng::seed_from_u64(42);
        let family = HashFamily::generate(8, P1, &mut rng);

        let outputs: Vec<u32> = (0..family.len()).map(|i| family.hash_one(i, 12345)).collect();
        let distinct: std::collections::HashSet<u32> = outputs.iter().copied().collect();
        assert!(distinct.len() > 1, "all hashers produced the same output");
    }

    #[test]
    fn test_single_value_folds_to_itself() {
        let mut rng = StdRng::seed_from_u64(42);
        let family = HashFamily::generate(4, P2, &mut rng);

        assert_eq!(family.hash_one(2, 99), family.hash_slice(2, &[99]));
    }

    #[test]
    fn test_slice_hash_is_order_sensitive() {
        let mut rng = StdRng::seed_from_u64(42);
        let family = HashFamily::generate(4, P2, &mut rng);

        assert_eq!(family.hash_slice(0, &[1, 2]), family.hash_slice(0, &[1, 2]));
        assert_ne!(family.hash_slice(0, &[1, 2]), family.hash_slice(0, &[2, 1]));
    }
}
