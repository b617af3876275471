//! Random vocabulary permutations.
//!
//! Each band of the index owns one uniform random permutation of the
//! vocabulary positions `1..=V`. A permutation plays the role of a hash
//! function: the order in which it visits an entry's present positions
//! determines the entry's MinHash emissions for that band.

use rand::seq::SliceRandom;
use rand::thread_rng;

/// Largest vocabulary position a permutation element can carry. Position 0
/// is reserved for "absent", so `V` may be at most `u32::MAX - 1`.
pub const MAX_POSITION: u32 = u32::MAX - 1;

/// One random permutation of `1..=V` per band.
#[derive(Debug, Clone)]
pub struct PermutationTable {
    permutations: Vec<Vec<u32>>,
}

impl PermutationTable {
    /// Draw `num_bands` independent permutations of `1..=vocab_len`.
    ///
    /// # Panics
    ///
    /// Panics when `vocab_len` exceeds [`MAX_POSITION`]: positions would no
    /// longer fit the permutation element type. Reduce the corpus or widen
    /// the element type.
    pub fn generate(num_bands: usize, vocab_len: usize) -> Self {
        assert!(
            vocab_len as u64 <= MAX_POSITION as u64,
            "lsh: vocabulary of {vocab_len} shingles exceeds the permutation element range"
        );

        let mut rng = thread_rng();
        let mut permutations = Vec::with_capacity(num_bands);
        for _ in 0..num_bands {
            let mut permutation: Vec<u32> = (1..=vocab_len as u32).collect();
            permutation.shuffle(&mut rng);
            permutations.push(permutation);
        }
        Self { permutations }
    }

    pub fn num_bands(&self) -> usize {
        self.permutations.len()
    }

    /// Permutation backing band `band_index`.
    pub fn band(&self, band_index: usize) -> &[u32] {
        &self.permutations[band_index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u32]> {
        self.permutations.iter().map(Vec::as_slice)
    }
}
