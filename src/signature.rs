//! MinHash signature computation and band views.
//!
//! A signature compresses an entry's one-hot presence vector into `L`
//! positions, `r = L / B` per band. For each band the permutation is walked
//! in order and every present position is emitted until `r` slots are
//! filled. An entry with fewer than `r` present shingles leaves the tail of
//! the band at the default 0, which cannot collide with a real position.

use bit_vec::BitVec;

use crate::permutation::PermutationTable;

/// Compute the banded MinHash signature for one presence vector.
///
/// `signature_length` must be divisible by the table's band count; the
/// build path validates this before any signature is computed.
pub fn compute_signature(
    presence: &BitVec,
    table: &PermutationTable,
    signature_length: usize,
) -> Vec<u32> {
    let num_bands = table.num_bands();
    debug_assert!(num_bands >= 1);
    debug_assert_eq!(signature_length % num_bands, 0);
    let band_width = signature_length / num_bands;

    let mut signature = vec![0u32; signature_length];
    for (band_index, permutation) in table.iter().enumerate() {
        let slots = &mut signature[band_index * band_width..(band_index + 1) * band_width];
        let mut filled = 0;
        for &position in permutation {
            if filled == band_width {
                break;
            }
            if presence.get((position - 1) as usize).unwrap_or(false) {
                // Emit the 1-indexed position itself, not its rank.
                slots[filled] = position;
                filled += 1;
            }
        }
    }
    signature
}

/// Split a signature into `num_bands` non-overlapping views of equal width.
///
/// # Panics
///
/// Panics when the signature length is not divisible by `num_bands`.
pub fn split_bands(signature: &[u32], num_bands: usize) -> Vec<&[u32]> {
    assert!(
        num_bands >= 1 && signature.len() % num_bands == 0,
        "cannot split a signature of length {} into {num_bands} bands",
        signature.len()
    );
    signature.chunks(signature.len() / num_bands).collect()
}
