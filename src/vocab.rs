//! Shingle vocabulary and one-hot presence encoding.
//!
//! The vocabulary is the union of all shingles seen across the corpus, with
//! a stable 1-based position assigned to each. Position 0 is reserved so a
//! zero in a signature can always be read as "absent". The assignment is
//! frozen once built: permutations and signatures index into it for the
//! lifetime of the index.

use std::collections::HashSet;

use bit_vec::BitVec;
use hashbrown::HashMap;

use crate::shingle::Shingle;

/// Frozen mapping from shingle to 1-based vocabulary position.
#[derive(Debug)]
pub struct Vocabulary {
    positions: HashMap<Box<[u8]>, u32>,
}

impl Vocabulary {
    /// Union the given shingle sets and assign each distinct shingle a
    /// position in `1..=len`.
    pub fn build<'a, I>(shingle_sets: I) -> Self
    where
        I: IntoIterator<Item = &'a HashSet<Shingle<'a>>>,
    {
        let mut union: HashSet<Shingle<'a>> = HashSet::new();
        for set in shingle_sets {
            union.extend(set.iter().copied());
        }

        let mut positions = HashMap::with_capacity(union.len());
        for (index, shingle) in union.into_iter().enumerate() {
            positions.insert(Box::from(shingle), (index + 1) as u32);
        }
        Self { positions }
    }

    /// Number of distinct shingles (V).
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// 1-based position of `shingle`, or `None` when it is not part of the
    /// corpus vocabulary.
    pub fn position(&self, shingle: &[u8]) -> Option<u32> {
        self.positions.get(shingle).copied()
    }

    /// One-hot presence vector of length V: bit `p - 1` is set exactly when
    /// vocabulary position `p` occurs in `shingles`.
    ///
    /// Shingles absent from the vocabulary contribute nothing, which is what
    /// makes query-time encoding of unseen text well-defined.
    pub fn one_hot(&self, shingles: &HashSet<Shingle<'_>>) -> BitVec {
        let mut presence = BitVec::from_elem(self.positions.len(), false);
        for shingle in shingles {
            if let Some(position) = self.position(shingle) {
                presence.set((position - 1) as usize, true);
            }
        }
        presence
    }
}
