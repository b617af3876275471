//! # text-lsh
//!
//! Approximate nearest-neighbor text search built on Locality-Sensitive
//! Hashing with MinHash signatures over character-shingle sets. The index
//! is built once from a corpus of `(key, payload)` pairs and queried with a
//! free-form string; results are payloads whose keys look similar to the
//! query, ranked by an approximate cosine score.
//!
//! ## Core Pipeline
//!
//! 1. **Shingling**: every key is cut into the set of its distinct
//!    fixed-width byte windows. Shared windows are what make two keys
//!    "similar" to the index.
//!
//! 2. **Vocabulary**: the union of all shingles gets a frozen 1-based
//!    position assignment. An entry's shingle set becomes a one-hot
//!    presence vector over these positions.
//!
//! 3. **MinHash signatures**: for each of `num_bands` random permutations
//!    of the vocabulary, the first `r` present positions (in permutation
//!    order) are emitted, giving a signature of `signature_length = num_bands × r`
//!    values. Similar shingle sets agree on many emissions.
//!
//! 4. **Banded buckets**: each signature band is rendered into a canonical
//!    fingerprint and inserted into that band's bucket map. At query time,
//!    entries sharing at least one identical band with the query are
//!    candidates; candidates are then cosine-scored over full signatures
//!    and filtered by a caller threshold. The bucket filter is what keeps
//!    scoring far below a full corpus scan.
//!
//! Signature computation during build can be fanned out over a bounded
//! work-queue of entry chunks (see [`WorkGroup`]); the queue primitive is
//! exposed because it is useful on its own.
//!
//! ## Key Concepts
//!
//! - **Immutability**: a built index never changes. Queries take `&self`
//!   and any number of threads may search concurrently without locks.
//! - **Payload identity**: payloads implement [`Payload`] with a hashable
//!   `id()`, which deduplicates candidates that collide in several bands.
//! - **Randomness**: permutations are drawn fresh per build, so two builds
//!   over the same corpus are equivalent but not identical. Within one
//!   index, build-time and query-time signatures share the permutation
//!   table, which is what makes a key find itself with score 1.0.
//!
//! ## Example
//!
//! ```
//! use text_lsh::{Lsh, LshConfig, Payload};
//!
//! #[derive(Debug, Clone)]
//! struct Doc {
//!     id: u64,
//! }
//!
//! impl Payload for Doc {
//!     type Id = u64;
//!
//!     fn id(&self) -> u64 {
//!         self.id
//!     }
//! }
//!
//! let corpus = vec![
//!     ("hello world".to_string(), Doc { id: 1 }),
//!     ("goodbye world".to_string(), Doc { id: 2 }),
//! ];
//! let index = Lsh::build(LshConfig::new(12, 6, 3), corpus);
//!
//! let hits = index.find("hello world", 0.5);
//! assert!(hits.iter().any(|hit| hit.payload.id == 1 && hit.score > 0.99));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

mod buckets;
mod config;
mod index;
mod permutation;
mod shingle;
mod signature;
mod similarity;
mod vocab;
mod workgroup;

pub use crate::buckets::{band_fingerprint, BandBuckets, BucketCell};
pub use crate::config::{ConfigError, LshConfig};
pub use crate::index::{Entry, Lsh, Payload, SearchHit};
pub use crate::permutation::{PermutationTable, MAX_POSITION};
pub use crate::shingle::{shingle, Shingle};
pub use crate::signature::{compute_signature, split_bands};
pub use crate::similarity::{cosine_u32, jaccard};
pub use crate::vocab::Vocabulary;
pub use crate::workgroup::{chunk_even, ErrorGroup, WorkError, WorkGroup};

/// Process-wide toggle for build/query diagnostics.
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enable or disable diagnostic logging (vocabulary size, bucket counts,
/// timings) across the whole process. Diagnostics are emitted through
/// `tracing` at info/debug level; a subscriber still decides whether they
/// are shown.
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub(crate) fn verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}
