//! The LSH index: build orchestration and the two-stage query engine.
//!
//! Build: shingle every key, freeze the vocabulary, draw one permutation
//! per band, compute entry signatures (optionally on a worker pool), then
//! insert each entry's bands into the per-band buckets. Query: signature
//! the query text with the same vocabulary and permutations, gather
//! candidates from colliding bucket cells, score candidates with cosine
//! similarity over full signatures, and return the survivors sorted by
//! score.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;
use std::thread;
use std::time::Instant;

use hashbrown::HashMap;
use tracing::{debug, info};

use crate::buckets::BandBuckets;
use crate::config::LshConfig;
use crate::permutation::PermutationTable;
use crate::shingle::{shingle, Shingle};
use crate::signature::{compute_signature, split_bands};
use crate::similarity::cosine_u32;
use crate::verbose;
use crate::vocab::Vocabulary;
use crate::workgroup::{chunk_even, WorkGroup};

/// Capability the index requires of caller payloads: a hashable identity
/// that makes an entry logically unique across bucket cells.
pub trait Payload {
    type Id: Hash + Eq;

    fn id(&self) -> Self::Id;
}

/// One indexed entry: the original key, its signature, and the payload.
#[derive(Debug, Clone)]
pub struct Entry<P> {
    pub key: String,
    pub signature: Vec<u32>,
    pub payload: P,
}

/// One query result: the similarity score and the matched entry.
#[derive(Debug)]
pub struct SearchHit<'a, P> {
    /// Cosine similarity between the stored and the search signature.
    pub score: f64,
    /// Key the matched entry was indexed under.
    pub key: &'a str,
    pub payload: &'a P,
}

/// Immutable LSH index over a corpus of `(key, payload)` pairs.
///
/// Built once from a complete corpus; afterwards any number of threads may
/// query it concurrently without synchronization.
pub struct Lsh<P> {
    vocabulary: Vocabulary,
    permutations: PermutationTable,
    entries: Vec<Entry<P>>,
    buckets: BandBuckets,
    config: LshConfig,
}

impl<P: Payload> Lsh<P> {
    /// Build an index over `data`.
    ///
    /// # Panics
    ///
    /// The configuration invariants are fatal: panics when
    /// `signature_length` is not divisible by `num_bands`, when `num_bands`
    /// or `shingle_width` is zero, or when the corpus vocabulary exceeds
    /// the permutation element range.
    pub fn build(config: LshConfig, data: Vec<(String, P)>) -> Self {
        if let Err(err) = config.validate() {
            panic!("lsh: {err}");
        }
        let start = Instant::now();

        // Shingle sets borrow from the keys; they are dropped as soon as
        // the signatures exist.
        let shingle_sets: Vec<HashSet<Shingle<'_>>> = data
            .iter()
            .map(|(key, _)| shingle(config.shingle_width, key))
            .collect();

        let vocabulary = Vocabulary::build(shingle_sets.iter());
        if verbose() {
            info!(vocab_size = vocabulary.len(), "built shingle vocabulary");
        }

        let permutations = PermutationTable::generate(config.num_bands, vocabulary.len());
        if verbose() {
            info!(
                num_bands = permutations.num_bands(),
                signature_length = config.signature_length,
                "prepared random permutations"
            );
        }

        let signatures = compute_signatures(&config, &vocabulary, &permutations, &shingle_sets);
        drop(shingle_sets);

        // Bucket insertion stays serialized in the orchestrator after the
        // signature workers have joined.
        let mut buckets = BandBuckets::new(config.num_bands);
        for (entry_index, signature) in signatures.iter().enumerate() {
            for (band_index, band) in split_bands(signature, config.num_bands).iter().enumerate() {
                buckets.insert(band_index, band, entry_index);
            }
        }

        let entries: Vec<Entry<P>> = data
            .into_iter()
            .zip(signatures)
            .map(|((key, payload), signature)| Entry {
                key,
                signature,
                payload,
            })
            .collect();

        if verbose() {
            info!(
                entries = entries.len(),
                bucket_cells = buckets.cell_count(),
                elapsed_micros = start.elapsed().as_micros(),
                "lsh index built"
            );
        }

        Self {
            vocabulary,
            permutations,
            entries,
            buckets,
            config,
        }
    }

    /// Find entries similar to `query`, sorted by score descending.
    ///
    /// Candidates come from bucket cells whose band matches one of the
    /// query's bands exactly; each candidate's full stored signature is
    /// then cosine-scored against the search signature, and hits below
    /// `similarity_threshold` are dropped. Equal scores are ordered by key.
    pub fn find(&self, query: &str, similarity_threshold: f64) -> Vec<SearchHit<'_, P>> {
        let start = Instant::now();

        let shingles = shingle(self.config.shingle_width, query);
        if shingles.is_empty() {
            // Nothing to hash: the search signature would be all zeros.
            if verbose() {
                debug!(query_len = query.len(), "query too short to shingle");
            }
            return Vec::new();
        }

        let search_signature = compute_signature(
            &self.vocabulary.one_hot(&shingles),
            &self.permutations,
            self.config.signature_length,
        );

        // Locality phase: entries sharing at least one identical band are
        // candidates, deduplicated by payload identity.
        let mut candidates: HashMap<P::Id, usize> = HashMap::new();
        let mut bucket_matches = 0usize;
        for (band_index, band) in split_bands(&search_signature, self.config.num_bands)
            .iter()
            .enumerate()
        {
            if let Some(cell) = self.buckets.lookup(band_index, band) {
                bucket_matches += 1;
                for &entry_index in &cell.entries {
                    candidates.insert(self.entries[entry_index].payload.id(), entry_index);
                }
            }
        }
        if verbose() {
            debug!(
                candidates = candidates.len(),
                bucket_matches, "gathered band candidates"
            );
        }

        // Scoring phase: cosine over full signatures, threshold filter.
        let mut hits: Vec<SearchHit<'_, P>> = candidates
            .into_values()
            .map(|entry_index| {
                let entry = &self.entries[entry_index];
                SearchHit {
                    score: cosine_u32(&entry.signature, &search_signature),
                    key: &entry.key,
                    payload: &entry.payload,
                }
            })
            .filter(|hit| hit.score >= similarity_threshold)
            .collect();

        hits.sort_unstable_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.key.cmp(b.key))
        });

        if verbose() {
            debug!(
                results = hits.len(),
                elapsed_micros = start.elapsed().as_micros(),
                "query scored"
            );
        }
        hits
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry arena, in corpus order.
    pub fn entries(&self) -> &[Entry<P>] {
        &self.entries
    }

    pub fn config(&self) -> &LshConfig {
        &self.config
    }

    /// Number of distinct shingles the corpus produced.
    pub fn vocab_len(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Compute one signature per shingle set, in corpus order.
///
/// With `use_parallel` set the sets are split into per-worker ranges and
/// fanned out over a work group; each worker writes signatures into its own
/// disjoint range of preallocated slots. Both paths produce identical
/// output for the same vocabulary and permutations.
fn compute_signatures(
    config: &LshConfig,
    vocabulary: &Vocabulary,
    permutations: &PermutationTable,
    shingle_sets: &[HashSet<Shingle<'_>>],
) -> Vec<Vec<u32>> {
    let workers = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    if !config.use_parallel || workers < 2 || shingle_sets.len() < 2 {
        return shingle_sets
            .iter()
            .map(|set| {
                compute_signature(&vocabulary.one_hot(set), permutations, config.signature_length)
            })
            .collect();
    }

    let total = shingle_sets.len();
    let mut signatures: Vec<Vec<u32>> = vec![Vec::new(); total];
    {
        // Pre-chunk the entry range, then pair each run of shingle sets
        // with the matching range of signature slots so chunks share no
        // mutable state.
        let runs = chunk_even((0..total).collect::<Vec<usize>>(), workers);
        let mut work: Vec<(&[HashSet<Shingle<'_>>], &mut [Vec<u32>])> =
            Vec::with_capacity(runs.len());
        let mut sets_rest = shingle_sets;
        let mut slots_rest = signatures.as_mut_slice();
        for run in &runs {
            let (set_chunk, sets_tail) = sets_rest.split_at(run.len());
            let (slot_chunk, slots_tail) = slots_rest.split_at_mut(run.len());
            sets_rest = sets_tail;
            slots_rest = slots_tail;
            work.push((set_chunk, slot_chunk));
        }

        let errors = WorkGroup::new(workers, work).execute(|(sets, slots)| {
            for (set, slot) in sets.iter().zip(slots.iter_mut()) {
                *slot = compute_signature(
                    &vocabulary.one_hot(set),
                    permutations,
                    config.signature_length,
                );
            }
            Ok(())
        });
        // Signature computation is infallible; the collector exists for the
        // general work-group contract.
        debug_assert!(errors.is_empty());
    }
    signatures
}
