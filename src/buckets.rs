//! Band-bucket inverted index.
//!
//! For every band there is a map from a canonical band fingerprint to the
//! cell of entries carrying that band. Cells store arena indices into the
//! entry store rather than entry copies; the arena is immutable once the
//! index is built, so the indices stay valid for its lifetime.

use hashbrown::HashMap;

/// Canonical, equality-comparable rendering of one band.
///
/// Decimal values joined by `-`; digits never contain the separator, so two
/// bands render identically exactly when their element sequences are equal.
pub fn band_fingerprint(band: &[u32]) -> String {
    let mut fingerprint = String::with_capacity(band.len() * 4);
    for value in band {
        fingerprint.push_str(&value.to_string());
        fingerprint.push('-');
    }
    fingerprint
}

/// One bucket cell: the band contents and the arena indices of every entry
/// whose band produced this fingerprint.
#[derive(Debug, Clone)]
pub struct BucketCell {
    pub band: Vec<u32>,
    pub entries: Vec<usize>,
}

/// Per-band mapping from band fingerprint to bucket cell.
#[derive(Debug)]
pub struct BandBuckets {
    bands: Vec<HashMap<String, BucketCell>>,
}

impl BandBuckets {
    pub fn new(num_bands: usize) -> Self {
        Self {
            bands: (0..num_bands).map(|_| HashMap::new()).collect(),
        }
    }

    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    /// Record that entry `entry_index` carries `band` at `band_index`,
    /// creating the cell on first sight.
    pub fn insert(&mut self, band_index: usize, band: &[u32], entry_index: usize) {
        self.bands[band_index]
            .entry(band_fingerprint(band))
            .or_insert_with(|| BucketCell {
                band: band.to_vec(),
                entries: Vec::new(),
            })
            .entries
            .push(entry_index);
    }

    /// Cell holding `band` at `band_index`, if any entry produced it.
    pub fn lookup(&self, band_index: usize, band: &[u32]) -> Option<&BucketCell> {
        self.bands[band_index].get(&band_fingerprint(band))
    }

    /// Cells of one band, in no particular order.
    pub fn cells(&self, band_index: usize) -> impl Iterator<Item = &BucketCell> {
        self.bands[band_index].values()
    }

    /// Total cell count across all bands, for diagnostics.
    pub fn cell_count(&self) -> usize {
        self.bands.iter().map(HashMap::len).sum()
    }
}
