//! Configuration for the LSH text index.
//!
//! The index is a pure function of `(corpus, config)` up to the random
//! permutation draw, so every tunable lives here rather than in free
//! parameters scattered across the build path.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Runtime configuration for [`crate::Lsh::build`].
///
/// `signature_length` must be divisible by `num_bands`; the quotient is the
/// band width *r* (the number of MinHash emissions per band).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LshConfig {
    /// Total length of each MinHash signature.
    ///
    /// Larger signatures give each entry more precision at the cost of
    /// memory and scoring time.
    pub signature_length: usize,
    /// Number of permutation bands.
    ///
    /// More bands raise recall and the false-positive rate of the bucket
    /// filter.
    pub num_bands: usize,
    /// Character-window size for shingling.
    ///
    /// Wider shingles make keys more unique (sparser vocabulary) and the
    /// match less fuzzy.
    pub shingle_width: usize,
    /// Compute entry signatures on a worker pool during build.
    pub use_parallel: bool,
}

impl Default for LshConfig {
    fn default() -> Self {
        Self {
            signature_length: 128,
            num_bands: 16,
            shingle_width: 3,
            use_parallel: false,
        }
    }
}

impl LshConfig {
    pub fn new(signature_length: usize, num_bands: usize, shingle_width: usize) -> Self {
        Self {
            signature_length,
            num_bands,
            shingle_width,
            ..Self::default()
        }
    }

    pub fn with_signature_length(mut self, signature_length: usize) -> Self {
        self.signature_length = signature_length;
        self
    }

    pub fn with_num_bands(mut self, num_bands: usize) -> Self {
        self.num_bands = num_bands;
        self
    }

    pub fn with_shingle_width(mut self, shingle_width: usize) -> Self {
        self.shingle_width = shingle_width;
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Band width *r* = `signature_length / num_bands`.
    ///
    /// Only meaningful for a configuration that passed [`validate`].
    ///
    /// [`validate`]: LshConfig::validate
    pub fn band_width(&self) -> usize {
        self.signature_length / self.num_bands
    }

    /// Check the build-time invariants.
    ///
    /// [`crate::Lsh::build`] treats any error here as fatal and panics;
    /// callers that want to fail soft can validate up front.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_bands < 1 {
            return Err(ConfigError::NoBands);
        }
        if self.signature_length < 1 {
            return Err(ConfigError::EmptySignature);
        }
        if self.signature_length % self.num_bands != 0 {
            return Err(ConfigError::UnevenBands {
                signature_length: self.signature_length,
                num_bands: self.num_bands,
            });
        }
        if self.shingle_width < 1 {
            return Err(ConfigError::NoShingleWidth);
        }
        Ok(())
    }
}

/// Invalid-configuration errors surfaced by [`LshConfig::validate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("num_bands must be at least 1")]
    NoBands,

    #[error("signature_length must be at least 1")]
    EmptySignature,

    #[error("signature_length {signature_length} is not divisible by num_bands {num_bands}")]
    UnevenBands {
        signature_length: usize,
        num_bands: usize,
    },

    #[error("shingle_width must be at least 1")]
    NoShingleWidth,
}
