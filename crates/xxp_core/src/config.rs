//! Limits applied by encoders and decoders.

use crate::defaults;
use crate::err::{Error, Result};

/// Codec limits.
///
/// Encoder and decoder do not need to agree on these, but a decoder with
/// lower limits than the encoder rejects some of its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Deepest allowed nesting of arrays, lists, maps and records
    pub max_depth: usize,

    /// Largest element or pair count of an array, list or map.
    ///
    /// String byte lengths are not counted, a string is bounded by the input.
    pub max_len: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: defaults::MAX_DEPTH,
            max_len: defaults::MAX_LEN,
        }
    }
}

impl CodecConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Checks an element/pair count against [CodecConfig::max_len]
    pub(crate) fn check_len(&self, len: u64) -> Result<usize> {
        usize::try_from(len)
            .ok()
            .filter(|len| *len <= self.max_len)
            .ok_or(Error::LengthLimitExceeded {
                len,
                max: self.max_len,
            })
    }
}

/// Tracks the current nesting level of a traversal.
#[derive(Debug)]
pub(crate) struct DepthCounter {
    depth: usize,
    max: usize,
}

impl DepthCounter {
    pub fn new(max: usize) -> Self {
        Self { depth: 0, max }
    }

    /// Go one level deeper
    pub fn enter(&mut self) -> Result<()> {
        if self.depth >= self.max {
            return Err(Error::DepthLimitExceeded(self.max));
        }
        self.depth += 1;
        Ok(())
    }

    /// Come back up one level
    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
