//! Fixed-length symbol codes produced by the quantizer.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::FuzzyError;
use crate::params::SchemeParams;

/// A quantized keystroke code: `L` symbols from a `2^k`-level alphabet.
///
/// Codes are biometric templates, so they are wiped on drop and their
/// `Debug` output shows only the length.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Code {
    symbols: Vec<u8>,
}

impl Code {
    /// Wrap raw symbols without checking them against a scheme.
    #[must_use]
    pub fn from_symbols(symbols: Vec<u8>) -> Self {
        Self { symbols }
    }

    /// All-zero code of length `len`, the quantizer's empty-capture output.
    #[must_use]
    pub fn zeroed(len: usize) -> Self {
        Self {
            symbols: vec![0; len],
        }
    }

    /// The symbols.
    #[must_use]
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the code has no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether every symbol is zero.
    #[must_use]
    pub fn is_zeroed(&self) -> bool {
        self.symbols.iter().all(|&s| s == 0)
    }

    /// Symbol-wise Hamming distance. Positions present in only one of the two
    /// codes count as differing.
    #[must_use]
    pub fn distance(&self, other: &Self) -> usize {
        let common = self
            .symbols
            .iter()
            .zip(&other.symbols)
            .filter(|(a, b)| a != b)
            .count();
        let extra = self.symbols.len().abs_diff(other.symbols.len());
        common.saturating_add(extra)
    }

    /// Check length and alphabet against `scheme`.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::ConfigurationMismatch`] if the length differs from
    /// `scheme.code_len` or any symbol falls outside the alphabet.
    pub fn check(&self, scheme: &SchemeParams) -> Result<(), FuzzyError> {
        if self.symbols.len() != scheme.code_len {
            return Err(FuzzyError::ConfigurationMismatch(format!(
                "code has {} symbols (expected {})",
                self.symbols.len(),
                scheme.code_len
            )));
        }
        let alphabet = scheme.alphabet_size();
        if let Some(pos) = self
            .symbols
            .iter()
            .position(|&s| u32::from(s) >= alphabet)
        {
            return Err(FuzzyError::ConfigurationMismatch(format!(
                "symbol at position {pos} is outside the {alphabet}-level alphabet"
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code(len={})", self.symbols.len())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
