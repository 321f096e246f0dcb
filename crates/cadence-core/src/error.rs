//! Error types for `cadence-core`.

use thiserror::Error;

/// Errors produced by sketching, secret recovery and enrollment.
///
/// Quantization never fails; an empty capture becomes the all-zero code.
#[derive(Debug, Error)]
pub enum FuzzyError {
    /// Code length/alphabet or helper shape does not match the configured scheme.
    #[error("configuration mismatch: {0}")]
    ConfigurationMismatch(String),

    /// The reproduction code is farther from the enrollment code than the
    /// decoder can correct. A fresh capture is required.
    #[error("decode failure: input is outside the error budget")]
    DecodeFailure,

    /// An enrollment capture whose code sits within the error budget of the
    /// all-zero code every empty capture produces.
    #[error(
        "enrollment capture has {informative} informative symbols; more than {error_budget} required"
    )]
    WeakEnrollment {
        /// Nonzero symbols in the enrollment code.
        informative: usize,
        /// Configured error budget `t`.
        error_budget: usize,
    },

    /// Scheme or quantizer parameters are out of range.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Helper data wire format parsing or serialization error.
    #[error("helper data format error: {0}")]
    HelperFormat(String),

    /// Secret derivation from the recovered codeword failed.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// The injected random source could not produce a codeword.
    #[error("randomness error: {0}")]
    Randomness(String),

    /// Signing key construction or signature verification failure.
    #[error("signature error: {0}")]
    Signature(String),
}
