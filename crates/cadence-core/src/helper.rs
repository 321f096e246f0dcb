//! Public helper data (secure sketch) and its binary wire format.
//!
//! # Wire Layout
//!
//! ```text
//! Magic (4 B) | Version (1 B) | Symbol bits (1 B) | Code len (1 B) | Error budget (1 B) | Offsets (code len B)
//! ```
//!
//! - **Magic**: `b"CDFX"` identifies a Cadence fuzzy-extractor helper
//! - **Version**: [`HELPER_FORMAT_VERSION`]; newer versions are rejected
//! - **Offsets**: per-symbol `(codeword - code) mod p`, one byte each
//!
//! The encoding is fixed-size for a given scheme: `8 + L` bytes.

use serde::{Deserialize, Serialize};

use crate::error::FuzzyError;
use crate::params::SchemeParams;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes identifying encoded helper data.
pub const HELPER_MAGIC: &[u8; 4] = b"CDFX";

/// Current helper format version.
pub const HELPER_FORMAT_VERSION: u8 = 1;

/// Bytes preceding the offsets.
pub const HELPER_HEADER_LEN: usize = 8;

/// Length of the magic bytes.
const MAGIC_LEN: usize = 4;

/// Domain-separation context for helper fingerprints.
const FINGERPRINT_CONTEXT: &str = "cadence 2026 helper-data fingerprint v1";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Public sketch bound to one enrollment secret.
///
/// Safe to store or transmit in the clear. Carries the scheme it was made
/// under so a mismatched configuration is caught before any decoding.
/// There are no mutators: a helper is immutable once generated.
#[must_use = "helper data must be stored to reproduce the secret"]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperData {
    scheme: SchemeParams,
    offsets: Vec<u8>,
}

impl HelperData {
    pub(crate) const fn new(scheme: SchemeParams, offsets: Vec<u8>) -> Self {
        Self { scheme, offsets }
    }

    /// Scheme parameters this helper was generated under.
    #[must_use]
    pub const fn scheme(&self) -> &SchemeParams {
        &self.scheme
    }

    /// Per-symbol offsets, each `< p`.
    #[must_use]
    pub fn offsets(&self) -> &[u8] {
        &self.offsets
    }

    /// Check this helper against the scheme a caller expects.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::ConfigurationMismatch`] if the embedded scheme
    /// differs from `expected`, the offset count differs from `L`, or any
    /// offset lies outside the field.
    pub fn check(&self, expected: &SchemeParams) -> Result<(), FuzzyError> {
        if &self.scheme != expected {
            return Err(FuzzyError::ConfigurationMismatch(format!(
                "helper was generated for {:?}, extractor is configured for {expected:?}",
                self.scheme
            )));
        }
        if self.offsets.len() != expected.code_len {
            return Err(FuzzyError::ConfigurationMismatch(format!(
                "helper has {} offsets (expected {})",
                self.offsets.len(),
                expected.code_len
            )));
        }
        let p = expected.field_modulus();
        if let Some(pos) = self.offsets.iter().position(|&o| u32::from(o) >= p) {
            return Err(FuzzyError::ConfigurationMismatch(format!(
                "helper offset at position {pos} is outside GF({p})"
            )));
        }
        Ok(())
    }

    /// Encode into the fixed-size wire format.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::HelperFormat`] if a scheme field does not fit
    /// its one-byte slot.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FuzzyError> {
        let code_len = u8::try_from(self.scheme.code_len)
            .map_err(|_| FuzzyError::HelperFormat("code length does not fit in a byte".into()))?;
        let budget = u8::try_from(self.scheme.error_budget)
            .map_err(|_| FuzzyError::HelperFormat("error budget does not fit in a byte".into()))?;
        let total = HELPER_HEADER_LEN
            .checked_add(self.offsets.len())
            .ok_or_else(|| FuzzyError::HelperFormat("helper size overflow".into()))?;

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(HELPER_MAGIC);
        out.push(HELPER_FORMAT_VERSION);
        out.push(self.scheme.symbol_bits);
        out.push(code_len);
        out.push(budget);
        out.extend_from_slice(&self.offsets);
        Ok(out)
    }

    /// Decode from the wire format and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::HelperFormat`] for a short buffer, wrong magic,
    /// unsupported version, trailing or missing offset bytes, or an embedded
    /// scheme/offset that fails validation.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FuzzyError> {
        if data.len() < HELPER_HEADER_LEN {
            return Err(FuzzyError::HelperFormat(format!(
                "helper too short: {} bytes (minimum {HELPER_HEADER_LEN})",
                data.len()
            )));
        }
        let (header, offsets) = data.split_at(HELPER_HEADER_LEN);
        if &header[..MAGIC_LEN] != HELPER_MAGIC.as_slice() {
            return Err(FuzzyError::HelperFormat("invalid magic bytes".into()));
        }
        let version = header[4];
        if version == 0 || version > HELPER_FORMAT_VERSION {
            return Err(FuzzyError::HelperFormat(format!(
                "helper format version {version} is not supported (current {HELPER_FORMAT_VERSION})"
            )));
        }

        let scheme = SchemeParams {
            symbol_bits: header[5],
            code_len: usize::from(header[6]),
            error_budget: usize::from(header[7]),
        };
        scheme
            .validate()
            .map_err(|e| FuzzyError::HelperFormat(format!("invalid embedded scheme: {e}")))?;
        if offsets.len() != scheme.code_len {
            return Err(FuzzyError::HelperFormat(format!(
                "helper carries {} offsets but declares code length {}",
                offsets.len(),
                scheme.code_len
            )));
        }

        let helper = Self::new(scheme, offsets.to_vec());
        helper
            .check(&helper.scheme)
            .map_err(|e| FuzzyError::HelperFormat(e.to_string()))?;
        Ok(helper)
    }

    /// Stable public identifier of this helper (BLAKE3 derive-key mode).
    ///
    /// Lets a caller key its own store of enrollments without exposing
    /// anything beyond the helper itself.
    #[must_use]
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new_derive_key(FINGERPRINT_CONTEXT);
        hasher.update(&self.scheme.tag());
        hasher.update(&self.offsets);
        *hasher.finalize().as_bytes()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
