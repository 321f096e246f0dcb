//! Caller-owned enrollment identity.
//!
//! An [`Enrollment`] bundles the deployment configuration with the helper
//! data of one enrolled identity. The caller owns it, stores it wherever it
//! likes and passes it back in to reproduce. Any number of enrollments can
//! coexist and be used from concurrent threads; the core keeps no registry.
//!
//! ```text
//! enroll:    raw timing ──► quantize ──► generate ──► (Secret, Enrollment)
//! reproduce: raw timing ──► quantize ──► reproduce(helper) ──► Secret
//! ```

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::code::Code;
use crate::error::FuzzyError;
use crate::extractor::FuzzyExtractor;
use crate::helper::HelperData;
use crate::params::FuzzyConfig;
use crate::quantizer::quantize;
use crate::secret::Secret;

/// One enrolled identity: configuration plus its public helper data.
///
/// Contains no secret material and is safe to serialize.
#[must_use = "the enrollment must be kept to reproduce the secret"]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    config: FuzzyConfig,
    helper: HelperData,
}

impl Enrollment {
    /// Quantize an enrollment capture and generate its secret and helper.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InvalidParameters`] / [`FuzzyError::ConfigurationMismatch`]
    /// for an invalid `config`, [`FuzzyError::WeakEnrollment`] when the code
    /// has no more than `t` nonzero symbols (an empty capture, or one so short
    /// that zero padding dominates), and anything
    /// [`FuzzyExtractor::generate`] returns.
    pub fn enroll<R: RngCore + CryptoRng>(
        raw: &[f64],
        config: FuzzyConfig,
        rng: &mut R,
    ) -> Result<(Secret, Self), FuzzyError> {
        config.validate()?;
        let extractor = FuzzyExtractor::new(config.scheme.clone())?;
        let code = quantize(raw, &config.quantizer, config.scheme.code_len);
        let informative = code.distance(&Code::zeroed(code.len()));
        if informative <= config.scheme.error_budget {
            return Err(FuzzyError::WeakEnrollment {
                informative,
                error_budget: config.scheme.error_budget,
            });
        }
        let (secret, helper) = extractor.generate(&code, rng)?;
        tracing::debug!(
            code_len = config.scheme.code_len,
            error_budget = config.scheme.error_budget,
            "identity enrolled"
        );
        Ok((secret, Self { config, helper }))
    }

    /// Rebuild an enrollment from stored parts.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid or `helper` was generated under
    /// a different scheme.
    pub fn from_parts(config: FuzzyConfig, helper: HelperData) -> Result<Self, FuzzyError> {
        config.validate()?;
        helper.check(&config.scheme)?;
        Ok(Self { config, helper })
    }

    /// Quantize a fresh capture and recover the enrolled secret.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::DecodeFailure`] when the capture is outside the
    /// error budget (the caller should ask for a new capture), or a
    /// configuration error if this enrollment was deserialized from
    /// inconsistent data.
    pub fn reproduce(&self, raw: &[f64]) -> Result<Secret, FuzzyError> {
        self.config.validate()?;
        let extractor = FuzzyExtractor::new(self.config.scheme.clone())?;
        let code = quantize(raw, &self.config.quantizer, self.config.scheme.code_len);
        extractor.reproduce(&code, &self.helper)
    }

    /// Deployment configuration of this identity.
    #[must_use]
    pub const fn config(&self) -> &FuzzyConfig {
        &self.config
    }

    /// Public helper data of this identity.
    #[must_use]
    pub const fn helper(&self) -> &HelperData {
        &self.helper
    }

    /// Public identifier for keying a caller-side store.
    #[must_use]
    pub fn fingerprint(&self) -> [u8; 32] {
        self.helper.fingerprint()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
