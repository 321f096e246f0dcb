//! Code-offset fuzzy extractor over a Reed–Solomon code.
//!
//! This module provides:
//! - [`FuzzyExtractor::generate`]: enrollment: code → (secret, helper)
//! - [`FuzzyExtractor::reproduce`]: verification: (code', helper) → secret
//!
//! # Construction
//!
//! ```text
//! generate:  random message ──► RS encode ──► w ──► HKDF-SHA256 ──► secret
//!                                             │
//!                               helper = (w - code) mod p
//!
//! reproduce: (helper + code') mod p ──► RS decode ──► w ──► HKDF-SHA256 ──► secret
//! ```
//!
//! A reproduction code within `t` symbols of the enrollment code yields an
//! estimate within `t` symbols of `w`, which the decoder corrects. Beyond
//! `t` the decoder fails, except with probability bounded by
//! [`Tradeoff::miscorrection_bound`](crate::params::Tradeoff) it lands on a
//! different codeword and a wrong secret comes back.
//!
//! The extractor holds only immutable parameters; every call is a pure
//! function of its arguments and the injected random source.

use rand::{CryptoRng, RngCore};
use ring::hkdf;
use zeroize::Zeroize;

use crate::code::Code;
use crate::error::FuzzyError;
use crate::field::PrimeField;
use crate::helper::HelperData;
use crate::params::SchemeParams;
use crate::reed_solomon::ReedSolomon;
use crate::secret::{Secret, SECRET_LEN};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// HKDF salt for secret derivation (domain separation).
const HKDF_SALT: &[u8] = b"cadence-fuzzy-extractor-v1";

/// HKDF info prefix; the scheme tag follows it.
const HKDF_INFO: &[u8] = b"extracted-secret";

/// Random bytes drawn per refill while sampling field elements.
const SAMPLE_CHUNK: usize = 64;

// ---------------------------------------------------------------------------
// HKDF key type
// ---------------------------------------------------------------------------

/// Marker type for `ring::hkdf::Prk::expand`; requests 32-byte output.
struct SecretKeyType;

impl hkdf::KeyType for SecretKeyType {
    fn len(&self) -> usize {
        SECRET_LEN
    }
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Fuzzy extractor for one configured scheme.
#[derive(Clone, Debug)]
pub struct FuzzyExtractor {
    scheme: SchemeParams,
    code: ReedSolomon,
}

impl FuzzyExtractor {
    /// Build an extractor for `scheme`.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InvalidParameters`] if `scheme` fails validation.
    pub fn new(scheme: SchemeParams) -> Result<Self, FuzzyError> {
        scheme.validate()?;
        let field = PrimeField::new(scheme.field_modulus())?;
        let code = ReedSolomon::new(field, scheme.code_len, scheme.message_len())?;
        Ok(Self { scheme, code })
    }

    /// The scheme this extractor enforces.
    #[must_use]
    pub const fn scheme(&self) -> &SchemeParams {
        &self.scheme
    }

    /// Enroll `code`: draw a random codeword from `rng`, derive the secret
    /// from it and publish the code-offset helper.
    ///
    /// `rng` must be a cryptographically secure generator; callers normally
    /// pass `rand::rngs::OsRng`. Each call draws a fresh codeword, so two
    /// enrollments of the same code are unlinkable.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::ConfigurationMismatch`] if `code` does not fit the
    /// scheme, [`FuzzyError::Randomness`] if `rng` fails, and
    /// [`FuzzyError::KeyDerivation`] if HKDF fails.
    pub fn generate<R: RngCore + CryptoRng>(
        &self,
        code: &Code,
        rng: &mut R,
    ) -> Result<(Secret, HelperData), FuzzyError> {
        code.check(&self.scheme)?;
        tracing::trace!(
            code_len = self.scheme.code_len,
            symbol_bits = self.scheme.symbol_bits,
            error_budget = self.scheme.error_budget,
            "generating helper data"
        );

        let field = self.code.field();
        let mut message = sample_elements(rng, field, self.code.dimension())?;
        let encoded = self.code.encode(&message);
        message.zeroize();
        let mut codeword = encoded?;

        let offsets = codeword
            .iter()
            .zip(code.symbols())
            .map(|(&w, &c)| to_symbol(field.sub(w, u32::from(c))))
            .collect::<Result<Vec<u8>, _>>();

        let secret = derive_secret(&self.scheme, &codeword);
        codeword.zeroize();

        Ok((secret?, HelperData::new(self.scheme.clone(), offsets?)))
    }

    /// Recover the secret bound to `helper` from a fresh `code`.
    ///
    /// Succeeds deterministically whenever `code` is within the error budget
    /// of the enrollment code. Never retries.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::ConfigurationMismatch`] if `code` or `helper` does
    /// not fit the scheme (checked before any decoding) and
    /// [`FuzzyError::DecodeFailure`] if no codeword lies within the budget.
    pub fn reproduce(&self, code: &Code, helper: &HelperData) -> Result<Secret, FuzzyError> {
        code.check(&self.scheme)?;
        helper.check(&self.scheme)?;
        tracing::trace!(
            code_len = self.scheme.code_len,
            error_budget = self.scheme.error_budget,
            "reproducing secret"
        );

        let field = self.code.field();
        let mut estimate: Vec<u32> = helper
            .offsets()
            .iter()
            .zip(code.symbols())
            .map(|(&h, &c)| field.add(u32::from(h), u32::from(c)))
            .collect();

        let decoded = self.code.decode(&estimate);
        estimate.zeroize();

        let Some(mut codeword) = decoded else {
            tracing::debug!(
                error_budget = self.scheme.error_budget,
                "reproduction code outside error budget"
            );
            return Err(FuzzyError::DecodeFailure);
        };

        let secret = derive_secret(&self.scheme, &codeword);
        codeword.zeroize();
        secret
    }
}

/// Draw `count` uniform elements of `field` by rejection sampling bytes.
fn sample_elements<R: RngCore + CryptoRng>(
    rng: &mut R,
    field: &PrimeField,
    count: usize,
) -> Result<Vec<u32>, FuzzyError> {
    // Bytes at or above the largest multiple of p below 256 are discarded.
    let limit = 256u32.saturating_sub(field.reduce(256));

    let mut out = Vec::with_capacity(count);
    let mut buf = [0u8; SAMPLE_CHUNK];
    while out.len() < count {
        rng.try_fill_bytes(&mut buf)
            .map_err(|e| FuzzyError::Randomness(format!("CSPRNG fill failed: {e}")))?;
        out.extend(
            buf.iter()
                .map(|&b| u32::from(b))
                .filter(|&b| b < limit)
                .map(|b| field.reduce(b))
                .take(count.saturating_sub(out.len())),
        );
    }
    buf.zeroize();
    Ok(out)
}

fn to_symbol(element: u32) -> Result<u8, FuzzyError> {
    u8::try_from(element).map_err(|_| {
        FuzzyError::InvalidParameters(format!("field element {element} exceeds a byte"))
    })
}

/// HKDF-SHA256 over the codeword, bound to the scheme tag.
fn derive_secret(scheme: &SchemeParams, codeword: &[u32]) -> Result<Secret, FuzzyError> {
    let mut ikm = codeword
        .iter()
        .map(|&w| to_symbol(w))
        .collect::<Result<Vec<u8>, _>>()?;
    let tag = scheme.tag();

    let salt = hkdf::Salt::new(hkdf::HKDF_SHA256, HKDF_SALT);
    let prk = salt.extract(&ikm);
    ikm.zeroize();

    let info = [HKDF_INFO, tag.as_slice()];
    let okm = prk
        .expand(&info, SecretKeyType)
        .map_err(|_| FuzzyError::KeyDerivation("HKDF expand failed".into()))?;

    let mut key_bytes = [0u8; SECRET_LEN];
    okm.fill(&mut key_bytes)
        .map_err(|_| FuzzyError::KeyDerivation("HKDF fill failed".into()))?;
    Ok(Secret::from_bytes(&mut key_bytes))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
