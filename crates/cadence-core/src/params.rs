//! Tunable configuration surface for quantization and sketching.
//!
//! This module provides:
//! - [`SchemeParams`]: code length `L`, bits per symbol, error budget `t`
//! - [`QuantizerParams`]: bits per symbol, clip range, stabilizing epsilon
//! - [`FuzzyConfig`]: both of the above, validated together
//! - [`Profile`]: Tolerant / Balanced / Strict presets
//! - [`Tradeoff`]: what a parameter triple costs in entropy and buys in tolerance
//!
//! # Calibration
//!
//! The `(alphabet, L, t)` triple is not derived from first principles. It
//! must be calibrated against the measured timing variance of real users:
//! coarser symbols and a larger `t` lower the false-reject rate and cost
//! secret strength. [`SchemeParams::tradeoff`] makes that cost explicit.

use serde::{Deserialize, Serialize};

use crate::error::FuzzyError;
use crate::field;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest supported code length. Keeps the field modulus below 256 so
/// every helper symbol fits in one byte.
pub const MAX_CODE_LEN: usize = 251;

/// Smallest supported bits per symbol (2 levels).
pub const MIN_SYMBOL_BITS: u8 = 1;

/// Largest supported bits per symbol (128 levels).
pub const MAX_SYMBOL_BITS: u8 = 7;

/// Default clip range in standard deviations.
pub const DEFAULT_CLIP: f64 = 1.5;

/// Default epsilon added to the standard deviation.
pub const DEFAULT_EPSILON: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Scheme parameters
// ---------------------------------------------------------------------------

/// Shape of a code and the error budget the sketch tolerates.
///
/// Stored inside every [`HelperData`](crate::helper::HelperData) so that a
/// helper can never be reproduced under a different scheme.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemeParams {
    /// Number of symbols per code (`L`).
    pub code_len: usize,
    /// Bits per code symbol; the alphabet has `2^symbol_bits` levels.
    pub symbol_bits: u8,
    /// Maximum symbol-wise Hamming distance that still reproduces (`t`).
    pub error_budget: usize,
}

impl SchemeParams {
    /// Validate the parameter triple.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InvalidParameters`] if the code length is zero or
    /// above [`MAX_CODE_LEN`], the symbol width is outside
    /// `MIN_SYMBOL_BITS..=MAX_SYMBOL_BITS`, or `2t >= L` (no message symbol
    /// would remain).
    pub fn validate(&self) -> Result<(), FuzzyError> {
        if self.code_len == 0 || self.code_len > MAX_CODE_LEN {
            return Err(FuzzyError::InvalidParameters(format!(
                "code length {} outside 1..={MAX_CODE_LEN}",
                self.code_len
            )));
        }
        if !(MIN_SYMBOL_BITS..=MAX_SYMBOL_BITS).contains(&self.symbol_bits) {
            return Err(FuzzyError::InvalidParameters(format!(
                "symbol width {} bits outside {MIN_SYMBOL_BITS}..={MAX_SYMBOL_BITS}",
                self.symbol_bits
            )));
        }
        let redundancy = self
            .error_budget
            .checked_mul(2)
            .ok_or_else(|| FuzzyError::InvalidParameters("error budget overflow".into()))?;
        if redundancy >= self.code_len {
            return Err(FuzzyError::InvalidParameters(format!(
                "error budget {} too large for code length {} (need 2t < L)",
                self.error_budget, self.code_len
            )));
        }
        Ok(())
    }

    /// Number of quantization levels (`2^symbol_bits`).
    #[must_use]
    pub fn alphabet_size(&self) -> u32 {
        1u32.checked_shl(u32::from(self.symbol_bits)).unwrap_or(0)
    }

    /// Prime modulus of the sketch field: the smallest prime that is at
    /// least the code length and at least the alphabet size.
    #[must_use]
    pub fn field_modulus(&self) -> u32 {
        let floor = u32::try_from(self.code_len)
            .unwrap_or(u32::MAX)
            .max(self.alphabet_size())
            .max(2);
        field::smallest_prime_at_least(floor)
    }

    /// Number of message symbols carried by each codeword (`K = L - 2t`).
    #[must_use]
    pub const fn message_len(&self) -> usize {
        self.code_len.saturating_sub(self.error_budget.saturating_mul(2))
    }

    /// Compact tag binding derived secrets to this scheme.
    pub(crate) fn tag(&self) -> [u8; 3] {
        [
            self.symbol_bits,
            u8::try_from(self.code_len).unwrap_or(u8::MAX),
            u8::try_from(self.error_budget).unwrap_or(u8::MAX),
        ]
    }

    /// Report the entropy/tolerance tradeoff of this parameter triple.
    ///
    /// All figures are upper or worst-case bounds under a uniform-code model;
    /// real keystroke codes carry far less entropy than `L * symbol_bits`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tradeoff(&self) -> Tradeoff {
        let p = f64::from(self.field_modulus());
        let n = self.code_len as f64;
        let k = self.message_len() as f64;
        let code_entropy_bits = n * f64::from(self.symbol_bits);
        let helper_leakage_bits = (n - k) * p.log2();
        Tradeoff {
            code_entropy_bits,
            helper_leakage_bits,
            residual_entropy_bits: (code_entropy_bits - helper_leakage_bits).max(0.0),
            miscorrection_bound: miscorrection_bound(
                self.code_len,
                self.message_len(),
                self.error_budget,
                p,
            ),
        }
    }
}

impl Default for SchemeParams {
    fn default() -> Self {
        Profile::Balanced.scheme()
    }
}

/// Probability that a uniformly random received word lands inside the
/// decoding radius of *some* codeword: `p^(K-L) * V_p(L, t)`.
#[allow(clippy::cast_precision_loss)]
fn miscorrection_bound(n: usize, k: usize, t: usize, p: f64) -> f64 {
    let ln_q1 = (p - 1.0).ln();
    let mut ln_binom = 0.0_f64;
    let mut ln_volume = f64::NEG_INFINITY;
    for i in 0..=t.min(n) {
        if i > 0 {
            let i_f = i as f64;
            ln_binom += ((n as f64) - i_f + 1.0).ln() - i_f.ln();
        }
        let term = (i as f64).mul_add(ln_q1, ln_binom);
        ln_volume = log_add_exp(ln_volume, term);
    }
    let exponent = (k as f64 - n as f64).mul_add(p.ln(), ln_volume);
    exponent.exp().min(1.0)
}

fn log_add_exp(a: f64, b: f64) -> f64 {
    if a.is_infinite() && a.is_sign_negative() {
        return b;
    }
    let hi = a.max(b);
    let lo = a.min(b);
    hi + (lo - hi).exp().ln_1p()
}

/// Entropy and tolerance figures for one [`SchemeParams`] triple.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Tradeoff {
    /// Upper bound on code entropy, `L * symbol_bits`.
    pub code_entropy_bits: f64,
    /// Worst-case entropy the helper data reveals, `(L - K) * log2(p)`.
    pub helper_leakage_bits: f64,
    /// `code_entropy_bits - helper_leakage_bits`, floored at zero.
    pub residual_entropy_bits: f64,
    /// Chance that a far-away input decodes to a wrong codeword.
    pub miscorrection_bound: f64,
}

// ---------------------------------------------------------------------------
// Quantizer parameters
// ---------------------------------------------------------------------------

/// Resolution of the timing quantizer.
///
/// Wider clip ranges and fewer bits absorb more human jitter per symbol
/// at the cost of entropy retained per symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuantizerParams {
    /// Bits per output symbol.
    pub symbol_bits: u8,
    /// Symmetric clip range `[-clip, clip]` applied to normalized samples.
    pub clip: f64,
    /// Added to the standard deviation so identical samples do not divide by zero.
    pub epsilon: f64,
}

impl QuantizerParams {
    /// Validate the quantizer resolution.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InvalidParameters`] for an out-of-range symbol
    /// width or a non-positive / non-finite clip or epsilon.
    pub fn validate(&self) -> Result<(), FuzzyError> {
        if !(MIN_SYMBOL_BITS..=MAX_SYMBOL_BITS).contains(&self.symbol_bits) {
            return Err(FuzzyError::InvalidParameters(format!(
                "quantizer width {} bits outside {MIN_SYMBOL_BITS}..={MAX_SYMBOL_BITS}",
                self.symbol_bits
            )));
        }
        if !(self.clip.is_finite() && self.clip > 0.0) {
            return Err(FuzzyError::InvalidParameters(format!(
                "clip range must be positive and finite, got {}",
                self.clip
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(FuzzyError::InvalidParameters(format!(
                "epsilon must be positive and finite, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }

    /// Highest level a symbol can take (`2^symbol_bits - 1`).
    #[must_use]
    pub fn max_level(&self) -> u8 {
        let bits = self.symbol_bits.min(MAX_SYMBOL_BITS);
        (1u8 << bits).saturating_sub(1)
    }
}

impl Default for QuantizerParams {
    fn default() -> Self {
        Profile::Balanced.quantizer()
    }
}

// ---------------------------------------------------------------------------
// Combined configuration
// ---------------------------------------------------------------------------

/// Complete deployment configuration: sketch scheme plus quantizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuzzyConfig {
    /// Code shape and error budget.
    pub scheme: SchemeParams,
    /// Timing quantizer resolution.
    pub quantizer: QuantizerParams,
}

impl FuzzyConfig {
    /// Validate both halves and their agreement on symbol width.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InvalidParameters`] if either half is invalid and
    /// [`FuzzyError::ConfigurationMismatch`] if the symbol widths differ.
    pub fn validate(&self) -> Result<(), FuzzyError> {
        self.scheme.validate()?;
        self.quantizer.validate()?;
        if self.scheme.symbol_bits != self.quantizer.symbol_bits {
            return Err(FuzzyError::ConfigurationMismatch(format!(
                "quantizer emits {}-bit symbols but the scheme expects {}-bit symbols",
                self.quantizer.symbol_bits, self.scheme.symbol_bits
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InvalidParameters`] for malformed JSON, plus
    /// anything [`FuzzyConfig::validate`] rejects.
    pub fn from_json(json: &str) -> Result<Self, FuzzyError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| FuzzyError::InvalidParameters(format!("invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Profile::Balanced.config()
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

/// Calibration preset.
///
/// Starting points only: every deployment should re-measure its users'
/// variance and adjust.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Profile {
    /// 8 levels, `t = 8` of 32. Coarse symbols absorb the most jitter.
    Tolerant,
    /// 16 levels, `t = 10` of 32, clip 1.5σ.
    Balanced,
    /// 32 levels, `t = 8` of 48, clip 2σ. Highest entropy, most rejects.
    Strict,
}

impl Profile {
    /// Scheme parameters of this preset.
    #[must_use]
    pub const fn scheme(self) -> SchemeParams {
        match self {
            Self::Tolerant => SchemeParams {
                code_len: 32,
                symbol_bits: 3,
                error_budget: 8,
            },
            Self::Balanced => SchemeParams {
                code_len: 32,
                symbol_bits: 4,
                error_budget: 10,
            },
            Self::Strict => SchemeParams {
                code_len: 48,
                symbol_bits: 5,
                error_budget: 8,
            },
        }
    }

    /// Quantizer parameters of this preset.
    #[must_use]
    pub const fn quantizer(self) -> QuantizerParams {
        match self {
            Self::Tolerant => QuantizerParams {
                symbol_bits: 3,
                clip: DEFAULT_CLIP,
                epsilon: DEFAULT_EPSILON,
            },
            Self::Balanced => QuantizerParams {
                symbol_bits: 4,
                clip: DEFAULT_CLIP,
                epsilon: DEFAULT_EPSILON,
            },
            Self::Strict => QuantizerParams {
                symbol_bits: 5,
                clip: 2.0,
                epsilon: DEFAULT_EPSILON,
            },
        }
    }

    /// Full configuration of this preset.
    #[must_use]
    pub const fn config(self) -> FuzzyConfig {
        FuzzyConfig {
            scheme: self.scheme(),
            quantizer: self.quantizer(),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
