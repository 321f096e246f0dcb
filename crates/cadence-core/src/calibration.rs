//! Empirical rejection-rate characterization.
//!
//! [`SchemeParams::tradeoff`](crate::params::SchemeParams::tradeoff) gives the
//! analytic picture. This module measures it: enroll a code, perturb it at a
//! chosen Hamming distance, and count how reproduction ends. Deployments use
//! the result to pick `(alphabet, L, t)` against observed typing noise.

use rand::seq::index;
use rand::{CryptoRng, Rng, RngCore};

use crate::code::Code;
use crate::error::FuzzyError;
use crate::extractor::FuzzyExtractor;

/// Outcome counts for one perturbation distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RejectionSample {
    /// Symbols changed relative to the enrollment code.
    pub distance: usize,
    /// Reproduction attempts made.
    pub trials: usize,
    /// Attempts that ended in [`FuzzyError::DecodeFailure`].
    pub failures: usize,
    /// Attempts that decoded to a different secret.
    pub miscorrections: usize,
}

impl RejectionSample {
    /// Attempts that recovered the enrolled secret.
    #[must_use]
    pub const fn accepted(&self) -> usize {
        self.trials
            .saturating_sub(self.failures)
            .saturating_sub(self.miscorrections)
    }

    /// Fraction of attempts rejected with a decode failure.
    #[must_use]
    pub fn failure_rate(&self) -> f64 {
        ratio(self.failures, self.trials)
    }

    /// Fraction of attempts that returned a wrong secret.
    #[must_use]
    pub fn miscorrection_rate(&self) -> f64 {
        ratio(self.miscorrections, self.trials)
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Change exactly `distance` symbols of `code` to other symbols of the
/// alphabet `0..alphabet`. Positions are distinct and uniformly chosen.
///
/// `distance` is capped at the code length. An alphabet of fewer than two
/// symbols leaves the code unchanged.
#[must_use]
pub fn perturb<R: Rng + ?Sized>(code: &Code, distance: usize, alphabet: u32, rng: &mut R) -> Code {
    let mut symbols = code.symbols().to_vec();
    if alphabet < 2 {
        return Code::from_symbols(symbols);
    }
    let amount = distance.min(symbols.len());
    let positions = index::sample(rng, symbols.len(), amount);
    for pos in positions.into_iter() {
        let Some(slot) = symbols.get_mut(pos) else {
            continue;
        };
        // Draw from the alphabet minus the current symbol.
        let draw = rng.gen_range(0..alphabet.saturating_sub(1));
        let replacement = if draw >= u32::from(*slot) {
            draw.saturating_add(1)
        } else {
            draw
        };
        *slot = u8::try_from(replacement).unwrap_or(*slot);
    }
    Code::from_symbols(symbols)
}

/// Measure reproduction outcomes of `code` at each of `distances`.
///
/// Every trial enrolls `code` afresh, perturbs it and reproduces, so the
/// counts cover both codeword and perturbation randomness.
///
/// # Errors
///
/// Returns any error from [`FuzzyExtractor::generate`] or a non-decode
/// error from [`FuzzyExtractor::reproduce`] (for example a code that does
/// not fit the scheme).
pub fn characterize_rejection<R: RngCore + CryptoRng>(
    extractor: &FuzzyExtractor,
    code: &Code,
    distances: &[usize],
    trials: usize,
    rng: &mut R,
) -> Result<Vec<RejectionSample>, FuzzyError> {
    let alphabet = extractor.scheme().alphabet_size();
    let mut samples = Vec::with_capacity(distances.len());

    for &distance in distances {
        let mut sample = RejectionSample {
            distance,
            trials,
            ..RejectionSample::default()
        };
        for _ in 0..trials {
            let (secret, helper) = extractor.generate(code, rng)?;
            let noisy = perturb(code, distance, alphabet, rng);
            match extractor.reproduce(&noisy, &helper) {
                Ok(recovered) if recovered == secret => {}
                Ok(_) => sample.miscorrections = sample.miscorrections.saturating_add(1),
                Err(FuzzyError::DecodeFailure) => {
                    sample.failures = sample.failures.saturating_add(1);
                }
                Err(e) => return Err(e),
            }
        }
        tracing::debug!(
            distance,
            trials,
            failures = sample.failures,
            miscorrections = sample.miscorrections,
            "rejection sample"
        );
        samples.push(sample);
    }
    Ok(samples)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
