//! Timing quantizer: raw measurement vector → fixed-length [`Code`].
//!
//! ```text
//! x ──► (x - median) / (std + ε) ──► clip [-c, c] ──► levels 0..2^k-1 ──► pad/truncate to L
//! ```
//!
//! Normalizing by the vector's own median and spread makes the code track
//! the *shape* of a typing rhythm rather than its absolute speed. The clip
//! range `c` and width `k` set how much jitter one symbol absorbs: a wider
//! `c` or a smaller `k` maps more human variance onto the same level and
//! keeps fewer bits of entropy per symbol.

use crate::code::Code;
use crate::params::QuantizerParams;

/// Quantize `raw` into a code of exactly `out_len` symbols.
///
/// Never fails. An empty capture (or one with no finite samples) yields the
/// all-zero code, which will not reproduce any real enrollment. Non-finite
/// samples are placed on the centre level. Extra symbols are truncated and
/// missing ones are zero-filled.
///
/// `params` is expected to have passed [`QuantizerParams::validate`].
#[must_use]
pub fn quantize(raw: &[f64], params: &QuantizerParams, out_len: usize) -> Code {
    let mut finite: Vec<f64> = raw.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.is_empty() {
        tracing::debug!(
            samples = raw.len(),
            "empty capture; emitting all-zero code"
        );
        return Code::zeroed(out_len);
    }

    let mut scale = 1.0;
    let mut centre = median(&mut finite);
    let mut deviation = std_dev(&finite);
    if !(centre.is_finite() && deviation.is_finite()) {
        // Magnitudes near f64::MAX overflow the moments; redo them on unit scale.
        scale = finite.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
        for x in &mut finite {
            *x /= scale;
        }
        centre = median(&mut finite);
        deviation = std_dev(&finite);
    }
    let spread = deviation + params.epsilon / scale;
    let clip = params.clip;
    let max_level = f64::from(params.max_level());

    let mut symbols: Vec<u8> = raw
        .iter()
        .take(out_len)
        .map(|&x| x / scale)
        .map(|x| {
            let z = if x.is_finite() {
                ((x - centre) / spread).clamp(-clip, clip)
            } else {
                0.0
            };
            to_level((z + clip) / (2.0 * clip) * max_level)
        })
        .collect();
    symbols.resize(out_len, 0);
    Code::from_symbols(symbols)
}

/// Floor a non-negative level into a symbol. NaN maps to zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_level(scaled: f64) -> u8 {
    scaled as u8
}

/// Median of a non-empty slice (mean of the middle pair for even lengths).
/// Sorts `values` in place.
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        let lower = mid.checked_sub(1).map_or(values[mid], |i| values[i]);
        (lower + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Population standard deviation.
#[allow(clippy::cast_precision_loss)]
fn std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    var.sqrt()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
