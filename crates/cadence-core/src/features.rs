//! Keystroke timing features: press/release timestamps → raw measurement vector.
//!
//! Timestamps are seconds from a monotonic clock, one press and one release
//! per key of the typed phrase. Every interval is snapped to a 50 ms bucket
//! before use so that small jitter lands on the same value.
//!
//! ```text
//!  press  ─┐        ┌─────────── dd ───────────┐
//!          ▼        ▼                          ▼
//!  key i   [──hold──]          key i+1   [──hold──]
//!                   └─── ud (flight) ──┘
//! ```

use serde::{Deserialize, Serialize};

/// Bucket width for interval rounding, in buckets per second (50 ms).
const BUCKETS_PER_SECOND: f64 = 20.0;

/// Milliseconds per second.
const MS_PER_SECOND: f64 = 1000.0;

/// Which measurements to emit from a capture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureSet {
    /// Six aggregate values: `[dd_mean, dd_std, hold_mean, hold_std, total_ms, intervals]`.
    ///
    /// Stable across attempts but too short to enroll under a 32-symbol
    /// scheme: the zero padding leaves fewer than `t` informative symbols.
    Summary,
    /// The summary followed by every press-to-press interval, every
    /// release-to-press flight and every hold. A phrase of `n` keys yields
    /// `3n + 4` values.
    #[default]
    Detailed,
}

/// Press and release timestamps of one typed phrase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeystrokeTiming {
    presses: Vec<f64>,
    releases: Vec<f64>,
}

impl KeystrokeTiming {
    /// Wrap captured timestamps. `presses[i]` and `releases[i]` belong to key `i`.
    #[must_use]
    pub const fn new(presses: Vec<f64>, releases: Vec<f64>) -> Self {
        Self { presses, releases }
    }

    /// Number of keys if the capture is complete, `None` otherwise.
    ///
    /// Complete means equal press/release counts, at least two keys and only
    /// finite timestamps.
    #[must_use]
    pub fn key_count(&self) -> Option<usize> {
        let n = self.presses.len();
        let complete = n == self.releases.len()
            && n >= 2
            && self
                .presses
                .iter()
                .chain(&self.releases)
                .all(|t| t.is_finite());
        complete.then_some(n)
    }

    /// Compute the raw measurement vector in milliseconds.
    ///
    /// An incomplete capture yields an empty vector, which the quantizer
    /// turns into the all-zero code.
    #[must_use]
    pub fn features(&self, set: FeatureSet) -> Vec<f64> {
        let Some(keys) = self.key_count() else {
            tracing::debug!(
                presses = self.presses.len(),
                releases = self.releases.len(),
                "incomplete keystroke capture"
            );
            return Vec::new();
        };

        let next_presses = self.presses.iter().skip(1);
        let dd: Vec<f64> = self
            .presses
            .iter()
            .zip(next_presses.clone())
            .map(|(a, b)| bucket_ms(b - a))
            .collect();
        let ud: Vec<f64> = self
            .releases
            .iter()
            .zip(next_presses)
            .map(|(up, down)| bucket_ms(down - up))
            .collect();
        let hold: Vec<f64> = self
            .presses
            .iter()
            .zip(&self.releases)
            .map(|(down, up)| bucket_ms(up - down))
            .collect();

        let first_press = self.presses.first().copied().unwrap_or_default();
        let last_release = self.releases.last().copied().unwrap_or_default();
        let (dd_mean, dd_std) = mean_std(&dd);
        let (hold_mean, hold_std) = mean_std(&hold);

        let mut out = vec![
            dd_mean,
            dd_std,
            hold_mean,
            hold_std,
            (last_release - first_press) * MS_PER_SECOND,
            count_as_f64(dd.len()),
        ];
        if set == FeatureSet::Detailed {
            out.reserve(keys.saturating_mul(3));
            out.extend(dd);
            out.extend(ud);
            out.extend(hold);
        }
        out
    }
}

/// Snap a duration in seconds to its 50 ms bucket, expressed in ms.
/// Halfway values round to the even bucket.
fn bucket_ms(seconds: f64) -> f64 {
    (seconds * BUCKETS_PER_SECOND).round_ties_even() / BUCKETS_PER_SECOND * MS_PER_SECOND
}

/// Mean and population standard deviation of a non-empty slice.
fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = count_as_f64(values.len());
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

#[allow(clippy::cast_precision_loss)]
const fn count_as_f64(n: usize) -> f64 {
    n as f64
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
