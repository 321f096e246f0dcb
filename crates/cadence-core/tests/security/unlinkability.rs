//! Independent enrollments of the same code are statistically unrelated.
//!
//! Each test repeats `generate` on one fixed code and compares pairs of
//! outputs. Thresholds sit at least five standard deviations from the
//! expected value, so a healthy extractor does not trip them.

use cadence_core::{Code, FuzzyExtractor, SchemeParams};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const PAIRS: usize = 256;

fn setup() -> (FuzzyExtractor, Code) {
    let fe = FuzzyExtractor::new(SchemeParams::default()).expect("extractor");
    let code = Code::from_symbols((0u8..32).map(|i| (i * 7 + 1) % 16).collect());
    (fe, code)
}

/// Fraction of equal bits between secret pairs: expected 0.5.
#[test]
#[allow(clippy::cast_precision_loss)]
fn secret_pairs_agree_on_half_their_bits() {
    let (fe, code) = setup();
    let mut rng = ChaCha20Rng::seed_from_u64(81);

    let mut agree = 0u32;
    for _ in 0..PAIRS {
        let (a, _) = fe.generate(&code, &mut rng).expect("generate");
        let (b, _) = fe.generate(&code, &mut rng).expect("generate");
        agree += a
            .expose()
            .iter()
            .zip(b.expose())
            .map(|(x, y)| (!(x ^ y)).count_ones())
            .sum::<u32>();
    }
    // 65 536 bits, sigma ~ 0.002
    let rate = f64::from(agree) / (PAIRS * 256) as f64;
    assert!((0.49..0.51).contains(&rate), "bit agreement {rate}");
}

/// Fraction of equal helper symbols between pairs: expected 1/37.
#[test]
#[allow(clippy::cast_precision_loss)]
fn helper_pairs_agree_only_by_chance() {
    let (fe, code) = setup();
    let mut rng = ChaCha20Rng::seed_from_u64(82);

    let mut agree = 0usize;
    for _ in 0..PAIRS {
        let (_, a) = fe.generate(&code, &mut rng).expect("generate");
        let (_, b) = fe.generate(&code, &mut rng).expect("generate");
        agree += a
            .offsets()
            .iter()
            .zip(b.offsets())
            .filter(|(x, y)| x == y)
            .count();
    }
    // 8192 symbols, expected ~0.027, sigma ~ 0.0018
    let rate = agree as f64 / (PAIRS * 32) as f64;
    assert!((0.015..0.040).contains(&rate), "symbol agreement {rate}");
}

/// Helper symbols are spread evenly over GF(37) whatever the code.
#[test]
fn helper_symbols_cover_field_evenly() {
    let (fe, code) = setup();
    let mut rng = ChaCha20Rng::seed_from_u64(83);

    let mut histogram = [0usize; 37];
    for _ in 0..2000 {
        let (_, helper) = fe.generate(&code, &mut rng).expect("generate");
        for &o in helper.offsets() {
            histogram[usize::from(o)] += 1;
        }
    }
    // 64 000 symbols, ~1730 per bucket, sigma ~ 41
    let min = histogram.iter().min().copied().unwrap_or_default();
    let max = histogram.iter().max().copied().unwrap_or_default();
    assert!(min > 1500 && max < 1960, "histogram range {min}..{max}");
}
