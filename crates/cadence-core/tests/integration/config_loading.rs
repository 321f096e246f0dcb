//! Deployment configuration loaded from JSON.

use cadence_core::{Enrollment, FuzzyConfig, FuzzyError, Profile};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const TOLERANT_JSON: &str = r#"{
    "scheme": { "code_len": 32, "symbol_bits": 3, "error_budget": 8 },
    "quantizer": { "symbol_bits": 3, "clip": 1.5, "epsilon": 1e-6 }
}"#;

#[test]
fn json_document_matches_preset() {
    let config = FuzzyConfig::from_json(TOLERANT_JSON).expect("valid config");
    assert_eq!(config, Profile::Tolerant.config());
}

#[test]
fn loaded_config_drives_enrollment() {
    let config = FuzzyConfig::from_json(TOLERANT_JSON).expect("valid config");
    let raw: Vec<f64> = (0..40).map(|i| 80.0 + f64::from(i * 37 % 23) * 9.5).collect();
    let mut rng = ChaCha20Rng::seed_from_u64(51);

    let (secret, enrollment) = Enrollment::enroll(&raw, config, &mut rng).expect("enroll");
    assert_eq!(enrollment.config().scheme.symbol_bits, 3);
    assert_eq!(enrollment.reproduce(&raw).expect("reproduce"), secret);
}

#[test]
fn mismatched_symbol_widths_are_refused() {
    let json = r#"{
        "scheme": { "code_len": 32, "symbol_bits": 4, "error_budget": 10 },
        "quantizer": { "symbol_bits": 5, "clip": 1.5, "epsilon": 1e-6 }
    }"#;
    assert!(matches!(
        FuzzyConfig::from_json(json),
        Err(FuzzyError::ConfigurationMismatch(_))
    ));
}

#[test]
fn out_of_range_values_are_refused() {
    let no_message = r#"{
        "scheme": { "code_len": 20, "symbol_bits": 4, "error_budget": 10 },
        "quantizer": { "symbol_bits": 4, "clip": 1.5, "epsilon": 1e-6 }
    }"#;
    let bad_clip = r#"{
        "scheme": { "code_len": 32, "symbol_bits": 4, "error_budget": 10 },
        "quantizer": { "symbol_bits": 4, "clip": 0.0, "epsilon": 1e-6 }
    }"#;
    for json in [no_message, bad_clip, "{ not json"] {
        assert!(matches!(
            FuzzyConfig::from_json(json),
            Err(FuzzyError::InvalidParameters(_))
        ));
    }
}
