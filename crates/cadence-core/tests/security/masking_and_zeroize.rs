//! Key material and biometric templates stay out of logs and memory.

use cadence_core::{
    Code, Enrollment, FuzzyConfig, FuzzyError, FuzzyExtractor, SchemeParams, Secret,
    SigningIdentity,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn enrolled() -> (Code, Secret, cadence_core::HelperData) {
    let fe = FuzzyExtractor::new(SchemeParams::default()).expect("extractor");
    let code = Code::from_symbols((0u8..32).map(|i| (i % 16 * 13 + 5) % 16).collect());
    let (secret, helper) = fe
        .generate(&code, &mut ChaCha20Rng::seed_from_u64(61))
        .expect("generate");
    (code, secret, helper)
}

#[test]
fn secret_and_code_types_need_drop() {
    assert!(std::mem::needs_drop::<Secret>());
    assert!(std::mem::needs_drop::<Code>());
    assert!(std::mem::needs_drop::<SigningIdentity>());
}

#[test]
fn debug_output_never_contains_material() {
    let (code, secret, _helper) = enrolled();
    assert_eq!(format!("{secret:?}"), "Secret(***)");
    assert_eq!(format!("{secret}"), "Secret(***)");
    assert_eq!(format!("{code:?}"), "Code(len=32)");

    let identity = SigningIdentity::from_secret(&secret).expect("identity");
    assert_eq!(format!("{identity:?}"), "SigningIdentity(***)");
}

#[test]
fn errors_carry_no_material() {
    let (code, _secret, helper) = enrolled();
    let fe = FuzzyExtractor::new(SchemeParams::default()).expect("extractor");
    let far = Code::from_symbols(code.symbols().iter().map(|s| (s + 8) % 16).collect());
    let err = fe.reproduce(&far, &helper).expect_err("far code must fail");
    assert!(matches!(err, FuzzyError::DecodeFailure));
    assert_eq!(
        err.to_string(),
        "decode failure: input is outside the error budget"
    );
}

#[test]
fn stored_enrollment_holds_no_secret_bytes() {
    let raw: Vec<f64> = (0..32).map(|i| 60.0 + f64::from(i * 29 % 31) * 7.0).collect();
    let (secret, enrollment) = Enrollment::enroll(
        &raw,
        FuzzyConfig::default(),
        &mut ChaCha20Rng::seed_from_u64(62),
    )
    .expect("enroll");

    let bytes = enrollment.helper().to_bytes().expect("encode");
    let key = secret.expose();
    assert!(!bytes.windows(8).any(|w| w == &key[..8]));

    let json = serde_json::to_string(&enrollment).expect("serialize");
    assert!(!json.contains("secret"));
    assert!(!json.contains("codeword"));
}
