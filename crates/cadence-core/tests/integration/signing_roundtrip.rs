//! Signing identities rebuilt from reproduced secrets.

use cadence_core::calibration::perturb;
use cadence_core::{signer, Code, FuzzyError, FuzzyExtractor, SchemeParams, SigningIdentity};
use rand::rngs::OsRng;

fn enrollment_code() -> Code {
    Code::from_symbols((0u8..32).map(|i| (i % 16 * 9 + 4) % 16).collect())
}

#[test]
fn reproduced_secret_yields_same_public_key() {
    let fe = FuzzyExtractor::new(SchemeParams::default()).expect("extractor");
    let code = enrollment_code();
    let (secret, helper) = fe.generate(&code, &mut OsRng).expect("generate");
    let enrolled_key = SigningIdentity::from_secret(&secret)
        .expect("identity")
        .public_key();
    drop(secret);

    let noisy = perturb(&code, 7, 16, &mut OsRng);
    let reproduced = fe.reproduce(&noisy, &helper).expect("reproduce");
    let identity = SigningIdentity::from_secret(&reproduced).expect("identity");
    assert_eq!(identity.public_key(), enrolled_key);

    let event = b"{\"v\":\"KERI10JSON\",\"t\":\"icp\",\"s\":\"0\"}";
    let sig = identity.sign(event).expect("sign");
    signer::verify(&enrolled_key, event, &sig).expect("signature verifies");
}

#[test]
fn separate_enrollments_sign_as_different_identities() {
    let fe = FuzzyExtractor::new(SchemeParams::default()).expect("extractor");
    let code = enrollment_code();
    let (a, _) = fe.generate(&code, &mut OsRng).expect("generate");
    let (b, _) = fe.generate(&code, &mut OsRng).expect("generate");

    let a = SigningIdentity::from_secret(&a).expect("identity");
    let b = SigningIdentity::from_secret(&b).expect("identity");
    assert_ne!(a.public_key(), b.public_key());

    let sig = a.sign(b"message").expect("sign");
    assert!(matches!(
        signer::verify(&b.public_key(), b"message", &sig),
        Err(FuzzyError::Signature(_))
    ));
}
