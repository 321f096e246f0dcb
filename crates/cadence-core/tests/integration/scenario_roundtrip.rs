//! The balanced scheme (L = 32, 16 levels, t = 10) at its boundaries.

use cadence_core::calibration::{characterize_rejection, perturb};
use cadence_core::{Code, FuzzyError, FuzzyExtractor, Profile, SchemeParams};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn enrollment_code() -> Code {
    Code::from_symbols(vec![
        3, 14, 7, 7, 0, 9, 12, 5, 1, 15, 8, 2, 6, 11, 4, 13, 10, 7, 3, 0, 15, 5, 9, 12, 2, 6, 8,
        14, 1, 11, 4, 10,
    ])
}

/// Change the first `count` symbols to their successor mod 16.
fn flip_leading(code: &Code, count: usize) -> Code {
    let mut symbols = code.symbols().to_vec();
    for s in symbols.iter_mut().take(count) {
        *s = (*s + 1) % 16;
    }
    Code::from_symbols(symbols)
}

#[test]
fn exact_five_and_twenty_symbol_errors() {
    let fe = FuzzyExtractor::new(SchemeParams::default()).expect("extractor");
    let mut rng = ChaCha20Rng::seed_from_u64(0x00C0_FFEE);
    let code = enrollment_code();
    let (secret, helper) = fe.generate(&code, &mut rng).expect("generate");

    assert_eq!(fe.reproduce(&code, &helper).expect("exact"), secret);

    let five = flip_leading(&code, 5);
    assert_eq!(code.distance(&five), 5);
    assert_eq!(fe.reproduce(&five, &helper).expect("five errors"), secret);

    let twenty = flip_leading(&code, 20);
    assert_eq!(code.distance(&twenty), 20);
    assert!(matches!(
        fe.reproduce(&twenty, &helper),
        Err(FuzzyError::DecodeFailure)
    ));
}

#[test]
fn exactly_at_budget_still_reproduces() {
    let fe = FuzzyExtractor::new(SchemeParams::default()).expect("extractor");
    let mut rng = ChaCha20Rng::seed_from_u64(31);
    let code = enrollment_code();
    let (secret, helper) = fe.generate(&code, &mut rng).expect("generate");

    for _ in 0..16 {
        let noisy = perturb(&code, 10, 16, &mut rng);
        assert_eq!(fe.reproduce(&noisy, &helper).expect("t errors"), secret);
    }
}

#[test]
fn acceptance_never_rises_with_distance() {
    let fe = FuzzyExtractor::new(SchemeParams::default()).expect("extractor");
    let mut rng = ChaCha20Rng::seed_from_u64(32);
    let distances = [0, 2, 4, 6, 8, 10, 11, 12, 14, 16, 20, 24, 32];
    let samples =
        characterize_rejection(&fe, &enrollment_code(), &distances, 10, &mut rng).expect("run");

    for pair in samples.windows(2) {
        assert!(
            pair[1].accepted() <= pair[0].accepted(),
            "acceptance rose from d={} to d={}",
            pair[0].distance,
            pair[1].distance
        );
    }
    assert_eq!(samples[5].accepted(), 10, "t = 10 must always reproduce");
    assert_eq!(samples[6].accepted(), 0, "t + 1 must never reproduce");
}

#[test]
fn every_profile_tolerates_its_budget() {
    for profile in [Profile::Tolerant, Profile::Balanced, Profile::Strict] {
        let scheme = profile.scheme();
        let fe = FuzzyExtractor::new(scheme.clone()).expect("extractor");
        let mut rng = ChaCha20Rng::seed_from_u64(33);
        let alphabet = scheme.alphabet_size();
        let code = Code::from_symbols(
            (0..scheme.code_len)
                .map(|i| u8::try_from(i as u32 * 7 % alphabet).unwrap())
                .collect(),
        );
        let (secret, helper) = fe.generate(&code, &mut rng).expect("generate");

        let inside = perturb(&code, scheme.error_budget, alphabet, &mut rng);
        assert_eq!(
            fe.reproduce(&inside, &helper).expect("inside budget"),
            secret,
            "{profile:?}"
        );

        let outside = perturb(&code, scheme.error_budget + 1, alphabet, &mut rng);
        assert!(
            fe.reproduce(&outside, &helper)
                .map_or(true, |other| other != secret),
            "{profile:?}"
        );
    }
}

#[test]
fn concurrent_reproduction_shares_one_extractor() {
    let fe = FuzzyExtractor::new(SchemeParams::default()).expect("extractor");
    let mut rng = ChaCha20Rng::seed_from_u64(34);

    let enrollments: Vec<_> = (0u8..8)
        .map(|user| {
            let code = Code::from_symbols((0u8..32).map(|i| (i * 3 + user) % 16).collect());
            let (secret, helper) = fe.generate(&code, &mut rng).expect("generate");
            (code, *secret.expose(), helper)
        })
        .collect();

    std::thread::scope(|scope| {
        for (code, expected, helper) in &enrollments {
            let fe = &fe;
            scope.spawn(move || {
                for _ in 0..4 {
                    let secret = fe.reproduce(code, helper).expect("reproduce");
                    assert_eq!(secret.expose(), expected);
                }
            });
        }
    });
}
