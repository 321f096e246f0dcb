//! Verify that extracted secrets are really locked while they report so.

use cadence_core::{Code, FuzzyExtractor, SchemeParams};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[cfg(target_os = "linux")]
#[test]
fn locked_secret_shows_up_in_vmlck() {
    let fe = FuzzyExtractor::new(SchemeParams::default()).expect("extractor");
    let code = Code::zeroed(32);
    let (secret, _helper) = fe
        .generate(&code, &mut ChaCha20Rng::seed_from_u64(71))
        .expect("generate");

    if secret.is_mlocked() {
        let vmlck = read_vmlck_kb();
        assert!(vmlck > 0, "secret reports mlocked but VmLck is {vmlck}KB");
    } else {
        eprintln!("mlock failed (likely insufficient quota), skipping VmLck check");
    }
}

#[cfg(target_os = "linux")]
#[test]
fn dropping_a_neighbour_keeps_the_page_locked() {
    let fe = FuzzyExtractor::new(SchemeParams::default()).expect("extractor");
    let mut rng = ChaCha20Rng::seed_from_u64(73);
    let code = Code::zeroed(32);
    let (a, _) = fe.generate(&code, &mut rng).expect("generate");
    let (b, _) = fe.generate(&code, &mut rng).expect("generate");

    if !(a.is_mlocked() && b.is_mlocked()) {
        eprintln!("mlock failed (likely insufficient quota), skipping VmLck check");
        return;
    }
    drop(a);
    assert!(b.is_mlocked());
    let vmlck = read_vmlck_kb();
    assert!(vmlck > 0, "surviving secret reports mlocked but VmLck is {vmlck}KB");
}

#[cfg(target_os = "linux")]
#[test]
fn many_live_secrets_do_not_fail_extraction() {
    let fe = FuzzyExtractor::new(SchemeParams::default()).expect("extractor");
    let mut rng = ChaCha20Rng::seed_from_u64(72);
    let code = Code::zeroed(32);

    // Exhausting the lock quota degrades to unlocked memory, never to an error.
    let secrets: Vec<_> = (0..256)
        .map(|_| fe.generate(&code, &mut rng).expect("generate").0)
        .collect();
    let locked = secrets.iter().filter(|s| s.is_mlocked()).count();
    if locked > 0 {
        assert!(read_vmlck_kb() > 0, "{locked} secrets report mlocked with no VmLck");
    }
}

#[cfg(target_os = "linux")]
fn read_vmlck_kb() -> u64 {
    let status =
        std::fs::read_to_string("/proc/self/status").expect("failed to read /proc/self/status");
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmLck:") {
            let trimmed = rest.trim().trim_end_matches(" kB").trim();
            return trimmed.parse().unwrap_or(0);
        }
    }
    0
}
