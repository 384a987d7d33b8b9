//! Keystream generator properties.
//!
//! Determinism across restarts, independence between seeds and between
//! maps, and the documented degenerate-orbit handling.

#![allow(clippy::pedantic, clippy::nursery)]
#![allow(clippy::unwrap_used)]

use scramjet::chaos::{arnold, jia, logistic};
use scramjet::{significant_digits, MasterKey};

const SAMPLE: usize = 4096;

/// Fraction of positions where the parity bit of the extracted digits
/// disagrees between two streams.
fn parity_disagreement(a: &[f64], b: &[f64]) -> f64 {
    let differing = a
        .iter()
        .zip(b)
        .filter(|(x, y)| significant_digits(x.abs(), 15) & 1 != significant_digits(y.abs(), 15) & 1)
        .count();
    differing as f64 / a.len() as f64
}

// =============================================================================
// DETERMINISM
// =============================================================================

#[test]
fn all_generators_restart_identically() {
    let key = MasterKey::default();
    assert_eq!(key.logistic_keystream(SAMPLE), key.logistic_keystream(SAMPLE));
    assert_eq!(key.jia_keystream(SAMPLE), key.jia_keystream(SAMPLE));
    assert_eq!(key.arnold_keystream(SAMPLE), key.arnold_keystream(SAMPLE));
}

#[test]
fn facades_honor_exact_length() {
    let key = MasterKey::default();
    for len in [0usize, 1, 2, 3, 5, 63, 64, 1000] {
        assert_eq!(key.logistic_keystream(len).len(), len);
        assert_eq!(key.jia_keystream(len).len(), len);
        assert_eq!(key.arnold_keystream(len).len(), len);
    }
}

#[test]
fn length_requests_are_prefix_stable() {
    // Value k never depends on how many values follow; encrypt and decrypt
    // may request different lengths of the same stream.
    let key = MasterKey::default();
    let long = key.jia_keystream(101);
    let short = key.jia_keystream(40);
    assert_eq!(&long[..40], &short[..]);

    let long = key.arnold_keystream(100);
    let short = key.arnold_keystream(41);
    assert_eq!(&long[..41], &short[..]);
}

// =============================================================================
// INDEPENDENCE
// =============================================================================

#[test]
fn different_logistic_seeds_diverge() {
    let a = logistic::keystream(SAMPLE, 0.678, 4.0, 200, logistic::DEFAULT_EPSILON);
    let b = logistic::keystream(SAMPLE, 0.679, 4.0, 200, logistic::DEFAULT_EPSILON);
    let disagreement = parity_disagreement(&a, &b);
    assert!(
        disagreement > 0.4,
        "streams from nearby seeds should decorrelate, disagreement {disagreement}"
    );
}

#[test]
fn different_jia_seeds_diverge() {
    let a = jia::keystream(SAMPLE, 200, jia::DEFAULT_STEP, 0.1, 0.2, 0.3, 0.4);
    let b = jia::keystream(SAMPLE, 200, jia::DEFAULT_STEP, 0.1, 0.2, 0.3, 0.400001);
    let disagreement = parity_disagreement(&a, &b);
    assert!(disagreement > 0.4, "disagreement {disagreement}");
}

#[test]
fn different_arnold_seeds_diverge() {
    let p = arnold::ArnoldParams::default();
    let a = arnold::keystream(SAMPLE, 200, p, 100, 200, 44);
    let b = arnold::keystream(SAMPLE, 200, p, 101, 200, 44);
    let differing = a.iter().zip(&b).filter(|(x, y)| x != y).count();
    assert!(
        differing * 2 > SAMPLE,
        "orbits from distinct seeds should disagree in at least half the positions"
    );
}

#[test]
fn the_three_maps_are_mutually_independent() {
    let key = MasterKey::default();
    let logistic = key.logistic_keystream(SAMPLE);
    let jia = key.jia_keystream(SAMPLE);
    let arnold = key.arnold_keystream(SAMPLE);

    for (a, b) in [(&logistic, &jia), (&logistic, &arnold), (&jia, &arnold)] {
        let equal = a.iter().zip(b.iter()).filter(|(x, y)| x == y).count();
        assert!(equal * 2 < SAMPLE, "two maps track each other: {equal} equal positions");
    }
}

// =============================================================================
// BURN-IN
// =============================================================================

#[test]
fn burn_in_advances_every_generator() {
    let short = MasterKey { burn_in: 100, ..MasterKey::default() };
    let long = MasterKey { burn_in: 300, ..MasterKey::default() };
    assert_ne!(short.logistic_keystream(16), long.logistic_keystream(16));
    assert_ne!(short.jia_keystream(16), long.jia_keystream(16));
    assert_ne!(short.arnold_keystream(16), long.arnold_keystream(16));
}
