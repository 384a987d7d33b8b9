//! The logistic map, `x <- r*x*(1-x)`.

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default anti-fixed-point nudge.
pub const DEFAULT_EPSILON: f64 = 1e-14;

/// Lower bound of the chaotic parameter window for `r`.
pub const R_CHAOTIC_MIN: f64 = 3.57;

/// Upper bound for `r`.
pub const R_MAX: f64 = 4.0;

// =============================================================================
// GENERATOR
// =============================================================================

/// Generate `length` logistic iterates after `burn_in` discarded ones.
///
/// The map is chaotic for `x0` in `(0, 1)` and `r` in `(3.57, 4.0]`;
/// outside those ranges the stream is well-defined but degenerate, and
/// callers are expected to validate first (the master-key layer does).
///
/// Exact fixed points are nudged: an iterate that lands precisely on `0.5`
/// or `0.75` gets `epsilon` added, and the absorbing states `0.0` and `1.0`
/// are pulled back inside the open interval. At `r = 4` the orbit of
/// exactly `0.5` passes through `1.0` and would otherwise collapse to the
/// all-zero stream.
pub fn keystream(length: usize, x0: f64, r: f64, burn_in: u32, epsilon: f64) -> Vec<f64> {
    let mut x = nudge(x0, epsilon);
    for _ in 0..burn_in {
        x = r * x * (1.0 - x);
        x = nudge(x, epsilon);
    }

    let mut out = Vec::with_capacity(length);
    for _ in 0..length {
        x = r * x * (1.0 - x);
        x = nudge(x, epsilon);
        out.push(x);
    }
    out
}

/// Keep the state off the exact values whose orbit degenerates.
#[inline]
fn nudge(x: f64, epsilon: f64) -> f64 {
    if x == 0.5 || x == 0.75 {
        x + epsilon
    } else if x <= 0.0 {
        epsilon
    } else if x >= 1.0 {
        1.0 - epsilon
    } else {
        x
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_restart() {
        let a = keystream(64, 0.678, 4.0, 200, DEFAULT_EPSILON);
        let b = keystream(64, 0.678, 4.0, 200, DEFAULT_EPSILON);
        assert_eq!(a, b);
    }

    #[test]
    fn burn_in_shifts_the_sequence() {
        let long = keystream(40, 0.678, 4.0, 0, DEFAULT_EPSILON);
        let shifted = keystream(30, 0.678, 4.0, 10, DEFAULT_EPSILON);
        assert_eq!(&long[10..], &shifted[..]);
    }

    #[test]
    fn stays_in_open_unit_interval() {
        for x in keystream(10_000, 0.391, 3.99, 100, DEFAULT_EPSILON) {
            assert!(x > 0.0 && x < 1.0, "iterate escaped: {x}");
        }
    }

    #[test]
    fn half_seed_does_not_collapse() {
        // x0 = 0.5 at r = 4 maps through 1.0 to the absorbing zero; the
        // nudge must keep the stream alive and non-degenerate.
        let ks = keystream(256, 0.5, 4.0, 200, DEFAULT_EPSILON);
        assert!(ks.iter().all(|&x| x > 0.0 && x < 1.0));
        let distinct = ks.windows(2).filter(|w| w[0] != w[1]).count();
        assert!(distinct > 200, "stream settled into a short cycle");
    }
}
