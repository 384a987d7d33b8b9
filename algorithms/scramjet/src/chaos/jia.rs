//! The 4-D Jia continuous chaotic system, integrated with classical RK4.

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default integration step.
pub const DEFAULT_STEP: f64 = 0.001;

const A: f64 = 10.0;
const B: f64 = 8.0 / 3.0;
const C: f64 = 28.0;
const D: f64 = 1.0;
const E: f64 = 1.0;

// =============================================================================
// STATE
// =============================================================================

#[derive(Clone, Copy)]
struct State {
    x: f64,
    y: f64,
    z: f64,
    w: f64,
}

fn deriv(s: State) -> State {
    State {
        x: -A * (s.x - s.y) + s.w,
        y: -s.x * s.z + C * s.y - s.x,
        z: s.x * s.y - B * s.z,
        w: -D * s.x + E * s.y,
    }
}

/// One classical Runge-Kutta 4th-order step of size `h`.
fn rk4_step(s: State, h: f64) -> State {
    let k1 = deriv(s);
    let s2 = State {
        x: s.x + 0.5 * h * k1.x,
        y: s.y + 0.5 * h * k1.y,
        z: s.z + 0.5 * h * k1.z,
        w: s.w + 0.5 * h * k1.w,
    };
    let k2 = deriv(s2);
    let s3 = State {
        x: s.x + 0.5 * h * k2.x,
        y: s.y + 0.5 * h * k2.y,
        z: s.z + 0.5 * h * k2.z,
        w: s.w + 0.5 * h * k2.w,
    };
    let k3 = deriv(s3);
    let s4 = State {
        x: s.x + h * k3.x,
        y: s.y + h * k3.y,
        z: s.z + h * k3.z,
        w: s.w + h * k3.w,
    };
    let k4 = deriv(s4);

    State {
        x: s.x + (h / 6.0) * (k1.x + 2.0 * k2.x + 2.0 * k3.x + k4.x),
        y: s.y + (h / 6.0) * (k1.y + 2.0 * k2.y + 2.0 * k3.y + k4.y),
        z: s.z + (h / 6.0) * (k1.z + 2.0 * k2.z + 2.0 * k3.z + k4.z),
        w: s.w + (h / 6.0) * (k1.w + 2.0 * k2.w + 2.0 * k3.w + k4.w),
    }
}

// =============================================================================
// GENERATOR
// =============================================================================

/// Generate `length` values from the Jia trajectory after `burn_in`
/// discarded RK4 steps.
///
/// Each step contributes the magnitudes `|x|, |y|, |z|, |w|`; the final
/// step may contribute fewer than four. Downstream code treats the values
/// as positive reals, hence the absolute value.
#[allow(clippy::many_single_char_names)]
pub fn keystream(
    length: usize,
    burn_in: u32,
    h: f64,
    x0: f64,
    y0: f64,
    z0: f64,
    w0: f64,
) -> Vec<f64> {
    let mut s = State { x: x0, y: y0, z: z0, w: w0 };
    for _ in 0..burn_in {
        s = rk4_step(s, h);
    }

    let mut out = Vec::with_capacity(length);
    while out.len() < length {
        s = rk4_step(s, h);
        for v in [s.x, s.y, s.z, s.w] {
            if out.len() == length {
                break;
            }
            out.push(v.abs());
        }
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_restart() {
        let a = keystream(128, 200, DEFAULT_STEP, 0.1, 0.2, 0.3, 0.4);
        let b = keystream(128, 200, DEFAULT_STEP, 0.1, 0.2, 0.3, 0.4);
        assert_eq!(a, b);
    }

    #[test]
    fn partial_final_step() {
        // 6 = one full step (4 values) plus 2 of the next; the shared
        // prefix must match the longer stream exactly.
        let short = keystream(6, 50, DEFAULT_STEP, 0.1, 0.2, 0.3, 0.4);
        let long = keystream(8, 50, DEFAULT_STEP, 0.1, 0.2, 0.3, 0.4);
        assert_eq!(short.len(), 6);
        assert_eq!(&long[..6], &short[..]);
    }

    #[test]
    fn magnitudes_are_non_negative() {
        let ks = keystream(1000, 100, DEFAULT_STEP, -0.7, 1.3, -2.1, 0.9);
        assert!(ks.iter().all(|&v| v >= 0.0));
        // The attractor is bounded; values should stay finite and modest.
        assert!(ks.iter().all(|&v| v.is_finite() && v < 1e3));
    }

    #[test]
    fn zero_length_is_empty() {
        assert!(keystream(0, 10, DEFAULT_STEP, 0.1, 0.2, 0.3, 0.4).is_empty());
    }
}
