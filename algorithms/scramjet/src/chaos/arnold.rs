//! A 3-D discrete Arnold cat map over `(Z/N)^3`.

// =============================================================================
// PARAMETERS
// =============================================================================

/// Integer map parameters and modulus.
///
/// The transfer matrix of the map is unimodular (determinant 1), so every
/// parameter choice yields a bijection of `(Z/N)^3` and the orbit structure
/// is purely permutational. Degenerate orbits exist — `(0,0,0)` is always a
/// fixed point — and seed derivation must avoid them.
#[derive(Debug, Clone, Copy)]
pub struct ArnoldParams {
    /// Shear parameter `a`.
    pub a: u64,
    /// Shear parameter `b`.
    pub b: u64,
    /// Shear parameter `c`.
    pub c: u64,
    /// Shear parameter `d`.
    pub d: u64,
    /// Modulus `N`.
    pub mod_n: u64,
}

impl Default for ArnoldParams {
    fn default() -> Self {
        Self { a: 2, b: 1, c: 1, d: 1, mod_n: 256 }
    }
}

// =============================================================================
// GENERATOR
// =============================================================================

/// Generate `length` values in `[0, 1)` after `burn_in` discarded steps.
///
/// Each step contributes `x/N, y/N, z/N`; the final step may contribute
/// fewer than three.
pub fn keystream(
    length: usize,
    burn_in: u32,
    params: ArnoldParams,
    x0: u64,
    y0: u64,
    z0: u64,
) -> Vec<f64> {
    let n = params.mod_n.max(1);
    let (mut x, mut y, mut z) = (x0 % n, y0 % n, z0 % n);

    for _ in 0..burn_in {
        (x, y, z) = step(x, y, z, params, n);
    }

    let modulus = n as f64;
    let mut out = Vec::with_capacity(length);
    while out.len() < length {
        (x, y, z) = step(x, y, z, params, n);
        for v in [x, y, z] {
            if out.len() == length {
                break;
            }
            out.push(v as f64 / modulus);
        }
    }
    out
}

/// One application of the shear composition, everything mod `n`.
#[inline]
fn step(x: u64, y: u64, z: u64, p: ArnoldParams, n: u64) -> (u64, u64, u64) {
    let ArnoldParams { a, b, c, d, .. } = p;
    let nx = (x + a * z) % n;
    let ny = (b * c * x + y + a * b * c * z + c * z) % n;
    let nz = (b * c * d * x + b * x + d * y + a * b * c * d * z + a * b * z + c * d * z + z) % n;
    (nx, ny, nz)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_restart() {
        let p = ArnoldParams::default();
        let a = keystream(100, 200, p, 151, 22, 103);
        let b = keystream(100, 200, p, 151, 22, 103);
        assert_eq!(a, b);
    }

    #[test]
    fn values_lie_in_unit_interval() {
        let ks = keystream(999, 0, ArnoldParams::default(), 7, 19, 200);
        assert_eq!(ks.len(), 999);
        assert!(ks.iter().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn origin_is_a_degenerate_fixed_orbit() {
        // (0,0,0) never leaves the origin; the stream is all zeros and the
        // seed-derivation layer is responsible for avoiding it.
        let p = ArnoldParams { a: 1, b: 1, c: 1, d: 1, mod_n: 256 };
        let ks = keystream(30, 5, p, 0, 0, 0);
        assert!(ks.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn map_is_a_bijection() {
        // Unimodularity check by brute force on a small modulus: every
        // state must have exactly one preimage.
        let p = ArnoldParams { a: 2, b: 1, c: 1, d: 1, mod_n: 5 };
        let mut seen = vec![false; 125];
        for x in 0..5u64 {
            for y in 0..5u64 {
                for z in 0..5u64 {
                    let (nx, ny, nz) = super::step(x, y, z, p, 5);
                    let idx = (nx * 25 + ny * 5 + nz) as usize;
                    assert!(!seen[idx], "two states map to {nx},{ny},{nz}");
                    seen[idx] = true;
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }
}
