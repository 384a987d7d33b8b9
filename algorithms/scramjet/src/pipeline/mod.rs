//! The coefficient-domain cipher pipelines.
//!
//! Two pipelines per channel: DC (permutation + sign-and-magnitude
//! substitution with feedback) and AC (inter-block permutation, two-round
//! intra-block group shuffle, substitution over the non-zero coefficients).
//! Every stage is strictly sequential and exactly invertible; the inverse
//! stages replay the same key material in mirrored order.

use log::warn;

pub mod ac;
pub mod dc;
pub mod groups;

// =============================================================================
// PARTIAL FISHER-YATES REPLAY
// =============================================================================

/// Forward replay of a swap key: swap `values[i]` with `values[key[i]]`
/// for ascending `i`.
///
/// Swap keys satisfy `key[i] in [i, len)` by construction; an index outside
/// the sequence means the key was built for a different length, so the
/// offending swap is skipped and logged rather than panicking.
pub fn permute<T>(values: &mut [T], swap_key: &[usize]) {
    for (i, &target) in swap_key.iter().enumerate() {
        swap_checked(values, i, target);
    }
}

/// Reverse replay: the same swaps in descending `i`, undoing [`permute`].
pub fn permute_inverse<T>(values: &mut [T], swap_key: &[usize]) {
    for (i, &target) in swap_key.iter().enumerate().rev() {
        swap_checked(values, i, target);
    }
}

#[inline]
fn swap_checked<T>(values: &mut [T], i: usize, target: usize) {
    if i < values.len() && target < values.len() {
        values.swap(i, target);
    } else {
        warn!(
            "swap ({i} <-> {target}) outside sequence of length {}; skipped",
            values.len()
        );
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_then_reverse_is_identity() {
        let original: Vec<i32> = (0..20).collect();
        // Any key with key[i] >= i works, including repeated targets.
        let key = vec![5, 5, 19, 3, 11, 7, 6, 18, 9, 9, 12, 15, 13, 19];

        let mut values = original.clone();
        permute(&mut values, &key);
        assert_ne!(values, original);
        permute_inverse(&mut values, &key);
        assert_eq!(values, original);
    }

    #[test]
    fn out_of_range_swaps_are_skipped() {
        let mut values = vec![1, 2, 3];
        permute(&mut values, &[2, 99]);
        assert_eq!(values, vec![3, 2, 1]);
        permute_inverse(&mut values, &[2, 99]);
        assert_eq!(values, vec![1, 2, 3]);
    }
}
