//! The DC pipeline: permutation plus sign-and-magnitude substitution.

use crate::digits::significant_digits;
use crate::error::CipherError;
use crate::key::MasterKey;
use crate::pipeline::{permute, permute_inverse};

// =============================================================================
// CONSTANTS
// =============================================================================

/// The DC value that is pinned alongside zero: the most negative quantized
/// coefficient has no same-width substitution image, so it passes through.
pub const PINNED_DC: i32 = -1024;

// =============================================================================
// PERMUTATION KEY
// =============================================================================

/// Arnold-backed swap key of length `len - 2` with `key[m] in [m, len)`.
///
/// Sequences shorter than 3 get an empty key (nothing to permute).
pub fn permutation_key(len: usize, key: &MasterKey) -> Vec<usize> {
    if len < 3 {
        return Vec::new();
    }
    let ks = key.arnold_keystream(len - 2);
    (0..len - 2)
        .map(|m| {
            let offset = significant_digits(ks[m].abs(), key.alpha) as usize % (len - m);
            m + offset
        })
        .collect()
}

// =============================================================================
// SUBSTITUTION
// =============================================================================

/// Values that take part in substitution: everything except the pinned
/// zero and `-1024`.
pub fn eligible_count(dc: &[i32]) -> usize {
    dc.iter().filter(|&&v| v != 0 && v != PINNED_DC).count()
}

/// Substitute the DC sequence in place (encrypt direction).
///
/// Per eligible value the keystream contributes one real: its top digit's
/// parity flips the sign chain, its low bits mask the magnitude. The
/// magnitude's top bit is preserved, so every value keeps its JPEG
/// category, and both feedback registers chain cipher output forward.
///
/// # Errors
/// `CipherError::KeystreamUnderflow` when `keystream` is shorter than the
/// eligible-value count.
pub fn substitute(dc: &mut [i32], keystream: &[f64], alpha: u32) -> Result<(), CipherError> {
    let needed = eligible_count(dc);
    if keystream.len() < needed {
        return Err(CipherError::KeystreamUnderflow { needed, available: keystream.len() });
    }

    let mut prev_sign = 0u64;
    let mut prev_mag = 0u64;
    let mut k = 0usize;

    for v in dc.iter_mut() {
        if *v == 0 || *v == PINNED_DC {
            continue;
        }
        let sig = significant_digits(keystream[k], alpha);
        k += 1;

        let ks_bit = sig & 1;
        let sign_n = u64::from(*v < 0);
        let sign_c = ks_bit ^ sign_n ^ prev_sign;
        prev_sign = sign_c;

        let mag = u64::from(v.unsigned_abs());
        let width = 64 - mag.leading_zeros();
        let msb = 1u64 << (width - 1);
        let mask = msb - 1;

        let km = sig & mask;
        let sum = (mag + km) & mask;
        let sub = ((km ^ sum ^ prev_mag) & mask) | msb;
        prev_mag = sub;
        debug_assert_eq!(64 - sub.leading_zeros(), width);

        *v = if sign_c == 1 { -(sub as i32) } else { sub as i32 };
    }
    Ok(())
}

/// Invert [`substitute`] in place (decrypt direction).
///
/// The feedback registers track the *cipher* stream on both sides: encrypt
/// chains what it emits, decrypt chains what it consumes, so the registers
/// agree value-for-value.
///
/// # Errors
/// `CipherError::KeystreamUnderflow` as for [`substitute`].
pub fn substitute_inverse(dc: &mut [i32], keystream: &[f64], alpha: u32) -> Result<(), CipherError> {
    let needed = eligible_count(dc);
    if keystream.len() < needed {
        return Err(CipherError::KeystreamUnderflow { needed, available: keystream.len() });
    }

    let mut prev_sign = 0u64;
    let mut prev_mag = 0u64;
    let mut k = 0usize;

    for v in dc.iter_mut() {
        if *v == 0 || *v == PINNED_DC {
            continue;
        }
        let sig = significant_digits(keystream[k], alpha);
        k += 1;

        let ks_bit = sig & 1;
        let sign_c = u64::from(*v < 0);
        let mag_c = u64::from(v.unsigned_abs());
        let width = 64 - mag_c.leading_zeros();
        let msb = 1u64 << (width - 1);
        let mask = msb - 1;
        let km = sig & mask;

        let sign_p = ks_bit ^ prev_sign ^ sign_c;
        prev_sign = sign_c;

        let masked = mag_c & mask;
        let unmasked = masked ^ km ^ prev_mag;
        let mag = (unmasked.wrapping_sub(km) & mask) | msb;
        prev_mag = mag_c;

        *v = if sign_p == 1 { -(mag as i32) } else { mag as i32 };
    }
    Ok(())
}

// =============================================================================
// CHANNEL PASSES
// =============================================================================

/// Full DC encrypt pass: permute, then substitute.
///
/// # Errors
/// Propagates [`substitute`] failures.
pub fn encrypt(dc: &mut [i32], key: &MasterKey) -> Result<(), CipherError> {
    let swap_key = permutation_key(dc.len(), key);
    permute(dc, &swap_key);
    let keystream = key.logistic_keystream(eligible_count(dc));
    substitute(dc, &keystream, key.alpha)
}

/// Full DC decrypt pass: unsubstitute, then unpermute.
///
/// # Errors
/// Propagates [`substitute_inverse`] failures.
pub fn decrypt(dc: &mut [i32], key: &MasterKey) -> Result<(), CipherError> {
    let keystream = key.logistic_keystream(eligible_count(dc));
    substitute_inverse(dc, &keystream, key.alpha)?;
    let swap_key = permutation_key(dc.len(), key);
    permute_inverse(dc, &swap_key);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
