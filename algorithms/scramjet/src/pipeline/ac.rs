//! The AC pipeline: inter-block permutation, two-round intra-block group
//! shuffle, and substitution over the non-zero coefficients.

use crate::coeffs::AC_PER_BLOCK;
use crate::digits::significant_digits;
use crate::error::CipherError;
use crate::key::MasterKey;
use crate::pipeline::{groups, permute, permute_inverse};

/// One block's AC coefficients in delivery order.
pub type AcBlock = [i32; AC_PER_BLOCK];

// =============================================================================
// INTER-BLOCK PERMUTATION
// =============================================================================

/// Logistic-backed swap key over whole blocks, length `n_blocks - 1`.
pub fn inter_block_key(n_blocks: usize, key: &MasterKey) -> Vec<usize> {
    if n_blocks < 2 {
        return Vec::new();
    }
    let ks = key.logistic_keystream(n_blocks - 1);
    (0..n_blocks - 1)
        .map(|m| {
            let offset = significant_digits(ks[m].abs(), key.alpha) as usize % (n_blocks - m);
            m + offset
        })
        .collect()
}

// =============================================================================
// INTRA-BLOCK TWO-ROUND SHUFFLE
// =============================================================================

/// Arnold-backed swap key over a block's terminated groups, one entry per
/// swap position.
pub fn intra_key(n_groups: usize, key: &MasterKey) -> Vec<usize> {
    if n_groups < 2 {
        return Vec::new();
    }
    let ks = key.arnold_keystream(n_groups - 1);
    (0..n_groups - 1)
        .map(|i| {
            let span = n_groups - i;
            let offset = (ks[i].abs() * span as f64).floor() as usize % span;
            i + offset
        })
        .collect()
}

/// One shuffle round: decompose, move the terminated groups, reinsert the
/// pinned zero-groups at their indices, flatten back.
fn shuffle_round(ac: &mut AcBlock, swap_key: &[usize], reverse: bool) {
    let decomposition = groups::decompose(ac);
    let (mut movable, pinned) = decomposition.split();
    if reverse {
        permute_inverse(&mut movable, swap_key);
    } else {
        permute(&mut movable, swap_key);
    }
    let reassembled = groups::reassemble(movable, pinned);
    groups::flatten_into(&reassembled, ac);
}

/// Two forward shuffle rounds with one shared intra-key.
///
/// The round-2 decomposition differs from round 1 (the zero-groups sit at
/// new indices once their neighbors moved) but the terminated-group count
/// is invariant, so one key drives both rounds.
pub fn shuffle_intra(ac: &mut AcBlock, key: &MasterKey) {
    let n = groups::decompose(ac).terminated_count();
    if n < 2 {
        return;
    }
    let swap_key = intra_key(n, key);
    shuffle_round(ac, &swap_key, false);
    shuffle_round(ac, &swap_key, false);
}

/// Mirror of [`shuffle_intra`]: two reverse rounds, re-decomposing between
/// them, recovering the exact input arrangement.
pub fn unshuffle_intra(ac: &mut AcBlock, key: &MasterKey) {
    let n = groups::decompose(ac).terminated_count();
    if n < 2 {
        return;
    }
    let swap_key = intra_key(n, key);
    shuffle_round(ac, &swap_key, true);
    shuffle_round(ac, &swap_key, true);
}

// =============================================================================
// SUBSTITUTION
// =============================================================================

/// Non-zero AC coefficients across all blocks, the substitution domain.
pub fn nonzero_count(blocks: &[AcBlock]) -> usize {
    blocks
        .iter()
        .map(|b| b.iter().filter(|&&v| v != 0).count())
        .sum()
}

/// Substitute every non-zero AC coefficient in place (encrypt direction).
///
/// The keystream is indexed by the coefficient's position in the
/// concatenated non-zero sequence, and that position also perturbs the
/// magnitude, so equal values at different positions encrypt differently.
/// Unit magnitudes only flip sign (a 1 has no maskable low bits); larger
/// magnitudes keep their top bit, preserving the JPEG size category.
///
/// # Errors
/// `CipherError::KeystreamUnderflow` when `keystream` is shorter than the
/// non-zero count.
pub fn substitute(blocks: &mut [AcBlock], keystream: &[f64]) -> Result<(), CipherError> {
    let needed = nonzero_count(blocks);
    if keystream.len() < needed {
        return Err(CipherError::KeystreamUnderflow { needed, available: keystream.len() });
    }

    let mut prev_sign = 0u64;
    let mut prev_mag = 0u64;
    let mut i = 0usize;

    for block in blocks {
        for v in block.iter_mut() {
            if *v == 0 {
                continue;
            }
            let sign_n = u64::from(*v < 0);
            let mag = u64::from(v.unsigned_abs());

            if mag == 1 {
                let sig = significant_digits(keystream[i], 1);
                let sign_c = (sig & 1) ^ prev_sign ^ sign_n;
                prev_sign = sign_c;
                prev_mag = 1;
                *v = if sign_c == 1 { -1 } else { 1 };
            } else {
                let width = 64 - mag.leading_zeros();
                let msb = 1u64 << (width - 1);
                let mask = msb - 1;
                let sig = significant_digits(keystream[i], width.max(1));
                let km = sig & mask;

                let sign_c = (sig & 1) ^ prev_sign ^ sign_n;
                let sum = (mag + i as u64) & mask;
                let new_mag = ((km ^ sum ^ prev_mag) & mask) | msb;
                prev_sign = sign_c;
                prev_mag = new_mag;
                debug_assert_eq!(64 - new_mag.leading_zeros(), width);

                *v = if sign_c == 1 { -(new_mag as i32) } else { new_mag as i32 };
            }
            i += 1;
        }
    }
    Ok(())
}

/// Invert [`substitute`] in place (decrypt direction).
///
/// # Errors
/// `CipherError::KeystreamUnderflow` as for [`substitute`].
pub fn substitute_inverse(blocks: &mut [AcBlock], keystream: &[f64]) -> Result<(), CipherError> {
    let needed = nonzero_count(blocks);
    if keystream.len() < needed {
        return Err(CipherError::KeystreamUnderflow { needed, available: keystream.len() });
    }

    let mut prev_sign = 0u64;
    let mut prev_mag = 0u64;
    let mut i = 0usize;

    for block in blocks {
        for v in block.iter_mut() {
            if *v == 0 {
                continue;
            }
            let sign_c = u64::from(*v < 0);
            let mag_c = u64::from(v.unsigned_abs());

            if mag_c == 1 {
                let sig = significant_digits(keystream[i], 1);
                let sign_p = (sig & 1) ^ prev_sign ^ sign_c;
                prev_sign = sign_c;
                prev_mag = 1;
                *v = if sign_p == 1 { -1 } else { 1 };
            } else {
                let width = 64 - mag_c.leading_zeros();
                let msb = 1u64 << (width - 1);
                let mask = msb - 1;
                let sig = significant_digits(keystream[i], width.max(1));
                let km = sig & mask;

                let sign_p = (sig & 1) ^ prev_sign ^ sign_c;
                let cipher_low = mag_c & mask;
                let unmasked = (cipher_low ^ km ^ prev_mag).wrapping_sub(i as u64);
                let mag = (unmasked & mask) | msb;
                prev_sign = sign_c;
                prev_mag = mag_c;

                *v = if sign_p == 1 { -(mag as i32) } else { mag as i32 };
            }
            i += 1;
        }
    }
    Ok(())
}

// =============================================================================
// CHANNEL PASSES
// =============================================================================

/// Full AC encrypt pass: inter-block permute, two-round intra shuffle,
/// substitute.
///
/// # Errors
/// Propagates [`substitute`] failures.
pub fn encrypt(blocks: &mut [AcBlock], key: &MasterKey) -> Result<(), CipherError> {
    let swap_key = inter_block_key(blocks.len(), key);
    permute(blocks, &swap_key);
    for block in blocks.iter_mut() {
        shuffle_intra(block, key);
    }
    let keystream = key.logistic_keystream(nonzero_count(blocks));
    substitute(blocks, &keystream)
}

/// Full AC decrypt pass: unsubstitute, intra unshuffle, inter-block
/// unpermute.
///
/// # Errors
/// Propagates [`substitute_inverse`] failures.
pub fn decrypt(blocks: &mut [AcBlock], key: &MasterKey) -> Result<(), CipherError> {
    let keystream = key.logistic_keystream(nonzero_count(blocks));
    substitute_inverse(blocks, &keystream)?;
    for block in blocks.iter_mut() {
        unshuffle_intra(block, key);
    }
    let swap_key = inter_block_key(blocks.len(), key);
    permute_inverse(blocks, &swap_key);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
