//! The channel orchestrator.
//!
//! One image means four independent pipeline passes: DC-luma, DC-chroma,
//! AC-luma, AC-chroma. They touch disjoint coefficients (index 0 vs 1..=63,
//! component 0 vs components 1..), so the transforms run concurrently; the
//! borrow against the codec's storage is staged instead — extract all four
//! sequences, transform, apply all four back.

use log::debug;
use scramjet_jpeg::CoeffImage;

use crate::coeffs::{self, Channel};
use crate::error::CipherError;
use crate::key::MasterKey;
use crate::pipeline::ac::{self, AcBlock};
use crate::pipeline::dc;

// =============================================================================
// PUBLIC ENTRY POINTS
// =============================================================================

/// Encrypt an image's coefficients in place.
///
/// # Errors
/// Any channel failure aborts the image; the coefficients may then be
/// partially transformed and the caller should discard the image.
pub fn encrypt(image: &mut CoeffImage, key: &MasterKey) -> Result<(), CipherError> {
    process(image, key, Direction::Encrypt)
}

/// Decrypt an image's coefficients in place, inverting [`encrypt`] under
/// the same key bit-exactly.
///
/// # Errors
/// As for [`encrypt`].
pub fn decrypt(image: &mut CoeffImage, key: &MasterKey) -> Result<(), CipherError> {
    process(image, key, Direction::Decrypt)
}

// =============================================================================
// ORCHESTRATION
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Direction {
    Encrypt,
    Decrypt,
}

fn process(image: &mut CoeffImage, key: &MasterKey, direction: Direction) -> Result<(), CipherError> {
    let dc_luma = coeffs::extract_dc(image, Channel::Luma);
    let dc_chroma = coeffs::extract_dc(image, Channel::Chroma);
    let ac_luma = coeffs::extract_ac(image, Channel::Luma);
    let ac_chroma = coeffs::extract_ac(image, Channel::Chroma);
    debug!(
        "{direction:?}: {} luma / {} chroma blocks",
        dc_luma.len(),
        dc_chroma.len()
    );

    let (dc_luma, dc_chroma, ac_luma, ac_chroma) =
        run_channels(key, direction, dc_luma, dc_chroma, ac_luma, ac_chroma);

    coeffs::apply_dc(image, &dc_luma?, Channel::Luma)?;
    coeffs::apply_dc(image, &dc_chroma?, Channel::Chroma)?;
    coeffs::apply_ac(image, &ac_luma?, Channel::Luma)?;
    coeffs::apply_ac(image, &ac_chroma?, Channel::Chroma)?;
    Ok(())
}

type DcResult = Result<Vec<i32>, CipherError>;
type AcResult = Result<Vec<AcBlock>, CipherError>;

fn run_dc(mut dc: Vec<i32>, key: &MasterKey, direction: Direction) -> DcResult {
    match direction {
        Direction::Encrypt => dc::encrypt(&mut dc, key)?,
        Direction::Decrypt => dc::decrypt(&mut dc, key)?,
    }
    Ok(dc)
}

fn run_ac(mut blocks: Vec<AcBlock>, key: &MasterKey, direction: Direction) -> AcResult {
    match direction {
        Direction::Encrypt => ac::encrypt(&mut blocks, key)?,
        Direction::Decrypt => ac::decrypt(&mut blocks, key)?,
    }
    Ok(blocks)
}

/// Run the four channel transforms, in parallel when the `multithread`
/// feature is enabled.
#[cfg(feature = "multithread")]
fn run_channels(
    key: &MasterKey,
    direction: Direction,
    dc_luma: Vec<i32>,
    dc_chroma: Vec<i32>,
    ac_luma: Vec<AcBlock>,
    ac_chroma: Vec<AcBlock>,
) -> (DcResult, DcResult, AcResult, AcResult) {
    let ((dc_l, dc_c), (ac_l, ac_c)) = rayon::join(
        || {
            rayon::join(
                || run_dc(dc_luma, key, direction),
                || run_dc(dc_chroma, key, direction),
            )
        },
        || {
            rayon::join(
                || run_ac(ac_luma, key, direction),
                || run_ac(ac_chroma, key, direction),
            )
        },
    );
    (dc_l, dc_c, ac_l, ac_c)
}

#[cfg(not(feature = "multithread"))]
fn run_channels(
    key: &MasterKey,
    direction: Direction,
    dc_luma: Vec<i32>,
    dc_chroma: Vec<i32>,
    ac_luma: Vec<AcBlock>,
    ac_chroma: Vec<AcBlock>,
) -> (DcResult, DcResult, AcResult, AcResult) {
    (
        run_dc(dc_luma, key, direction),
        run_dc(dc_chroma, key, direction),
        run_ac(ac_luma, key, direction),
        run_ac(ac_chroma, key, direction),
    )
}
