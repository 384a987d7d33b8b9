//! Coefficient access layer over the codec's block arrays.
//!
//! Everything the pipelines see goes through this module: DC and AC
//! sequences extracted in one canonical order and written back in the same
//! order. Extract once, transform in memory, apply once — the pipelines
//! never re-extract mid-pass.

use scramjet_jpeg::CoeffImage;

use crate::error::CipherError;

/// AC coefficients per block (zig-zag indices 1..=63).
pub const AC_PER_BLOCK: usize = 63;

// =============================================================================
// CHANNEL SELECTOR
// =============================================================================

/// Which components a pipeline pass covers.
///
/// Luma is component 0; chroma is every component with index >= 1,
/// concatenated into one stream in component order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Component 0.
    Luma,
    /// Components 1.. as one concatenated stream.
    Chroma,
}

impl Channel {
    /// Indices of the components this channel selects, in canonical
    /// ascending order.
    pub fn component_indices(self, image: &CoeffImage) -> std::ops::Range<usize> {
        match self {
            Self::Luma => 0..1.min(image.components.len()),
            Self::Chroma => 1.min(image.components.len())..image.components.len(),
        }
    }

    /// Number of blocks the channel spans.
    pub fn block_count(self, image: &CoeffImage) -> usize {
        self.component_indices(image)
            .map(|i| image.components[i].total_blocks())
            .sum()
    }
}

// =============================================================================
// DC ACCESS
// =============================================================================

/// Extract the DC sequence of `channel` in canonical order.
pub fn extract_dc(image: &CoeffImage, channel: Channel) -> Vec<i32> {
    let mut out = Vec::with_capacity(channel.block_count(image));
    for ci in channel.component_indices(image) {
        out.extend(image.components[ci].blocks.iter().map(|b| i32::from(b[0])));
    }
    out
}

/// Write a transformed DC sequence back in canonical order.
///
/// # Errors
/// `CipherError::LengthMismatch` when `dc` does not match the channel's
/// block count (the image changed between extract and apply).
pub fn apply_dc(image: &mut CoeffImage, dc: &[i32], channel: Channel) -> Result<(), CipherError> {
    let expected = channel.block_count(image);
    if dc.len() != expected {
        return Err(CipherError::LengthMismatch { expected, actual: dc.len() });
    }
    let mut values = dc.iter();
    for ci in channel.component_indices(image) {
        for block in &mut image.components[ci].blocks {
            if let Some(&v) = values.next() {
                block[0] = v as i16;
            }
        }
    }
    Ok(())
}

// =============================================================================
// AC ACCESS
// =============================================================================

/// Extract the AC vectors of `channel`, one 63-value array per block,
/// block order matching [`extract_dc`].
pub fn extract_ac(image: &CoeffImage, channel: Channel) -> Vec<[i32; AC_PER_BLOCK]> {
    let mut out = Vec::with_capacity(channel.block_count(image));
    for ci in channel.component_indices(image) {
        for block in &image.components[ci].blocks {
            out.push(std::array::from_fn(|k| i32::from(block[k + 1])));
        }
    }
    out
}

/// Write transformed AC vectors back in canonical order.
///
/// # Errors
/// `CipherError::LengthMismatch` when `ac` does not match the channel's
/// block count.
pub fn apply_ac(
    image: &mut CoeffImage,
    ac: &[[i32; AC_PER_BLOCK]],
    channel: Channel,
) -> Result<(), CipherError> {
    let expected = channel.block_count(image);
    if ac.len() != expected {
        return Err(CipherError::LengthMismatch { expected, actual: ac.len() });
    }
    let mut vectors = ac.iter();
    for ci in channel.component_indices(image) {
        for block in &mut image.components[ci].blocks {
            if let Some(vector) = vectors.next() {
                for (k, &v) in vector.iter().enumerate() {
                    block[k + 1] = v as i16;
                }
            }
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_image() -> CoeffImage {
        let mut image = CoeffImage::new(16, 16, &[(1, 1), (1, 1), (1, 1)]).unwrap();
        for (ci, comp) in image.components.iter_mut().enumerate() {
            for (bi, block) in comp.blocks.iter_mut().enumerate() {
                block[0] = (ci as i16 + 1) * 100 + bi as i16;
                block[1] = 7;
                block[63] = -(ci as i16 + 1);
            }
        }
        image
    }

    #[test]
    fn luma_selects_component_zero() {
        let image = sample_image();
        let dc = extract_dc(&image, Channel::Luma);
        assert_eq!(dc, vec![100, 101, 102, 103]);
    }

    #[test]
    fn chroma_concatenates_remaining_components() {
        let image = sample_image();
        let dc = extract_dc(&image, Channel::Chroma);
        assert_eq!(dc, vec![200, 201, 202, 203, 300, 301, 302, 303]);
    }

    #[test]
    fn dc_apply_inverts_extract() {
        let mut image = sample_image();
        let mut dc = extract_dc(&image, Channel::Chroma);
        dc.reverse();
        apply_dc(&mut image, &dc, Channel::Chroma).unwrap();
        assert_eq!(extract_dc(&image, Channel::Chroma), dc);
        // Luma untouched.
        assert_eq!(extract_dc(&image, Channel::Luma), vec![100, 101, 102, 103]);
    }

    #[test]
    fn ac_excludes_dc_slot() {
        let image = sample_image();
        let ac = extract_ac(&image, Channel::Luma);
        assert_eq!(ac.len(), 4);
        assert_eq!(ac[0][0], 7); // zig-zag index 1
        assert_eq!(ac[0][62], -1); // zig-zag index 63
        assert!(ac[0][1..62].iter().all(|&v| v == 0));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let mut image = sample_image();
        assert!(matches!(
            apply_dc(&mut image, &[1, 2, 3], Channel::Luma),
            Err(CipherError::LengthMismatch { expected: 4, actual: 3 })
        ));
        assert!(apply_ac(&mut image, &[], Channel::Luma).is_err());
    }

    #[test]
    fn grayscale_chroma_is_empty() {
        let image = CoeffImage::new(16, 16, &[(1, 1)]).unwrap();
        assert_eq!(Channel::Chroma.block_count(&image), 0);
        assert!(extract_dc(&image, Channel::Chroma).is_empty());
        assert!(extract_ac(&image, Channel::Chroma).is_empty());
    }
}
