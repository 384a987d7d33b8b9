//! Codec round-trip tests.
//!
//! Verifies that quantized coefficients survive serialize/parse cycles
//! bit-exactly, across sampling layouts, restart intervals, and run-length
//! edge cases.

#![allow(clippy::pedantic, clippy::nursery)]
#![allow(clippy::unwrap_used)]

use scramjet_jpeg::{CoeffImage, CodecError};

// =============================================================================
// HELPERS
// =============================================================================

/// Deterministic coefficient pattern: small values, mixed signs, block- and
/// position-dependent so mislaid blocks are caught.
fn fill(image: &mut CoeffImage) {
    for (ci, comp) in image.components.iter_mut().enumerate() {
        for (bi, block) in comp.blocks.iter_mut().enumerate() {
            block[0] = ((bi as i16 * 7 + ci as i16 * 13) % 200) - 100;
            for k in 1..64 {
                // Sparse AC: roughly one in five positions non-zero.
                if (bi + k * 3 + ci) % 5 == 0 {
                    let v = ((bi as i16 + k as i16 * 11) % 61) - 30;
                    block[k] = if v == 0 { 1 } else { v };
                }
            }
        }
    }
}

fn assert_same_coefficients(a: &CoeffImage, b: &CoeffImage) {
    assert_eq!(a.components.len(), b.components.len());
    for (ca, cb) in a.components.iter().zip(&b.components) {
        assert_eq!(ca.width_in_blocks, cb.width_in_blocks);
        assert_eq!(ca.height_in_blocks, cb.height_in_blocks);
        assert_eq!(ca.blocks, cb.blocks, "coefficient mismatch in component {}", ca.id);
    }
}

// =============================================================================
// ROUND TRIPS
// =============================================================================

#[test]
fn grayscale_roundtrip() {
    let mut image = CoeffImage::new(32, 32, &[(1, 1)]).unwrap();
    fill(&mut image);

    let bytes = image.to_bytes().unwrap();
    let reloaded = CoeffImage::from_bytes(&bytes).unwrap();

    assert_eq!(reloaded.width, 32);
    assert_eq!(reloaded.height, 32);
    assert_same_coefficients(&image, &reloaded);
}

#[test]
fn color_420_roundtrip_with_odd_dimensions() {
    // 35x19 with 4:2:0 forces MCU padding blocks in every component.
    let mut image = CoeffImage::new(35, 19, &[(2, 2), (1, 1), (1, 1)]).unwrap();
    assert_eq!(image.components[0].width_in_blocks, 6);
    assert_eq!(image.components[0].height_in_blocks, 4);
    assert_eq!(image.components[1].width_in_blocks, 3);
    fill(&mut image);

    let bytes = image.to_bytes().unwrap();
    let reloaded = CoeffImage::from_bytes(&bytes).unwrap();
    assert_same_coefficients(&image, &reloaded);
}

#[test]
fn color_444_roundtrip() {
    let mut image = CoeffImage::new(24, 16, &[(1, 1), (1, 1), (1, 1)]).unwrap();
    fill(&mut image);

    let reloaded = CoeffImage::from_bytes(&image.to_bytes().unwrap()).unwrap();
    assert_same_coefficients(&image, &reloaded);
}

#[test]
fn restart_interval_roundtrip() {
    let mut image = CoeffImage::new(64, 48, &[(2, 2), (1, 1), (1, 1)]).unwrap();
    fill(&mut image);
    image.set_restart_interval(2);

    let reloaded = CoeffImage::from_bytes(&image.to_bytes().unwrap()).unwrap();
    assert_eq!(reloaded.restart_interval(), 2);
    assert_same_coefficients(&image, &reloaded);
}

#[test]
fn reserialization_is_byte_identical() {
    let mut image = CoeffImage::new(40, 40, &[(2, 1), (1, 1), (1, 1)]).unwrap();
    fill(&mut image);

    let first = image.to_bytes().unwrap();
    let second = CoeffImage::from_bytes(&first).unwrap().to_bytes().unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// RUN-LENGTH EDGES
// =============================================================================

#[test]
fn long_zero_runs_and_final_coefficient() {
    let mut image = CoeffImage::new(8, 8, &[(1, 1)]).unwrap();
    {
        let block = image.components[0].block_mut(0, 0);
        block[0] = -512;
        // 37-zero run needs two ZRL symbols before the next value.
        block[38] = 3;
        // Non-zero in the very last slot: no EOB emitted for this block.
        block[63] = -1;
    }

    let reloaded = CoeffImage::from_bytes(&image.to_bytes().unwrap()).unwrap();
    let block = reloaded.components[0].block(0, 0);
    assert_eq!(block[0], -512);
    assert_eq!(block[38], 3);
    assert_eq!(block[63], -1);
    assert_eq!(block.iter().filter(|&&v| v != 0).count(), 3);
}

#[test]
fn dc_prediction_spans_blocks() {
    let mut image = CoeffImage::new(32, 8, &[(1, 1)]).unwrap();
    let dcs = [100, -100, 0, 1023];
    for (i, &dc) in dcs.iter().enumerate() {
        image.components[0].block_mut(0, i)[0] = dc;
    }

    let reloaded = CoeffImage::from_bytes(&image.to_bytes().unwrap()).unwrap();
    for (i, &dc) in dcs.iter().enumerate() {
        assert_eq!(reloaded.components[0].block(0, i)[0], dc);
    }
}

// =============================================================================
// REJECTION
// =============================================================================

#[test]
fn rejects_non_jpeg_data() {
    assert!(matches!(
        CoeffImage::from_bytes(&[0u8; 16]),
        Err(CodecError::Malformed(_))
    ));
    assert!(CoeffImage::from_bytes(&[]).is_err());
}

#[test]
fn rejects_truncated_stream() {
    let mut image = CoeffImage::new(16, 16, &[(1, 1)]).unwrap();
    fill(&mut image);
    let bytes = image.to_bytes().unwrap();
    // Chop inside the entropy data.
    assert!(CoeffImage::from_bytes(&bytes[..bytes.len() / 2]).is_err());
}

#[test]
fn rejects_progressive_frames() {
    let image = CoeffImage::new(16, 16, &[(1, 1)]).unwrap();
    let mut bytes = image.to_bytes().unwrap();
    // Rewrite the SOF0 marker (FF C0) into SOF2 (progressive).
    let sof = bytes.windows(2).position(|w| w == [0xFF, 0xC0]).unwrap();
    bytes[sof + 1] = 0xC2;
    assert!(matches!(
        CoeffImage::from_bytes(&bytes),
        Err(CodecError::Unsupported(_))
    ));
}
