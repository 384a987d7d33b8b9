//! # scramjet-jpeg
//!
//! Baseline JPEG coefficient codec: read a JPEG into its quantized DCT
//! coefficients, mutate them in place, and write a valid JPEG back — without
//! ever dequantizing, re-quantizing, or touching pixels.
//!
//! # Usage
//! ```no_run
//! use scramjet_jpeg::CoeffImage;
//!
//! let mut image = CoeffImage::load("photo.jpg")?;
//! let dc = image.components[0].block(0, 0)[0];
//! image.components[0].block_mut(0, 0)[0] = -dc;
//! image.save("photo-flipped-dc.jpg")?;
//! # Ok::<(), scramjet_jpeg::CodecError>(())
//! ```
//!
//! Structural segments (quantization tables, Huffman tables, APPn metadata,
//! restart intervals) are preserved byte-for-byte; only the entropy-coded
//! scan is re-encoded from the current coefficients.

// =============================================================================
// MODULES
// =============================================================================

mod bitio;
mod error;
mod huffman;
mod image;
mod marker;
mod parser;
mod scan;
mod tables;

// =============================================================================
// EXPORTS
// =============================================================================

pub use error::{CodecError, Result};
pub use image::{Block, CoeffImage, Component};
