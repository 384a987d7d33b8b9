//! # Scramjet
//!
//! Format-preserving JPEG encryption in the quantized-DCT domain.
//!
//! Given a baseline JPEG and a master key of chaotic-map seeds, the cipher
//! scrambles the visual content while the file structure, quantization
//! tables, Huffman tables, and block grid stay decodable by any standard
//! JPEG reader. The same key reverses the transform bit-exactly.

//! # Usage
//! ```no_run
//! use scramjet::{decrypt, encrypt, CoeffImage, MasterKey};
//!
//! let key = MasterKey::default();
//!
//! let mut image = CoeffImage::load("photo.jpg")?;
//! encrypt(&mut image, &key)?;
//! image.save("photo.scrambled.jpg")?;
//!
//! let mut scrambled = CoeffImage::load("photo.scrambled.jpg")?;
//! decrypt(&mut scrambled, &key)?;
//! scrambled.save("photo.recovered.jpg")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! This is a chaos-based perceptual-encryption scheme, not a block cipher:
//! it makes no IND-CPA claim. What it does guarantee is determinism (the
//! keystreams regenerate identically on both sides) and bit-exact
//! round-trips over the coefficient array, pinned values included.

// =============================================================================
// MODULES
// =============================================================================

pub mod chaos;
pub mod coeffs;
mod digits;
mod engine;
mod error;
mod key;
pub mod pipeline;

// =============================================================================
// EXPORTS
// =============================================================================

pub use digits::{significant_digits, MAX_DIGITS};
pub use engine::{decrypt, encrypt};
pub use error::CipherError;
pub use key::{KeyError, MasterKey};
/// The codec this cipher operates through, re-exported for callers.
pub use scramjet_jpeg::{self as codec, CoeffImage};
