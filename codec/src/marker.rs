//! JPEG marker constants (ITU-T T.81 Table B.1).

/// Start of image.
pub const SOI: u8 = 0xD8;
/// End of image.
pub const EOI: u8 = 0xD9;
/// Start of frame, baseline DCT.
pub const SOF0: u8 = 0xC0;
/// Define Huffman table.
pub const DHT: u8 = 0xC4;
/// Define arithmetic coding conditioning.
pub const DAC: u8 = 0xCC;
/// Define quantization table.
pub const DQT: u8 = 0xDB;
/// Start of scan.
pub const SOS: u8 = 0xDA;
/// Define restart interval.
pub const DRI: u8 = 0xDD;
/// First restart marker; RST0..RST7 occupy 0xD0..0xD7.
pub const RST0: u8 = 0xD0;
/// First application segment; APP0..APP15 occupy 0xE0..0xEF.
pub const APP0: u8 = 0xE0;

/// True for the frame markers this codec rejects: progressive, lossless,
/// hierarchical, and arithmetic-coded variants (SOF1..SOF15 except the
/// DHT/DAC slots the range shares).
pub const fn is_unsupported_sof(marker: u8) -> bool {
    matches!(marker, 0xC1..=0xCF) && marker != DHT && marker != DAC
}

/// True for RST0..RST7.
pub fn is_rst(marker: u8) -> bool {
    (RST0..=RST0 + 7).contains(&marker)
}
