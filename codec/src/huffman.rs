//! Canonical JPEG Huffman tables: build, decode support, encode support.

use crate::error::{CodecError, Result};

// =============================================================================
// DECODE-SIDE TABLE
// =============================================================================

/// A Huffman table in the canonical form DHT segments carry, with the
/// derived decode arrays of T.81 F.2.2.3.
#[derive(Debug, Clone, Default)]
pub struct HuffTable {
    /// Number of codes of each bit length; index 0 unused.
    pub(crate) counts: [u8; 17],
    /// Symbols in order of increasing code length.
    pub(crate) symbols: Vec<u8>,
    /// Smallest code of each bit length.
    pub(crate) min_code: [u16; 17],
    /// Largest code of each bit length, or -1 when the length is unused.
    pub(crate) max_code: [i32; 17],
    /// Index into `symbols` of the first code of each bit length.
    pub(crate) val_ptr: [u16; 17],
}

impl HuffTable {
    /// Build a table from the raw DHT payload fields.
    pub fn new(counts: [u8; 17], symbols: Vec<u8>) -> Result<Self> {
        let total: usize = counts.iter().map(|&c| usize::from(c)).sum();
        if total != symbols.len() || total > 256 {
            return Err(CodecError::Malformed("huffman table count/symbol mismatch"));
        }
        let mut table = Self { counts, symbols, ..Self::default() };
        table.derive();
        Ok(table)
    }

    /// Derive `min_code`/`max_code`/`val_ptr` (T.81 generate_size/code tables).
    fn derive(&mut self) {
        let mut code = 0u16;
        let mut si = 0u16;
        for i in 1..=16usize {
            self.val_ptr[i] = si;
            if self.counts[i] == 0 {
                self.max_code[i] = -1;
            } else {
                self.min_code[i] = code;
                code += u16::from(self.counts[i]);
                self.max_code[i] = i32::from(code) - 1;
            }
            si += u16::from(self.counts[i]);
            code <<= 1;
        }
    }

    /// Raw DHT payload for this table (counts then symbols), minus the
    /// class/id byte.
    pub fn to_payload(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(16 + self.symbols.len());
        out.extend_from_slice(&self.counts[1..=16]);
        out.extend_from_slice(&self.symbols);
        out
    }

    /// Build the symbol-indexed encode view of this table.
    pub fn encoder(&self) -> HuffEncoder {
        let mut codes = [None; 256];
        let mut code = 0u16;
        let mut k = 0usize;
        for len in 1..=16u8 {
            for _ in 0..self.counts[usize::from(len)] {
                codes[usize::from(self.symbols[k])] = Some((code, len));
                code += 1;
                k += 1;
            }
            code <<= 1;
        }
        HuffEncoder { codes }
    }
}

// =============================================================================
// ENCODE-SIDE TABLE
// =============================================================================

/// Symbol-to-codeword view of a [`HuffTable`].
pub struct HuffEncoder {
    codes: [Option<(u16, u8)>; 256],
}

impl HuffEncoder {
    /// Codeword and bit length for `symbol`; `MissingCode` when the table
    /// defines none (possible with optimized source tables).
    pub fn code(&self, class: u8, symbol: u8) -> Result<(u16, u8)> {
        self.codes[usize::from(symbol)].ok_or(CodecError::MissingCode { class, symbol })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn two_symbol_table() -> HuffTable {
        // Codes: symbol 5 -> 0 (1 bit), symbol 9 -> 10 (2 bits).
        let mut counts = [0u8; 17];
        counts[1] = 1;
        counts[2] = 1;
        HuffTable::new(counts, vec![5, 9]).unwrap()
    }

    #[test]
    fn canonical_assignment() {
        let table = two_symbol_table();
        let enc = table.encoder();
        assert_eq!(enc.code(0, 5).unwrap(), (0b0, 1));
        assert_eq!(enc.code(0, 9).unwrap(), (0b10, 2));
    }

    #[test]
    fn missing_symbol_is_reported() {
        let table = two_symbol_table();
        let enc = table.encoder();
        assert!(matches!(
            enc.code(1, 0xAB),
            Err(CodecError::MissingCode { class: 1, symbol: 0xAB })
        ));
    }

    #[test]
    fn count_mismatch_rejected() {
        let mut counts = [0u8; 17];
        counts[1] = 2;
        assert!(HuffTable::new(counts, vec![1]).is_err());
    }

    #[test]
    fn payload_round_trip() {
        let table = two_symbol_table();
        let payload = table.to_payload();
        assert_eq!(payload.len(), 18);
        assert_eq!(&payload[16..], &[5, 9]);
    }
}
