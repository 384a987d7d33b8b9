//! The coefficient-domain image model.

use std::fs;
use std::path::Path;

use log::warn;

use crate::error::{CodecError, Result};
use crate::huffman::HuffTable;
use crate::marker;
use crate::parser::{self, ScanComponent, Segment};
use crate::scan::{self, Geometry, ScanEncoder};
use crate::tables;

/// One quantized 8x8 DCT block in zig-zag order; index 0 is the DC
/// coefficient, indices 1..=63 the AC coefficients.
pub type Block = [i16; 64];

// =============================================================================
// COMPONENT
// =============================================================================

/// One color component and its full block grid.
///
/// The grid includes the MCU padding blocks present in the entropy stream,
/// so `width_in_blocks * height_in_blocks == blocks.len()` always holds and
/// every stored block survives a save/load cycle.
#[derive(Debug, Clone)]
pub struct Component {
    /// Component identifier from SOF0 (JFIF convention: 1 = Y, 2 = Cb, 3 = Cr).
    pub id: u8,
    /// Horizontal sampling factor.
    pub h_sampling: u8,
    /// Vertical sampling factor.
    pub v_sampling: u8,
    /// Quantization table slot this component references.
    pub quant_table: u8,
    /// Block-grid width.
    pub width_in_blocks: usize,
    /// Block-grid height.
    pub height_in_blocks: usize,
    /// Blocks, row-major over the grid.
    pub blocks: Vec<Block>,
}

impl Component {
    /// Block at `(row, col)` of the grid.
    pub fn block(&self, row: usize, col: usize) -> &Block {
        &self.blocks[row * self.width_in_blocks + col]
    }

    /// Mutable block at `(row, col)` of the grid.
    pub fn block_mut(&mut self, row: usize, col: usize) -> &mut Block {
        &mut self.blocks[row * self.width_in_blocks + col]
    }

    /// Total number of blocks in the grid.
    pub fn total_blocks(&self) -> usize {
        self.blocks.len()
    }
}

// =============================================================================
// COEFFICIENT IMAGE
// =============================================================================

/// A baseline JPEG held as quantized DCT coefficients plus the structural
/// segments needed to write it back.
///
/// Loading never dequantizes; saving never re-quantizes. Mutating
/// coefficients through [`Component::block_mut`] and saving produces a valid
/// baseline JPEG with the original tables and metadata.
#[derive(Debug, Clone)]
pub struct CoeffImage {
    /// Image width in pixels.
    pub width: u16,
    /// Image height in pixels.
    pub height: u16,
    /// Components in frame (SOF0) order.
    pub components: Vec<Component>,
    restart_interval: u16,
    segments: Vec<Segment>,
    scan_components: Vec<ScanComponent>,
    dc_tables: [Option<HuffTable>; 4],
    ac_tables: [Option<HuffTable>; 4],
}

impl CoeffImage {
    // =========================================================================
    // CONSTRUCTION
    // =========================================================================

    /// Parse a baseline JPEG byte stream into its quantized coefficients.
    ///
    /// # Errors
    /// `Malformed` when the stream violates the baseline grammar,
    /// `Unsupported` for progressive, arithmetic-coded, 12-bit, or
    /// multi-scan files.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let parsed = parser::parse(data)?;
        let block_arrays = scan::decode_scan(&parsed, data)?;

        let samplings: Vec<(u8, u8)> = parsed
            .frame_components
            .iter()
            .map(|c| (c.h_sampling, c.v_sampling))
            .collect();
        let geo = scan::geometry(parsed.width, parsed.height, &samplings);

        let components = parsed
            .frame_components
            .iter()
            .zip(block_arrays)
            .zip(&geo.dims)
            .map(|((fc, blocks), &(w, h))| Component {
                id: fc.id,
                h_sampling: fc.h_sampling,
                v_sampling: fc.v_sampling,
                quant_table: fc.quant_table,
                width_in_blocks: w,
                height_in_blocks: h,
                blocks,
            })
            .collect();

        Ok(Self {
            width: parsed.width,
            height: parsed.height,
            components,
            restart_interval: parsed.restart_interval,
            segments: parsed.segments,
            scan_components: parsed.scan_components,
            dc_tables: parsed.dc_tables,
            ac_tables: parsed.ac_tables,
        })
    }

    /// Read and parse a baseline JPEG file.
    ///
    /// # Errors
    /// As [`CoeffImage::from_bytes`], plus `Io` for read failures.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_bytes(&fs::read(path)?)
    }

    /// Build an all-zero coefficient image from scratch: JFIF header,
    /// flat quantization tables, and the T.81 typical Huffman tables.
    ///
    /// `samplings` gives the `(h, v)` factor per component (1 to 4
    /// components; factors 1..=4).
    ///
    /// # Errors
    /// `Malformed` when the dimensions are zero or the sampling layout is
    /// out of range.
    pub fn new(width: u16, height: u16, samplings: &[(u8, u8)]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CodecError::Malformed("empty frame"));
        }
        if samplings.is_empty() || samplings.len() > 4 {
            return Err(CodecError::Malformed("component count out of range"));
        }
        if samplings.iter().any(|&(h, v)| h == 0 || h > 4 || v == 0 || v > 4) {
            return Err(CodecError::Malformed("sampling factor out of range"));
        }

        let geo = scan::geometry(width, height, samplings);
        let components: Vec<Component> = samplings
            .iter()
            .zip(&geo.dims)
            .enumerate()
            .map(|(i, (&(h, v), &(w_blocks, h_blocks)))| Component {
                id: i as u8 + 1,
                h_sampling: h,
                v_sampling: v,
                quant_table: u8::from(i > 0),
                width_in_blocks: w_blocks,
                height_in_blocks: h_blocks,
                blocks: vec![[0i16; 64]; w_blocks * h_blocks],
            })
            .collect();

        let scan_components: Vec<ScanComponent> = components
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let id = u8::from(i > 0);
                ScanComponent { comp: i, dc_id: id, ac_id: id }
            })
            .collect();

        let mut dc_tables: [Option<HuffTable>; 4] = [None, None, None, None];
        let mut ac_tables: [Option<HuffTable>; 4] = [None, None, None, None];
        dc_tables[0] = Some(tables::typical_dc_luma());
        ac_tables[0] = Some(tables::typical_ac_luma());
        if components.len() > 1 {
            dc_tables[1] = Some(tables::typical_dc_chroma());
            ac_tables[1] = Some(tables::typical_ac_chroma());
        }

        let segments = synthetic_segments(width, height, &components, &dc_tables, &ac_tables);

        Ok(Self {
            width,
            height,
            components,
            restart_interval: 0,
            segments,
            scan_components,
            dc_tables,
            ac_tables,
        })
    }

    // =========================================================================
    // SERIALIZATION
    // =========================================================================

    /// Serialize back to a baseline JPEG byte stream.
    ///
    /// Structural segments are re-emitted verbatim and the scan is
    /// re-encoded from the current coefficients with the file's own Huffman
    /// tables. When a coefficient needs a code an optimized table lacks, the
    /// writer falls back to the T.81 typical tables for the whole scan and
    /// rewrites the DHT segments accordingly.
    ///
    /// # Errors
    /// `Malformed` when the scan references an undefined table,
    /// `MissingCode` when even the typical tables cannot encode a
    /// coefficient (magnitude outside the baseline range).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self.encode_with_own_tables() {
            Ok(bytes) => Ok(bytes),
            Err(CodecError::MissingCode { class, symbol }) => {
                warn!(
                    "file tables define no code for class-{class} symbol {symbol:#04x}; \
                     falling back to typical tables"
                );
                self.encode_with_typical_tables()
            }
            Err(err) => Err(err),
        }
    }

    /// Serialize to a file.
    ///
    /// # Errors
    /// As [`CoeffImage::to_bytes`], plus `Io` for write failures.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Restart interval in MCUs (0 when disabled).
    pub const fn restart_interval(&self) -> u16 {
        self.restart_interval
    }

    /// Set the restart interval, keeping the DRI segment in sync so the
    /// serialized stream stays self-describing.
    pub fn set_restart_interval(&mut self, interval: u16) {
        self.restart_interval = interval;
        let payload = interval.to_be_bytes().to_vec();
        if let Some(seg) = self.segments.iter_mut().find(|s| s.marker == marker::DRI) {
            seg.payload = payload;
        } else {
            self.segments.push(Segment { marker: marker::DRI, payload });
        }
    }

    fn geometry(&self) -> Geometry {
        let samplings: Vec<(u8, u8)> = self
            .components
            .iter()
            .map(|c| (c.h_sampling, c.v_sampling))
            .collect();
        scan::geometry(self.width, self.height, &samplings)
    }

    fn encode_with_own_tables(&self) -> Result<Vec<u8>> {
        let scan_encoders = self
            .scan_components
            .iter()
            .map(|sc| {
                let dc = slot(&self.dc_tables, sc.dc_id)?;
                let ac = slot(&self.ac_tables, sc.ac_id)?;
                Ok(ScanEncoder { comp: sc.comp, dc: dc.encoder(), ac: ac.encoder() })
            })
            .collect::<Result<Vec<_>>>()?;

        let entropy =
            scan::encode_scan(&self.components, &scan_encoders, &self.geometry(), self.restart_interval)?;
        Ok(self.assemble(&self.segments, &self.scan_components, &entropy))
    }

    fn encode_with_typical_tables(&self) -> Result<Vec<u8>> {
        let dc = [tables::typical_dc_luma(), tables::typical_dc_chroma()];
        let ac = [tables::typical_ac_luma(), tables::typical_ac_chroma()];

        let scan_components: Vec<ScanComponent> = self
            .scan_components
            .iter()
            .map(|sc| {
                let id = u8::from(sc.comp > 0);
                ScanComponent { comp: sc.comp, dc_id: id, ac_id: id }
            })
            .collect();
        let scan_encoders: Vec<ScanEncoder> = scan_components
            .iter()
            .map(|sc| ScanEncoder {
                comp: sc.comp,
                dc: dc[usize::from(sc.dc_id)].encoder(),
                ac: ac[usize::from(sc.ac_id)].encoder(),
            })
            .collect();

        let entropy =
            scan::encode_scan(&self.components, &scan_encoders, &self.geometry(), self.restart_interval)?;

        // Replace every DHT segment with the typical tables, keeping all
        // other structural segments untouched.
        let mut segments: Vec<Segment> =
            self.segments.iter().filter(|s| s.marker != marker::DHT).cloned().collect();
        let used_pairs = usize::from(self.components.len() > 1) + 1;
        for id in 0..used_pairs {
            segments.push(dht_segment(0, id as u8, &dc[id]));
            segments.push(dht_segment(1, id as u8, &ac[id]));
        }

        Ok(self.assemble(&segments, &scan_components, &entropy))
    }

    fn assemble(
        &self,
        segments: &[Segment],
        scan_components: &[ScanComponent],
        entropy: &[u8],
    ) -> Vec<u8> {
        let mut out = Vec::with_capacity(entropy.len() + 1024);
        out.extend_from_slice(&[0xFF, marker::SOI]);
        for seg in segments {
            push_segment(&mut out, seg.marker, &seg.payload);
        }

        // SOS header rebuilt from the scan layout.
        let mut sos = Vec::with_capacity(4 + 2 * scan_components.len());
        sos.push(scan_components.len() as u8);
        for sc in scan_components {
            sos.push(self.components[sc.comp].id);
            sos.push(sc.dc_id << 4 | sc.ac_id);
        }
        sos.extend_from_slice(&[0, 63, 0]);
        push_segment(&mut out, marker::SOS, &sos);

        out.extend_from_slice(entropy);
        out.extend_from_slice(&[0xFF, marker::EOI]);
        out
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn slot(slots: &[Option<HuffTable>; 4], id: u8) -> Result<&HuffTable> {
    slots
        .get(usize::from(id))
        .and_then(Option::as_ref)
        .ok_or(CodecError::Malformed("scan references undefined huffman table"))
}

fn push_segment(out: &mut Vec<u8>, marker: u8, payload: &[u8]) {
    out.push(0xFF);
    out.push(marker);
    let len = payload.len() as u16 + 2;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(payload);
}

fn dht_segment(class: u8, id: u8, table: &HuffTable) -> Segment {
    let mut payload = vec![class << 4 | id];
    payload.extend_from_slice(&table.to_payload());
    Segment { marker: marker::DHT, payload }
}

/// Structural segments for a from-scratch image: JFIF APP0, flat DQT(s),
/// SOF0, and the typical Huffman tables.
fn synthetic_segments(
    width: u16,
    height: u16,
    components: &[Component],
    dc_tables: &[Option<HuffTable>; 4],
    ac_tables: &[Option<HuffTable>; 4],
) -> Vec<Segment> {
    let mut segments = Vec::new();

    let mut app0 = Vec::new();
    app0.extend_from_slice(b"JFIF\0");
    app0.extend_from_slice(&[1, 1, 0, 0, 1, 0, 1, 0, 0]);
    segments.push(Segment { marker: marker::APP0, payload: app0 });

    let quant_slots = usize::from(components.len() > 1) + 1;
    for id in 0..quant_slots {
        let mut dqt = vec![id as u8];
        dqt.extend_from_slice(&[1u8; 64]);
        segments.push(Segment { marker: marker::DQT, payload: dqt });
    }

    let mut sof = vec![8];
    sof.extend_from_slice(&height.to_be_bytes());
    sof.extend_from_slice(&width.to_be_bytes());
    sof.push(components.len() as u8);
    for c in components {
        sof.push(c.id);
        sof.push(c.h_sampling << 4 | c.v_sampling);
        sof.push(c.quant_table);
    }
    segments.push(Segment { marker: marker::SOF0, payload: sof });

    for id in 0..quant_slots as u8 {
        if let Some(table) = &dc_tables[usize::from(id)] {
            segments.push(dht_segment(0, id, table));
        }
        if let Some(table) = &ac_tables[usize::from(id)] {
            segments.push(dht_segment(1, id, table));
        }
    }

    segments
}
