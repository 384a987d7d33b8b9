//! Marker-segment parsing up to the start of entropy-coded data.

use crate::error::{CodecError, Result};
use crate::huffman::HuffTable;
use crate::marker;

// =============================================================================
// PARSED STRUCTURES
// =============================================================================

/// A raw marker segment, payload excluding the two length bytes.
#[derive(Debug, Clone)]
pub(crate) struct Segment {
    pub marker: u8,
    pub payload: Vec<u8>,
}

/// One component as declared by SOF0.
#[derive(Debug, Clone)]
pub(crate) struct FrameComponent {
    pub id: u8,
    pub h_sampling: u8,
    pub v_sampling: u8,
    pub quant_table: u8,
}

/// One component entry of the SOS header.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScanComponent {
    /// Index into the frame component list.
    pub comp: usize,
    pub dc_id: u8,
    pub ac_id: u8,
}

/// Everything the scan decoder needs, plus the raw segments the serializer
/// re-emits.
pub(crate) struct ParsedImage {
    pub width: u16,
    pub height: u16,
    pub frame_components: Vec<FrameComponent>,
    pub dc_tables: [Option<HuffTable>; 4],
    pub ac_tables: [Option<HuffTable>; 4],
    pub restart_interval: u16,
    pub segments: Vec<Segment>,
    pub scan_components: Vec<ScanComponent>,
    pub entropy_start: usize,
}

// =============================================================================
// PARSER
// =============================================================================

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn u8(&mut self) -> Result<u8> {
        let v = *self
            .data
            .get(self.pos)
            .ok_or(CodecError::Malformed("unexpected end of file"))?;
        self.pos += 1;
        Ok(v)
    }

    fn u16(&mut self) -> Result<u16> {
        let hi = self.u8()?;
        let lo = self.u8()?;
        Ok(u16::from(hi) << 8 | u16::from(lo))
    }

    /// Read a marker, skipping 0xFF fill bytes.
    fn read_marker(&mut self) -> Result<u8> {
        if self.u8()? != 0xFF {
            return Err(CodecError::Malformed("expected marker"));
        }
        let mut m = self.u8()?;
        while m == 0xFF {
            m = self.u8()?;
        }
        Ok(m)
    }

    /// Read a length-prefixed segment payload.
    fn payload(&mut self) -> Result<&'a [u8]> {
        let len = self.u16()? as usize;
        if len < 2 {
            return Err(CodecError::Malformed("segment length below 2"));
        }
        let end = self.pos + len - 2;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or(CodecError::Malformed("segment overruns file"))?;
        self.pos = end;
        Ok(slice)
    }
}

/// Parse all marker segments up to and including SOS.
pub(crate) fn parse(data: &[u8]) -> Result<ParsedImage> {
    let mut cur = Cursor { data, pos: 0 };
    if cur.read_marker()? != marker::SOI {
        return Err(CodecError::Malformed("missing SOI"));
    }

    let mut width = 0u16;
    let mut height = 0u16;
    let mut frame_components: Vec<FrameComponent> = Vec::new();
    let mut dc_tables: [Option<HuffTable>; 4] = [None, None, None, None];
    let mut ac_tables: [Option<HuffTable>; 4] = [None, None, None, None];
    let mut restart_interval = 0u16;
    let mut segments = Vec::new();
    let mut seen_sof = false;

    loop {
        let m = cur.read_marker()?;
        match m {
            marker::SOF0 => {
                let payload = cur.payload()?;
                parse_sof0(payload, &mut width, &mut height, &mut frame_components)?;
                seen_sof = true;
                segments.push(Segment { marker: m, payload: payload.to_vec() });
            }
            m if marker::is_unsupported_sof(m) => {
                return Err(CodecError::Unsupported("non-baseline frame (SOF1..SOF15)"));
            }
            marker::DAC => return Err(CodecError::Unsupported("arithmetic coding")),
            marker::DHT => {
                let payload = cur.payload()?;
                parse_dht(payload, &mut dc_tables, &mut ac_tables)?;
                segments.push(Segment { marker: m, payload: payload.to_vec() });
            }
            marker::DRI => {
                let payload = cur.payload()?;
                if payload.len() != 2 {
                    return Err(CodecError::Malformed("bad DRI length"));
                }
                restart_interval = u16::from(payload[0]) << 8 | u16::from(payload[1]);
                segments.push(Segment { marker: m, payload: payload.to_vec() });
            }
            marker::SOS => {
                if !seen_sof {
                    return Err(CodecError::Malformed("SOS before SOF"));
                }
                let payload = cur.payload()?;
                let scan_components = parse_sos(payload, &frame_components)?;
                return Ok(ParsedImage {
                    width,
                    height,
                    frame_components,
                    dc_tables,
                    ac_tables,
                    restart_interval,
                    segments,
                    scan_components,
                    entropy_start: cur.pos,
                });
            }
            marker::EOI => return Err(CodecError::Malformed("EOI before any scan")),
            _ => {
                // APPn, COM, and anything else structural: keep verbatim.
                let payload = cur.payload()?;
                segments.push(Segment { marker: m, payload: payload.to_vec() });
            }
        }
    }
}

fn parse_sof0(
    payload: &[u8],
    width: &mut u16,
    height: &mut u16,
    components: &mut Vec<FrameComponent>,
) -> Result<()> {
    if payload.len() < 6 {
        return Err(CodecError::Malformed("truncated SOF0"));
    }
    if payload[0] != 8 {
        return Err(CodecError::Unsupported("sample precision other than 8"));
    }
    *height = u16::from(payload[1]) << 8 | u16::from(payload[2]);
    *width = u16::from(payload[3]) << 8 | u16::from(payload[4]);
    let n = usize::from(payload[5]);
    if *height == 0 || *width == 0 || n == 0 {
        return Err(CodecError::Malformed("empty frame"));
    }
    if payload.len() != 6 + 3 * n {
        return Err(CodecError::Malformed("SOF0 length mismatch"));
    }
    for entry in payload[6..].chunks_exact(3) {
        let (h, v) = (entry[1] >> 4, entry[1] & 0x0F);
        if h == 0 || h > 4 || v == 0 || v > 4 {
            return Err(CodecError::Malformed("sampling factor out of range"));
        }
        components.push(FrameComponent {
            id: entry[0],
            h_sampling: h,
            v_sampling: v,
            quant_table: entry[2],
        });
    }
    Ok(())
}

fn parse_dht(
    payload: &[u8],
    dc: &mut [Option<HuffTable>; 4],
    ac: &mut [Option<HuffTable>; 4],
) -> Result<()> {
    let mut pos = 0usize;
    while pos < payload.len() {
        let info = payload[pos];
        pos += 1;
        let class = info >> 4;
        let id = usize::from(info & 0x0F);
        if class > 1 || id > 3 {
            return Err(CodecError::Malformed("huffman table slot out of range"));
        }
        let counts_raw = payload
            .get(pos..pos + 16)
            .ok_or(CodecError::Malformed("truncated DHT counts"))?;
        pos += 16;
        let mut counts = [0u8; 17];
        counts[1..=16].copy_from_slice(counts_raw);
        let total: usize = counts_raw.iter().map(|&c| usize::from(c)).sum();
        let symbols = payload
            .get(pos..pos + total)
            .ok_or(CodecError::Malformed("truncated DHT symbols"))?
            .to_vec();
        pos += total;
        let table = HuffTable::new(counts, symbols)?;
        if class == 0 {
            dc[id] = Some(table);
        } else {
            ac[id] = Some(table);
        }
    }
    Ok(())
}

fn parse_sos(payload: &[u8], frame: &[FrameComponent]) -> Result<Vec<ScanComponent>> {
    if payload.is_empty() {
        return Err(CodecError::Malformed("empty SOS"));
    }
    let ns = usize::from(payload[0]);
    if payload.len() != 1 + 2 * ns + 3 {
        return Err(CodecError::Malformed("SOS length mismatch"));
    }
    if ns != frame.len() {
        // Baseline allows per-component scans, but then the image carries
        // several SOS markers, which this codec does not reassemble.
        return Err(CodecError::Unsupported("multi-scan image"));
    }
    let mut scan = Vec::with_capacity(ns);
    for entry in payload[1..1 + 2 * ns].chunks_exact(2) {
        let comp = frame
            .iter()
            .position(|c| c.id == entry[0])
            .ok_or(CodecError::Malformed("scan references unknown component"))?;
        scan.push(ScanComponent { comp, dc_id: entry[1] >> 4, ac_id: entry[1] & 0x0F });
    }
    let (ss, se, a) = (
        payload[1 + 2 * ns],
        payload[2 + 2 * ns],
        payload[3 + 2 * ns],
    );
    if ss != 0 || se != 63 || a != 0 {
        return Err(CodecError::Unsupported("spectral selection / successive approximation"));
    }
    Ok(scan)
}
