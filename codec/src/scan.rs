//! Entropy-coded scan decode and encode.
//!
//! Converts between stuffed scan bytes and quantized DCT coefficients in
//! zig-zag order. No dequantization, no IDCT; the coefficients round-trip
//! bit-exactly through these two functions.

use crate::bitio::{BitReader, BitWriter};
use crate::error::{CodecError, Result};
use crate::huffman::{HuffEncoder, HuffTable};
use crate::image::{Block, Component};
use crate::marker;
use crate::parser::ParsedImage;

// =============================================================================
// GEOMETRY
// =============================================================================

/// Block-grid geometry shared by the decoder and encoder.
pub(crate) struct Geometry {
    /// MCU grid width.
    pub mcus_x: usize,
    /// MCU grid height.
    pub mcus_y: usize,
    /// `(width_in_blocks, height_in_blocks)` per frame component, including
    /// the MCU padding blocks that live in the entropy stream.
    pub dims: Vec<(usize, usize)>,
    /// Whether components are interleaved into common MCUs.
    pub interleaved: bool,
}

/// Compute the grid for a frame. A single-component scan is never
/// interleaved: its MCU is one block and sampling factors do not pad.
pub(crate) fn geometry(width: u16, height: u16, samplings: &[(u8, u8)]) -> Geometry {
    let (width, height) = (usize::from(width), usize::from(height));
    if samplings.len() == 1 {
        let dims = vec![(width.div_ceil(8), height.div_ceil(8))];
        return Geometry { mcus_x: dims[0].0, mcus_y: dims[0].1, dims, interleaved: false };
    }

    let max_h = samplings.iter().map(|s| usize::from(s.0)).max().unwrap_or(1);
    let max_v = samplings.iter().map(|s| usize::from(s.1)).max().unwrap_or(1);
    let mcus_x = width.div_ceil(8 * max_h);
    let mcus_y = height.div_ceil(8 * max_v);
    let dims = samplings
        .iter()
        .map(|&(h, v)| (mcus_x * usize::from(h), mcus_y * usize::from(v)))
        .collect();
    Geometry { mcus_x, mcus_y, dims, interleaved: true }
}

// =============================================================================
// DECODE
// =============================================================================

/// Decode the entropy-coded scan into per-component block arrays
/// (frame order, row-major, zig-zag coefficients).
pub(crate) fn decode_scan(parsed: &ParsedImage, data: &[u8]) -> Result<Vec<Vec<Block>>> {
    let samplings: Vec<(u8, u8)> = parsed
        .frame_components
        .iter()
        .map(|c| (c.h_sampling, c.v_sampling))
        .collect();
    let geo = geometry(parsed.width, parsed.height, &samplings);

    let mut blocks: Vec<Vec<Block>> =
        geo.dims.iter().map(|&(w, h)| vec![[0i16; 64]; w * h]).collect();

    let mut reader = BitReader::new(data, parsed.entropy_start);
    let mut preds = vec![0i32; parsed.frame_components.len()];
    let interval = usize::from(parsed.restart_interval);
    let mut restarts = 0u8;

    for mcu_y in 0..geo.mcus_y {
        for mcu_x in 0..geo.mcus_x {
            let mcu_index = mcu_y * geo.mcus_x + mcu_x;
            if interval > 0 && mcu_index > 0 && mcu_index % interval == 0 {
                reader.expect_restart(restarts)?;
                restarts = restarts.wrapping_add(1);
                preds.iter_mut().for_each(|p| *p = 0);
            }

            for sc in &parsed.scan_components {
                let fc = &parsed.frame_components[sc.comp];
                let dc_table = table(&parsed.dc_tables, sc.dc_id)?;
                let ac_table = table(&parsed.ac_tables, sc.ac_id)?;
                let (h, v) = if geo.interleaved {
                    (usize::from(fc.h_sampling), usize::from(fc.v_sampling))
                } else {
                    (1, 1)
                };
                let width_in_blocks = geo.dims[sc.comp].0;

                for bv in 0..v {
                    for bh in 0..h {
                        let row = mcu_y * v + bv;
                        let col = mcu_x * h + bh;
                        let block = &mut blocks[sc.comp][row * width_in_blocks + col];
                        decode_block(&mut reader, dc_table, ac_table, &mut preds[sc.comp], block)?;
                    }
                }
            }
        }
    }

    Ok(blocks)
}

fn table(slots: &[Option<HuffTable>; 4], id: u8) -> Result<&HuffTable> {
    slots
        .get(usize::from(id))
        .and_then(Option::as_ref)
        .ok_or(CodecError::Malformed("scan references undefined huffman table"))
}

fn decode_block(
    reader: &mut BitReader<'_>,
    dc: &HuffTable,
    ac: &HuffTable,
    pred: &mut i32,
    block: &mut Block,
) -> Result<()> {
    // DC: category symbol, then the difference bits.
    let category = reader.decode_symbol(dc)?;
    if category > 11 {
        return Err(CodecError::Malformed("dc category above 11"));
    }
    let diff = reader.receive_extend(u32::from(category))?;
    *pred = pred.wrapping_add(diff);
    block[0] = *pred as i16;

    // AC: run/size symbols over zig-zag positions 1..63.
    let mut k = 1usize;
    while k < 64 {
        let symbol = reader.decode_symbol(ac)?;
        let run = usize::from(symbol >> 4);
        let size = u32::from(symbol & 0x0F);

        if size == 0 {
            if run == 15 {
                k += 16; // ZRL
                continue;
            }
            break; // EOB
        }

        k += run;
        if k > 63 {
            return Err(CodecError::Malformed("ac run overruns block"));
        }
        block[k] = reader.receive_extend(size)? as i16;
        k += 1;
    }

    Ok(())
}

// =============================================================================
// ENCODE
// =============================================================================

/// Encoder table pair for one scan component.
pub(crate) struct ScanEncoder {
    /// Index into the frame component list.
    pub comp: usize,
    /// DC table in encode form.
    pub dc: HuffEncoder,
    /// AC table in encode form.
    pub ac: HuffEncoder,
}

/// Re-encode all coefficients into stuffed entropy data, restart markers
/// included. Fails with `MissingCode` when a needed code is undefined.
pub(crate) fn encode_scan(
    components: &[Component],
    scan: &[ScanEncoder],
    geo: &Geometry,
    restart_interval: u16,
) -> Result<Vec<u8>> {
    let mut writer = BitWriter::new();
    let mut preds = vec![0i32; components.len()];
    let interval = usize::from(restart_interval);
    let mut restarts = 0u8;

    for mcu_y in 0..geo.mcus_y {
        for mcu_x in 0..geo.mcus_x {
            let mcu_index = mcu_y * geo.mcus_x + mcu_x;
            if interval > 0 && mcu_index > 0 && mcu_index % interval == 0 {
                writer.align();
                writer.put_marker(marker::RST0 + restarts % 8);
                restarts = restarts.wrapping_add(1);
                preds.iter_mut().for_each(|p| *p = 0);
            }

            for se in scan {
                let comp = &components[se.comp];
                let (h, v) = if geo.interleaved {
                    (usize::from(comp.h_sampling), usize::from(comp.v_sampling))
                } else {
                    (1, 1)
                };

                for bv in 0..v {
                    for bh in 0..h {
                        let row = mcu_y * v + bv;
                        let col = mcu_x * h + bh;
                        let block = comp.block(row, col);
                        encode_block(&mut writer, block, &mut preds[se.comp], se)?;
                    }
                }
            }
        }
    }

    Ok(writer.finish())
}

fn encode_block(
    writer: &mut BitWriter,
    block: &Block,
    pred: &mut i32,
    tables: &ScanEncoder,
) -> Result<()> {
    let dc = i32::from(block[0]);
    let diff = dc.wrapping_sub(*pred);
    *pred = dc;

    let category = bit_width(diff.unsigned_abs());
    let (code, len) = tables.dc.code(0, category as u8)?;
    writer.put_bits(u32::from(code), u32::from(len));
    if category > 0 {
        let bits = if diff < 0 { diff - 1 } else { diff };
        writer.put_bits(bits as u32, category);
    }

    let mut run = 0u32;
    for &coeff in &block[1..] {
        let v = i32::from(coeff);
        if v == 0 {
            run += 1;
            continue;
        }
        while run >= 16 {
            let (code, len) = tables.ac.code(1, 0xF0)?;
            writer.put_bits(u32::from(code), u32::from(len));
            run -= 16;
        }
        let size = bit_width(v.unsigned_abs());
        let symbol = ((run as u8) << 4) | size as u8;
        let (code, len) = tables.ac.code(1, symbol)?;
        writer.put_bits(u32::from(code), u32::from(len));
        let bits = if v < 0 { v - 1 } else { v };
        writer.put_bits(bits as u32, size);
        run = 0;
    }
    if run > 0 {
        let (code, len) = tables.ac.code(1, 0x00)?;
        writer.put_bits(u32::from(code), u32::from(len));
    }

    Ok(())
}

/// Number of bits in the JPEG magnitude category of `v`.
const fn bit_width(v: u32) -> u32 {
    32 - v.leading_zeros()
}
