//! # Chaos Stream Generator
//!
//! Emits an endless byte stream derived from one of the chaotic keystream
//! generators, for piping into external statistical batteries (PractRand,
//! dieharder). Each keystream value contributes one byte: the low 8 bits of
//! its 15-significant-digit integer form.
//!
//! ```text
//! chaos_stream logistic | RNG_test stdin8
//! ```

use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Parser;
use scramjet::chaos::{arnold, logistic};
use scramjet::{significant_digits, MasterKey};

const CHUNK: usize = 12 * 1024;

#[derive(Parser)]
#[command(name = "chaos_stream")]
#[command(about = "Endless keystream bytes for statistical testing", long_about = None)]
struct Cli {
    /// Which map to stream: logistic, jia, or arnold
    map: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let key = MasterKey::default();

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    match cli.map.as_str() {
        "logistic" => stream_logistic(&key, &mut out),
        "jia" => stream_jia(&key, &mut out),
        "arnold" => stream_arnold(&key, &mut out),
        other => bail!("unknown map '{other}' (expected logistic, jia, or arnold)"),
    }
    Ok(())
}

fn emit(values: &[f64], out: &mut impl Write) -> bool {
    let bytes: Vec<u8> = values
        .iter()
        .map(|&v| (significant_digits(v, 15) & 0xFF) as u8)
        .collect();
    out.write_all(&bytes).is_ok()
}

/// The last logistic output *is* the generator state, so each chunk
/// continues exactly where the previous one stopped.
fn stream_logistic(key: &MasterKey, out: &mut impl Write) {
    let mut chunk = key.logistic_keystream(CHUNK);
    loop {
        if !emit(&chunk, out) {
            return;
        }
        let Some(&last) = chunk.last() else { return };
        chunk = logistic::keystream(
            CHUNK,
            last,
            key.logistic_r,
            0,
            logistic::DEFAULT_EPSILON,
        );
    }
}

/// Jia magnitudes discard the state's signs, so continuation re-runs the
/// trajectory with a growing burn-in. Fine for a test feed, quadratic in
/// the total stream length.
fn stream_jia(key: &MasterKey, out: &mut impl Write) {
    let mut skip_steps: u32 = 0;
    loop {
        let shifted = MasterKey { burn_in: key.burn_in + skip_steps, ..key.clone() };
        let chunk = shifted.jia_keystream(CHUNK);
        if !emit(&chunk, out) {
            return;
        }
        skip_steps += (CHUNK / 4) as u32;
    }
}

/// Arnold values scale back to the integer state, so each chunk (a
/// multiple of 3 values) continues exactly.
fn stream_arnold(key: &MasterKey, out: &mut impl Write) {
    let params = arnold::ArnoldParams::default();
    let modulus = params.mod_n as f64;

    let mut chunk = key.arnold_keystream(CHUNK);
    loop {
        if !emit(&chunk, out) {
            return;
        }
        let n = chunk.len();
        if n < 3 {
            return;
        }
        let (x, y, z) = (
            (chunk[n - 3] * modulus) as u64,
            (chunk[n - 2] * modulus) as u64,
            (chunk[n - 1] * modulus) as u64,
        );
        chunk = arnold::keystream(CHUNK, 0, params, x, y, z);
    }
}
