//! Fresh master-key generation.

use anyhow::{bail, Context, Result};
use rand::Rng;
use scramjet::MasterKey;
use std::path::Path;

/// Draw a fresh key from OS randomness and write it as a key file.
///
/// Seeds are sampled from the interior of each valid domain, so the
/// resulting key always validates and every chaotic orbit is
/// non-degenerate.
pub fn keygen(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            output.display()
        );
    }

    let mut rng = rand::thread_rng();
    let key = MasterKey::new(
        rng.gen_range(1e-6..1.0 - 1e-6),
        rng.gen_range(3.6..=4.0),
        [
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        ],
        15,
        200,
    )
    .context("generated key failed validation")?;

    key.save(output)
        .with_context(|| format!("Failed to write key: {}", output.display()))?;
    println!("{}", output.display());
    Ok(())
}
