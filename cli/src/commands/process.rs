//! Batch processing over directories of JPEGs.
//!
//! Every regular file in the input directory is processed in parallel;
//! per-image failures go to standard error and never abort the batch.

use anyhow::{Context, Result};
use log::info;
use rayon::prelude::*;
use scramjet::{decrypt, encrypt, CoeffImage, MasterKey};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// =============================================================================
// MODES
// =============================================================================

/// Direction of a one-way batch pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Plain images in, scrambled images out.
    Encrypt,
    /// Scrambled images in, recovered images out.
    Decrypt,
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Encrypt every input into `encrypted_dir`, then decrypt each encrypted
/// file into `decrypted_dir`: the original two-output workflow, doubling as
/// a file-level round-trip check.
pub fn run(
    input: &Path,
    encrypted_dir: &Path,
    decrypted_dir: &Path,
    key_path: &Path,
) -> Result<()> {
    let key = load_key(key_path)?;
    fs::create_dir_all(encrypted_dir)
        .with_context(|| format!("Failed to create: {}", encrypted_dir.display()))?;
    fs::create_dir_all(decrypted_dir)
        .with_context(|| format!("Failed to create: {}", decrypted_dir.display()))?;

    let files = regular_files(input)?;
    info!("processing {} file(s) from {}", files.len(), input.display());

    process_all(&files, |path, name| {
        let encrypted_path = encrypted_dir.join(name);
        let decrypted_path = decrypted_dir.join(name);

        let mut image = CoeffImage::load(path)?;
        encrypt(&mut image, &key)?;
        image.save(&encrypted_path)?;

        let mut scrambled = CoeffImage::load(&encrypted_path)?;
        decrypt(&mut scrambled, &key)?;
        scrambled.save(&decrypted_path)?;
        Ok(())
    });
    Ok(())
}

/// One-direction batch pass over a directory.
pub fn batch(input: &Path, output: &Path, key_path: &Path, mode: Mode) -> Result<()> {
    let key = load_key(key_path)?;
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create: {}", output.display()))?;

    let files = regular_files(input)?;
    info!("{mode:?}: {} file(s) from {}", files.len(), input.display());

    process_all(&files, |path, name| {
        let mut image = CoeffImage::load(path)?;
        match mode {
            Mode::Encrypt => encrypt(&mut image, &key)?,
            Mode::Decrypt => decrypt(&mut image, &key)?,
        }
        image.save(output.join(name))?;
        Ok(())
    });
    Ok(())
}

// =============================================================================
// SHARED MACHINERY
// =============================================================================

fn load_key(path: &Path) -> Result<MasterKey> {
    MasterKey::load(path).with_context(|| format!("Failed to load key: {}", path.display()))
}

/// Every regular file in `dir`, sorted for stable output order.
fn regular_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Run `work` over all files in parallel. Successes print to stdout in
/// input order; failures go to stderr. The batch itself always succeeds —
/// a broken image must not sink the rest of the directory.
fn process_all<F>(files: &[PathBuf], work: F)
where
    F: Fn(&Path, &std::ffi::OsStr) -> anyhow::Result<()> + Sync,
{
    let results = Mutex::new(Vec::with_capacity(files.len()));
    let errors = Mutex::new(Vec::new());

    files.par_iter().for_each(|path| {
        let Some(name) = path.file_name() else {
            return;
        };
        match work(path, name) {
            Ok(()) => {
                if let Ok(mut results) = results.lock() {
                    results.push(path.clone());
                }
            }
            Err(e) => {
                if let Ok(mut errors) = errors.lock() {
                    errors.push((path.clone(), e));
                }
            }
        }
    });

    // Print in original order.
    let mut results = results.into_inner().unwrap_or_default();
    results.sort_by_key(|path| files.iter().position(|p| p == path).unwrap_or(usize::MAX));
    for path in results {
        println!("{}", path.display());
    }

    let errors = errors.into_inner().unwrap_or_default();
    for (path, error) in &errors {
        eprintln!("Error: {}: {:#}", path.display(), error);
    }
    if !errors.is_empty() {
        eprintln!("{} image(s) failed", errors.len());
    }
}
