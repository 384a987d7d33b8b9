//! The master key: chaotic seeds, parameters, and keystream facades.

use std::error;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::chaos::{arnold, jia, logistic};
use crate::digits::MAX_DIGITS;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from loading, saving, or validating a master key.
#[derive(Debug)]
pub enum KeyError {
    /// Reading or writing the key file failed.
    Io(io::Error),
    /// The key file does not follow the three-line text format.
    Malformed(&'static str),
    /// A seed or parameter lies outside its valid domain.
    Domain(&'static str),
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "key file i/o error: {err}"),
            Self::Malformed(what) => write!(f, "malformed key file: {what}"),
            Self::Domain(what) => write!(f, "key parameter out of domain: {what}"),
        }
    }
}

impl error::Error for KeyError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for KeyError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

// =============================================================================
// MASTER KEY
// =============================================================================

/// The full key material for one encryption session.
///
/// A key is immutable once constructed and shared by reference across the
/// channel pipelines. Which chaotic map backs which cipher role is hidden
/// behind the keystream facades, so pipelines never touch seeds directly.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterKey {
    /// Logistic map seed, in `(0, 1)`.
    pub logistic_x0: f64,
    /// Logistic map control parameter, in `(3.57, 4.0]`.
    pub logistic_r: f64,
    /// Jia system seed `x`.
    pub jia_x0: f64,
    /// Jia system seed `y`.
    pub jia_y0: f64,
    /// Jia system seed `z`.
    pub jia_z0: f64,
    /// Jia system seed `w`.
    pub jia_w0: f64,
    /// Significant-digit count for the digit extractor, `1..=17`.
    pub alpha: u32,
    /// Iterations every generator discards before emitting.
    pub burn_in: u32,
}

impl Default for MasterKey {
    fn default() -> Self {
        Self {
            logistic_x0: 0.678,
            logistic_r: 4.0,
            jia_x0: 0.1,
            jia_y0: 0.2,
            jia_z0: 0.3,
            jia_w0: 0.4,
            alpha: 15,
            burn_in: 200,
        }
    }
}

impl MasterKey {
    // =========================================================================
    // CONSTRUCTION
    // =========================================================================

    /// Validated construction.
    ///
    /// # Errors
    /// `KeyError::Domain` when any seed or parameter lies outside the
    /// domains documented on the fields.
    pub fn new(
        logistic_x0: f64,
        logistic_r: f64,
        jia_seeds: [f64; 4],
        alpha: u32,
        burn_in: u32,
    ) -> Result<Self, KeyError> {
        let key = Self {
            logistic_x0,
            logistic_r,
            jia_x0: jia_seeds[0],
            jia_y0: jia_seeds[1],
            jia_z0: jia_seeds[2],
            jia_w0: jia_seeds[3],
            alpha,
            burn_in,
        };
        key.validate()?;
        Ok(key)
    }

    fn validate(&self) -> Result<(), KeyError> {
        if !(self.logistic_x0 > 0.0 && self.logistic_x0 < 1.0) {
            return Err(KeyError::Domain("logistic x0 must lie in (0, 1)"));
        }
        if !(self.logistic_r > logistic::R_CHAOTIC_MIN && self.logistic_r <= logistic::R_MAX) {
            return Err(KeyError::Domain("logistic r must lie in (3.57, 4.0]"));
        }
        let jia = [self.jia_x0, self.jia_y0, self.jia_z0, self.jia_w0];
        if jia.iter().any(|v| !v.is_finite()) {
            return Err(KeyError::Domain("jia seeds must be finite"));
        }
        if self.alpha < 1 || self.alpha > MAX_DIGITS {
            return Err(KeyError::Domain("alpha must lie in 1..=17"));
        }
        Ok(())
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    /// Parse the three-line whitespace-separated key text.
    ///
    /// # Errors
    /// `KeyError::Malformed` on a field-count or parse failure,
    /// `KeyError::Domain` when the parsed values fail validation.
    pub fn parse(text: &str) -> Result<Self, KeyError> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() != 8 {
            return Err(KeyError::Malformed("expected exactly 8 fields"));
        }
        let real = |s: &str| -> Result<f64, KeyError> {
            s.parse().map_err(|_| KeyError::Malformed("unparseable real field"))
        };
        let int = |s: &str| -> Result<u32, KeyError> {
            s.parse().map_err(|_| KeyError::Malformed("unparseable integer field"))
        };
        Self::new(
            real(fields[0])?,
            real(fields[1])?,
            [real(fields[2])?, real(fields[3])?, real(fields[4])?, real(fields[5])?],
            int(fields[6])?,
            int(fields[7])?,
        )
    }

    /// Serialize to the key-file text format. Reals carry 18 significant
    /// digits so a save/load cycle is bit-exact for doubles.
    pub fn to_text(&self) -> String {
        format!(
            "{:.17e} {:.17e}\n{:.17e} {:.17e} {:.17e} {:.17e}\n{} {}\n",
            self.logistic_x0,
            self.logistic_r,
            self.jia_x0,
            self.jia_y0,
            self.jia_z0,
            self.jia_w0,
            self.alpha,
            self.burn_in,
        )
    }

    /// Load and validate a key file.
    ///
    /// # Errors
    /// See [`MasterKey::parse`]; I/O failures surface as `KeyError::Io`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, KeyError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Write the key file.
    ///
    /// # Errors
    /// `KeyError::Io` when the write fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), KeyError> {
        fs::write(path, self.to_text())?;
        Ok(())
    }

    // =========================================================================
    // KEYSTREAM FACADES
    // =========================================================================

    /// Logistic keystream of exactly `length` values.
    pub fn logistic_keystream(&self, length: usize) -> Vec<f64> {
        logistic::keystream(
            length,
            self.logistic_x0,
            self.logistic_r,
            self.burn_in,
            logistic::DEFAULT_EPSILON,
        )
    }

    /// Jia keystream of exactly `length` magnitude values.
    pub fn jia_keystream(&self, length: usize) -> Vec<f64> {
        jia::keystream(
            length,
            self.burn_in,
            jia::DEFAULT_STEP,
            self.jia_x0,
            self.jia_y0,
            self.jia_z0,
            self.jia_w0,
        )
    }

    /// Arnold keystream of exactly `length` values in `[0, 1)`.
    ///
    /// The integer seeds derive from the Jia seeds by
    /// `floor(seed * 1000) mod 256`, which keeps the discrete orbit away
    /// from the origin for every non-degenerate Jia seed choice.
    pub fn arnold_keystream(&self, length: usize) -> Vec<f64> {
        arnold::keystream(
            length,
            self.burn_in,
            arnold::ArnoldParams::default(),
            derive_arnold_seed(self.jia_x0),
            derive_arnold_seed(self.jia_y0),
            derive_arnold_seed(self.jia_z0),
        )
    }
}

/// `floor(seed * 1000) mod 256`, with the euclidean remainder so negative
/// seeds still land in `0..256`.
fn derive_arnold_seed(seed: f64) -> u64 {
    ((seed * 1000.0).floor() as i64).rem_euclid(256) as u64
}

// =============================================================================
// TESTS
// =============================================================================
