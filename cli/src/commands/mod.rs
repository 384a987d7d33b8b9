//! CLI subcommand implementations.

mod keygen;
mod process;

pub use keygen::keygen;
pub use process::{batch, run, Mode};
